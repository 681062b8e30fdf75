// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Lexical analysis (tokenization) for module source code.
//!
//! The lexer transforms source text into a flat, lossless token stream:
//! trivia is kept as tokens and every token carries its exact source span,
//! so `tokens.concat() == source` always holds. Template literals are
//! decomposed into a marker-delimited run (chunk / `${` / inner tokens /
//! `}` / tail) rather than a nested tree, which keeps every downstream
//! stage a linear scan.
//!
//! ## Structure
//!
//! - `scanner.rs` - Main `Scanner` struct that produces tokens
//! - `token.rs` - `Token` and `TokenKind` definitions

mod scanner;
mod token;

pub use scanner::Scanner;
pub use token::{Token, TokenKind};

pub(crate) use scanner::punctuator_prefix;

use crate::error::Result;

/// Tokenizes source text into a lossless token sequence.
///
/// Fails with a [`crate::LexError`] when a string, template, or block
/// comment is left unterminated or an unrecognized character is met.
pub fn lex(source: &str) -> Result<Vec<Token>> {
    Scanner::new(source).scan_all()
}
