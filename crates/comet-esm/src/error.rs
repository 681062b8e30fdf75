// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the transform pipeline

use thiserror::Error;

/// Result type for transform operations
pub type Result<T> = std::result::Result<T, LexError>;

/// Errors raised while tokenizing source text.
///
/// Lexing is the only stage that can fail: the extractor and rewriters follow
/// a recovery-by-pass-through policy and never raise. Positions are byte
/// offsets into the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// String literal left open at end of input
    #[error("unterminated string literal starting at byte {position}")]
    UnterminatedString {
        /// Byte offset of the opening quote
        position: usize,
    },

    /// Template literal left open at end of input
    #[error("unterminated template literal starting at byte {position}")]
    UnterminatedTemplate {
        /// Byte offset of the opening backtick or segment start
        position: usize,
    },

    /// Block comment left open at end of input
    #[error("unterminated block comment starting at byte {position}")]
    UnterminatedComment {
        /// Byte offset of the opening `/*`
        position: usize,
    },

    /// Character outside the recognized grammar
    #[error("unrecognized character {character:?} at byte {position}")]
    UnexpectedCharacter {
        /// The offending character
        character: char,
        /// Byte offset of the character
        position: usize,
    },
}

impl LexError {
    /// Byte offset the error points at.
    pub fn position(&self) -> usize {
        match self {
            LexError::UnterminatedString { position }
            | LexError::UnterminatedTemplate { position }
            | LexError::UnterminatedComment { position }
            | LexError::UnexpectedCharacter { position, .. } => *position,
        }
    }
}
