// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The scanner that produces tokens from source text.
//!
//! Unlike a parser-feeding lexer, this scanner is lossless: trivia
//! (whitespace, newlines, comments) is emitted as tokens, and every token's
//! `text` is the exact source span, so the concatenation of all token texts
//! reproduces the input.

use super::token::{Token, TokenKind};
use crate::error::{LexError, Result};

/// Reserved words. Contextual words (`from`, `as`, `assert`, `async`, `of`)
/// are deliberately absent and lex as identifiers.
const KEYWORDS: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "let",
    "new",
    "null",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Punctuator table, ordered longest-first so a linear scan is a
/// longest-match scan (`=>` before `=`, `--` before `-`).
const PUNCTUATORS: &[&str] = &[
    ">>>=",
    "...",
    "===",
    "!==",
    "**=",
    "<<=",
    ">>=",
    ">>>",
    "&&=",
    "||=",
    "??=",
    "=>",
    "==",
    "!=",
    "<=",
    ">=",
    "&&",
    "||",
    "??",
    "?.",
    "++",
    "--",
    "+=",
    "-=",
    "*=",
    "/=",
    "%=",
    "&=",
    "|=",
    "^=",
    "<<",
    ">>",
    "**",
    "{",
    "}",
    "(",
    ")",
    "[",
    "]",
    ";",
    ",",
    "<",
    ">",
    "+",
    "-",
    "*",
    "/",
    "%",
    "&",
    "|",
    "^",
    "!",
    "~",
    "?",
    ":",
    "=",
    ".",
];

/// Longest punctuator the given text starts with, if any. Shared with the
/// stringifier, which uses it to decide when two adjacent punctuators would
/// merge into a longer one.
pub(crate) fn punctuator_prefix(text: &str) -> Option<&'static str> {
    PUNCTUATORS.iter().copied().find(|p| text.starts_with(p))
}

/// A scanner that tokenizes module source code.
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Scans the entire source into a token sequence.
    pub fn scan_all(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while self.pos < self.source.len() {
            self.scan_token(&mut tokens)?;
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Scans one lexeme and appends its token(s). Templates append several
    /// tokens (chunk/hole markers); everything else appends exactly one.
    fn scan_token(&mut self, out: &mut Vec<Token>) -> Result<()> {
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Ok(());
        };

        let kind = match ch {
            ' ' | '\t' | '\u{000B}' | '\u{000C}' => {
                while matches!(self.peek(), Some(' ' | '\t' | '\u{000B}' | '\u{000C}')) {
                    self.bump();
                }
                TokenKind::Whitespace
            }
            '\n' => {
                self.bump();
                TokenKind::Newline
            }
            '\r' => {
                self.bump();
                if self.peek() == Some('\n') {
                    self.bump();
                }
                TokenKind::Newline
            }
            '/' if self.peek_at(1) == Some('/') => {
                // Line comment: runs to (not including) the line break
                while !matches!(self.peek(), None | Some('\n') | Some('\r')) {
                    self.bump();
                }
                TokenKind::Comment
            }
            '/' if self.peek_at(1) == Some('*') => {
                self.bump();
                self.bump();
                let mut prev = ' ';
                loop {
                    match self.bump() {
                        None => {
                            return Err(LexError::UnterminatedComment { position: start });
                        }
                        Some('/') if prev == '*' => break,
                        Some(c) => prev = c,
                    }
                }
                TokenKind::Comment
            }
            '"' | '\'' => {
                self.scan_string(ch, start)?;
                TokenKind::String
            }
            '`' => return self.scan_template(out),
            '0'..='9' => {
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
                TokenKind::Number
            }
            '#' => {
                self.bump();
                if !self.peek().is_some_and(is_id_start) {
                    return Err(LexError::UnexpectedCharacter {
                        character: '#',
                        position: start,
                    });
                }
                while self.peek().is_some_and(is_id_continue) {
                    self.bump();
                }
                TokenKind::PrivateIdentifier
            }
            c if is_id_start(c) => {
                while self.peek().is_some_and(is_id_continue) {
                    self.bump();
                }
                if KEYWORDS.binary_search(&&self.source[start..self.pos]).is_ok() {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                }
            }
            _ => match punctuator_prefix(&self.source[self.pos..]) {
                Some(p) => {
                    self.pos += p.len();
                    TokenKind::Punctuator
                }
                None => {
                    return Err(LexError::UnexpectedCharacter {
                        character: ch,
                        position: start,
                    });
                }
            },
        };

        out.push(Token::new(kind, &self.source[start..self.pos]));
        Ok(())
    }

    fn scan_string(&mut self, quote: char, start: usize) -> Result<()> {
        self.bump(); // opening quote
        loop {
            match self.peek() {
                None => return Err(LexError::UnterminatedString { position: start }),
                Some('\\') => {
                    self.bump();
                    if self.bump().is_none() {
                        return Err(LexError::UnterminatedString { position: start });
                    }
                }
                Some(c) => {
                    self.bump();
                    if c == quote {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Scans a template literal into a flat marker-delimited run:
    /// chunk, then per hole `${`-marker / inner tokens / `}`-marker, then the
    /// next chunk or the closing tail. A hole-free template is one chunk.
    fn scan_template(&mut self, out: &mut Vec<Token>) -> Result<()> {
        let open = self.pos;
        let mut seg_start = self.pos;
        self.bump(); // opening backtick
        loop {
            match self.peek() {
                None => return Err(LexError::UnterminatedTemplate { position: open }),
                Some('\\') => {
                    self.bump();
                    if self.bump().is_none() {
                        return Err(LexError::UnterminatedTemplate { position: open });
                    }
                }
                Some('`') => {
                    self.bump();
                    let text = &self.source[seg_start..self.pos];
                    let kind = if text.starts_with('`') {
                        TokenKind::TemplateChunk
                    } else {
                        TokenKind::TemplateTail
                    };
                    out.push(Token::new(kind, text));
                    return Ok(());
                }
                Some('$') if self.peek_at(1) == Some('{') => {
                    if self.pos > seg_start {
                        out.push(Token::new(
                            TokenKind::TemplateChunk,
                            &self.source[seg_start..self.pos],
                        ));
                    }
                    self.bump();
                    self.bump();
                    out.push(Token::new(TokenKind::TemplateExprStart, "${"));
                    self.scan_hole(out)?;
                    seg_start = self.pos;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Scans the interior of a `${...}` hole with the ordinary rules,
    /// tracking brace depth so object literals inside the hole do not end it.
    /// Nested templates recurse through `scan_token`.
    fn scan_hole(&mut self, out: &mut Vec<Token>) -> Result<()> {
        let open = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => return Err(LexError::UnterminatedTemplate { position: open }),
                Some('}') if depth == 0 => {
                    self.bump();
                    out.push(Token::new(TokenKind::TemplateExprEnd, "}"));
                    return Ok(());
                }
                Some(_) => {
                    let before = out.len();
                    self.scan_token(out)?;
                    for tok in &out[before..] {
                        if tok.is_punct("{") {
                            depth += 1;
                        } else if tok.is_punct("}") {
                            depth -= 1;
                        }
                    }
                }
            }
        }
    }
}

/// Checks if a character can start an identifier.
fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_xid::UnicodeXID::is_xid_start(ch)
}

/// Checks if a character can continue an identifier.
fn is_id_continue(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_xid::UnicodeXID::is_xid_continue(ch)
}
