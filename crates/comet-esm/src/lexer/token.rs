// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Token definitions for the module-syntax lexer.

/// The different kinds of tokens in the restricted module grammar.
///
/// The set is closed: every downstream stage matches exhaustively on it.
/// Contextual words (`from`, `as`, `assert`, `async`) surface as
/// [`TokenKind::Identifier`]; reserved words surface as [`TokenKind::Keyword`].
/// Stages that care about those words must dispatch on the token *text*, not
/// the kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Reserved word (`import`, `export`, `const`, ...)
    Keyword,
    /// Identifier, including contextual words like `from` and `as`
    Identifier,
    /// Private identifier (`#name`)
    PrivateIdentifier,
    /// Operator or delimiter from the fixed punctuator table
    Punctuator,
    /// String literal, quotes and escapes kept verbatim
    String,
    /// Numeric literal (decimal digit run)
    Number,
    /// Template segment from the opening backtick (or a previous hole) up to
    /// the next `${` or, for a hole-free template, the closing backtick
    TemplateChunk,
    /// The `${` opening a template expression hole
    TemplateExprStart,
    /// The `}` closing a template expression hole
    TemplateExprEnd,
    /// Final template segment after the last hole, through the closing backtick
    TemplateTail,
    /// Run of spaces/tabs
    Whitespace,
    /// Single line break (`\n`, `\r`, or `\r\n`)
    Newline,
    /// Line or block comment, delimiters included
    Comment,
}

impl TokenKind {
    /// Returns true for trivia kinds: stripped before extraction/rewriting.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::Comment
        )
    }

    /// Returns true if tokens of this kind begin and end with word characters,
    /// meaning two adjacent ones would merge into a single lexeme.
    pub fn is_word_like(&self) -> bool {
        matches!(
            self,
            TokenKind::Keyword
                | TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::PrivateIdentifier
        )
    }

    /// Returns true for the template-family kinds.
    pub fn is_template_part(&self) -> bool {
        matches!(
            self,
            TokenKind::TemplateChunk
                | TokenKind::TemplateExprStart
                | TokenKind::TemplateExprEnd
                | TokenKind::TemplateTail
        )
    }
}

/// A token produced by the lexer.
///
/// `text` is the exact source span; concatenating the `text` of every token a
/// lex produces (trivia included) reproduces the input byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The exact source text of the token
    pub text: String,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Creates a keyword token.
    pub fn keyword(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Keyword, text)
    }

    /// Creates an identifier token.
    pub fn identifier(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Identifier, text)
    }

    /// Creates a punctuator token.
    pub fn punctuator(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Punctuator, text)
    }

    /// Returns true if this token is the given punctuator.
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.text == text
    }

    /// Returns true if this token is a keyword or identifier with the given
    /// text. Contextual words drift between the two kinds, so module-grammar
    /// dispatch goes through here.
    pub fn is_word(&self, text: &str) -> bool {
        matches!(self.kind, TokenKind::Keyword | TokenKind::Identifier) && self.text == text
    }

    /// Returns true if this token can name an import/export binding
    /// (identifier, or a keyword like `default` inside a braced list).
    pub fn is_binding_name(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword | TokenKind::Identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_new() {
        let token = Token::new(TokenKind::Number, "42");
        assert_eq!(token.kind, TokenKind::Number);
        assert_eq!(token.text, "42");
    }

    #[test]
    fn test_token_equality() {
        let t1 = Token::punctuator("+");
        let t2 = Token::punctuator("+");
        let t3 = Token::punctuator("-");

        assert_eq!(t1, t2);
        assert_ne!(t1, t3);
    }

    #[test]
    fn test_is_trivia() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::Newline.is_trivia());
        assert!(TokenKind::Comment.is_trivia());
        assert!(!TokenKind::Keyword.is_trivia());
        assert!(!TokenKind::Punctuator.is_trivia());
        assert!(!TokenKind::TemplateChunk.is_trivia());
    }

    #[test]
    fn test_is_word_like() {
        assert!(TokenKind::Keyword.is_word_like());
        assert!(TokenKind::Identifier.is_word_like());
        assert!(TokenKind::Number.is_word_like());
        assert!(TokenKind::PrivateIdentifier.is_word_like());
        assert!(!TokenKind::Punctuator.is_word_like());
        assert!(!TokenKind::String.is_word_like());
        assert!(!TokenKind::TemplateChunk.is_word_like());
    }

    #[test]
    fn test_is_template_part() {
        assert!(TokenKind::TemplateChunk.is_template_part());
        assert!(TokenKind::TemplateExprStart.is_template_part());
        assert!(TokenKind::TemplateExprEnd.is_template_part());
        assert!(TokenKind::TemplateTail.is_template_part());
        assert!(!TokenKind::String.is_template_part());
    }

    #[test]
    fn test_is_punct() {
        assert!(Token::punctuator(";").is_punct(";"));
        assert!(!Token::punctuator(";").is_punct(","));
        // Same text, wrong kind
        assert!(!Token::new(TokenKind::String, ";").is_punct(";"));
    }

    #[test]
    fn test_is_word_matches_either_kind() {
        // `with` lexes as a keyword but appears in attribute positions
        assert!(Token::keyword("with").is_word("with"));
        assert!(Token::identifier("with").is_word("with"));
        assert!(!Token::punctuator("*").is_word("*"));
        assert!(!Token::identifier("from").is_word("as"));
    }
}
