// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Token-to-source reserialization.
//!
//! Concatenates token texts, inserting a single space only where two adjacent
//! tokens would otherwise merge into one lexeme. Original layout is not
//! preserved; the only guarantee is that the output re-tokenizes to the same
//! stream.

use crate::lexer::{Token, TokenKind, punctuator_prefix};

/// Reserializes a token sequence into source text.
///
/// A space goes between two word-like tokens (`import A`, `1 in`), and
/// between two punctuators whose concatenation would lex as a longer
/// punctuator (`+`·`++`) or form the disallowed `-->` sequence. Strings,
/// templates, and brackets are self-delimiting and never need separation.
pub fn stringify(tokens: &[Token]) -> String {
    let mut out = String::new();
    for (i, tok) in tokens.iter().enumerate() {
        if i > 0 && needs_space(&tokens[i - 1], tok) {
            out.push(' ');
        }
        out.push_str(&tok.text);
    }
    out
}

fn needs_space(prev: &Token, next: &Token) -> bool {
    if prev.kind.is_word_like() && next.kind.is_word_like() {
        return true;
    }
    if prev.kind == TokenKind::Punctuator && next.kind == TokenKind::Punctuator {
        // `-->` opens an HTML-like comment even though `--` and `>` both
        // survive longest-match intact
        if prev.text == "--" && next.text.starts_with('>') {
            return true;
        }
        return merges_longer(&prev.text, &next.text);
    }
    false
}

/// True when lexing `prev` directly followed by `next` would consume more
/// than `prev` as the first punctuator (e.g. `+` then `++` lexes as `++` `+`).
fn merges_longer(prev: &str, next: &str) -> bool {
    let joined = format!("{prev}{next}");
    match punctuator_prefix(&joined) {
        Some(p) => p.len() > prev.len(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Token, TokenKind, lex};

    #[test]
    fn test_word_word_spacing() {
        let tokens = vec![
            Token::keyword("import"),
            Token::identifier("DefaultExport"),
            Token::identifier("from"),
            Token::new(TokenKind::String, "\"mod\""),
            Token::punctuator(";"),
        ];
        assert_eq!(stringify(&tokens), "import DefaultExport from\"mod\";");
    }

    #[test]
    fn test_named_import_shape() {
        let tokens = vec![
            Token::keyword("import"),
            Token::punctuator("{"),
            Token::identifier("a"),
            Token::punctuator(","),
            Token::identifier("b"),
            Token::punctuator("}"),
            Token::identifier("from"),
            Token::new(TokenKind::String, "\"x\""),
            Token::punctuator(";"),
        ];
        assert_eq!(stringify(&tokens), "import{a,b}from\"x\";");
    }

    #[test]
    fn test_star_binding() {
        let tokens = vec![
            Token::keyword("import"),
            Token::punctuator("*"),
            Token::identifier("as"),
            Token::identifier("NS"),
            Token::identifier("from"),
            Token::new(TokenKind::String, "\"lib\""),
        ];
        assert_eq!(stringify(&tokens), "import*as NS from\"lib\"");
    }

    #[test]
    fn test_number_identifier_spacing() {
        let tokens = vec![
            Token::keyword("import"),
            Token::new(TokenKind::Number, "1"),
            Token::keyword("in"),
        ];
        assert_eq!(stringify(&tokens), "import 1 in");
    }

    #[test]
    fn test_private_identifier_spacing() {
        let tokens = vec![
            Token::keyword("import"),
            Token::new(TokenKind::PrivateIdentifier, "#x"),
        ];
        assert_eq!(stringify(&tokens), "import #x");
    }

    #[test]
    fn test_template_is_self_delimiting() {
        let tokens = vec![
            Token::keyword("export"),
            Token::keyword("default"),
            Token::new(TokenKind::TemplateChunk, "`x`"),
        ];
        assert_eq!(stringify(&tokens), "export default`x`");
    }

    #[test]
    fn test_punctuator_merge_guard() {
        let plus = vec![Token::punctuator("+"), Token::punctuator("++")];
        assert_eq!(stringify(&plus), "+ ++");

        let minus = vec![Token::punctuator("-"), Token::punctuator("--")];
        assert_eq!(stringify(&minus), "- --");

        let html_close = vec![Token::punctuator("--"), Token::punctuator(">")];
        assert_eq!(stringify(&html_close), "-- >");

        let arrow = vec![Token::punctuator("="), Token::punctuator(">")];
        assert_eq!(stringify(&arrow), "= >");
    }

    #[test]
    fn test_harmless_punctuator_pairs_stay_tight() {
        let tokens = vec![
            Token::punctuator(")"),
            Token::punctuator("("),
            Token::punctuator(";"),
            Token::punctuator("}"),
        ];
        assert_eq!(stringify(&tokens), ")(;}");
    }

    #[test]
    fn test_round_trip_with_trivia_retained() {
        // With trivia still in the stream no separator is ever needed, so
        // reserialization is byte-exact.
        let sources = [
            "import DefaultExport from \"module-1\"; // note\n",
            "let a = 1;\r\n\tlet b = a + 2; /* x */",
            "export default function f() {\n  return `v-${a}`;\n}",
        ];
        for source in sources {
            assert_eq!(stringify(&lex(source).unwrap()), source);
        }
    }

    #[test]
    fn test_round_trip_after_trivia_filter() {
        let source = "export()=>`Hello`";
        let cleaned: Vec<Token> = lex(source)
            .unwrap()
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        assert_eq!(stringify(&cleaned), source);
    }

    #[test]
    fn test_stringify_retokenizes_identically() {
        let sources = [
            "a- --b",
            "import cfg from\"conf.json\"assert{type:\"json\"}export cfg",
            "export default()=>x",
        ];
        for source in sources {
            let cleaned: Vec<Token> = lex(source)
                .unwrap()
                .into_iter()
                .filter(|t| !t.kind.is_trivia())
                .collect();
            let rebuilt = stringify(&cleaned);
            let recleaned: Vec<Token> = lex(&rebuilt)
                .unwrap()
                .into_iter()
                .filter(|t| !t.kind.is_trivia())
                .collect();
            assert_eq!(cleaned, recleaned);
        }
    }
}
