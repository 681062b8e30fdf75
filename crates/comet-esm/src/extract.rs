// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module-reference metadata extraction.
//!
//! Scans a trivia-free token stream for `import`/`export` occurrences and
//! records every module reference: its specifier, whether it is static,
//! dynamic, or a re-export, any attribute clause, and whether the specifier
//! is a literal string. The scan is flat: `import` and `export` cannot
//! appear as ordinary identifiers in this grammar subset, so no brace-depth
//! tracking is needed and dynamic `import(...)` calls are found at any
//! nesting depth.
//!
//! Extraction never fails: an occurrence whose lookahead matches no known
//! form simply yields no record.

use std::collections::HashMap;

use serde::Serialize;

use crate::lexer::{Token, TokenKind};
use crate::rewrite::find_destructure_end;
use crate::stringify::stringify;

/// Reason recorded when a specifier is a template literal with holes.
const TEMPLATE_LITERAL: &str = "template-literal";

/// How a module reference was introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// `import ... from "m"` or bare `import "m";`
    Static,
    /// `import(...)` call
    Dynamic,
    /// `export ... from "m"`
    #[serde(rename = "export")]
    ReExport,
}

/// One module reference found in a source file.
///
/// Serializes as `{specifier, kind, attributes, isLiteral, nonLiteralReason}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleReference {
    /// The specifier text. Quoted strings are stored unquoted; template
    /// literals and other expressions keep their full original text.
    pub specifier: String,
    /// How the reference was introduced
    pub kind: ReferenceKind,
    /// Key/value pairs from an `assert{...}`/`with{...}` clause or a dynamic
    /// call's options object; `None` when no clause was present
    pub attributes: Option<HashMap<String, String>>,
    /// False only when the specifier is a template literal with holes
    pub is_literal: bool,
    /// Set iff `is_literal` is false; currently always `"template-literal"`
    pub non_literal_reason: Option<String>,
}

/// Extracts every module reference from a trivia-free token stream, in
/// source order.
pub fn extract_references(tokens: &[Token]) -> Vec<ModuleReference> {
    let mut refs = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let matched = if tokens[i].is_word("import") {
            match_import(tokens, i)
        } else if tokens[i].is_word("export") {
            match_reexport(tokens, i)
        } else {
            None
        };
        match matched {
            Some((reference, next)) => {
                refs.push(reference);
                i = next;
            }
            None => i += 1,
        }
    }
    refs
}

fn match_import(tokens: &[Token], i: usize) -> Option<(ModuleReference, usize)> {
    if tokens.get(i + 1).is_some_and(|t| t.is_punct("(")) {
        return match_dynamic_import(tokens, i);
    }
    match_static_import(tokens, i)
}

fn match_static_import(tokens: &[Token], i: usize) -> Option<(ModuleReference, usize)> {
    let mut j = i + 1;

    let module_idx = if tokens.get(j)?.kind == TokenKind::String {
        // side-effect form
        j += 1;
        j - 1
    } else {
        if tokens.get(j)?.kind == TokenKind::Identifier {
            // default binding
            j += 1;
            if tokens.get(j).is_some_and(|t| t.is_punct(",")) {
                j += 1;
            }
        }
        if tokens.get(j)?.is_punct("{") {
            j = skip_named_list(tokens, j)?;
        } else if tokens.get(j)?.is_punct("*") {
            if !tokens.get(j + 1)?.is_word("as") {
                return None;
            }
            if tokens.get(j + 2)?.kind != TokenKind::Identifier {
                return None;
            }
            j += 3;
        }
        if !tokens.get(j)?.is_word("from") {
            return None;
        }
        j += 1;
        if tokens.get(j)?.kind != TokenKind::String {
            return None;
        }
        j += 1;
        j - 1
    };

    let mut attributes = None;
    if let Some((pairs, after)) = parse_attribute_clause(tokens, j) {
        attributes = Some(pairs);
        j = after;
    }
    if tokens.get(j).is_some_and(|t| t.is_punct(";")) {
        j += 1;
    }

    Some((
        ModuleReference {
            specifier: unquote(&tokens[module_idx].text),
            kind: ReferenceKind::Static,
            attributes,
            is_literal: true,
            non_literal_reason: None,
        },
        j,
    ))
}

fn match_dynamic_import(tokens: &[Token], i: usize) -> Option<(ModuleReference, usize)> {
    // Specifier expression: everything up to the first argument-level `,`
    // or the call's `)`. Template holes are opaque so a comma inside
    // `${...}` does not end the argument.
    let start = i + 2;
    let mut j = start;
    let mut depth = 0i32;
    let mut hole = 0i32;
    loop {
        let t = tokens.get(j)?;
        match t.kind {
            TokenKind::TemplateExprStart => hole += 1,
            TokenKind::TemplateExprEnd => hole -= 1,
            TokenKind::Punctuator if hole == 0 => match t.text.as_str() {
                "(" | "[" | "{" => depth += 1,
                ")" | "," if depth == 0 => break,
                ")" | "]" | "}" => depth -= 1,
                _ => {}
            },
            _ => {}
        }
        j += 1;
    }

    let expr = &tokens[start..j];
    if expr.is_empty() {
        return None;
    }
    let (specifier, is_literal, non_literal_reason) = classify_specifier(expr);

    let mut attributes = None;
    let mut k = j;
    if tokens[k].is_punct(",") {
        k += 1;
        if tokens.get(k).is_some_and(|t| t.is_punct("{")) {
            let close = find_destructure_end(tokens, k)?;
            attributes = Some(parse_dynamic_options(&tokens[k + 1..close]));
            k = close + 1;
        }
    }

    // Consume through the call's closing paren; any chained `.then(...)` is
    // left for the ordinary scan.
    let mut depth = 0i32;
    while let Some(t) = tokens.get(k) {
        if t.kind == TokenKind::Punctuator {
            match t.text.as_str() {
                "(" => depth += 1,
                ")" if depth == 0 => {
                    k += 1;
                    break;
                }
                ")" => depth -= 1,
                _ => {}
            }
        }
        k += 1;
    }

    Some((
        ModuleReference {
            specifier,
            kind: ReferenceKind::Dynamic,
            attributes,
            is_literal,
            non_literal_reason,
        },
        k,
    ))
}

fn match_reexport(tokens: &[Token], i: usize) -> Option<(ModuleReference, usize)> {
    let mut j = i + 1;
    if tokens.get(j)?.is_punct("*") {
        j += 1;
        if tokens.get(j).is_some_and(|t| t.is_word("as")) {
            j += 1;
            if !tokens.get(j)?.is_binding_name() {
                return None;
            }
            j += 1;
        }
    } else if tokens.get(j)?.is_punct("{") {
        j = skip_named_list(tokens, j)?;
    } else {
        return None;
    }

    if !tokens.get(j)?.is_word("from") {
        return None;
    }
    j += 1;

    let (specifier, is_literal, non_literal_reason, mut j) = read_module_ref(tokens, j)?;

    let mut attributes = None;
    if let Some((pairs, after)) = parse_attribute_clause(tokens, j) {
        attributes = Some(pairs);
        j = after;
    }
    if tokens.get(j).is_some_and(|t| t.is_punct(";")) {
        j += 1;
    }

    Some((
        ModuleReference {
            specifier,
            kind: ReferenceKind::ReExport,
            attributes,
            is_literal,
            non_literal_reason,
        },
        j,
    ))
}

/// Skips a `{ name [as alias], ... }` list, returning the index just past
/// the closing brace. `None` when the list is malformed or unclosed.
fn skip_named_list(tokens: &[Token], open: usize) -> Option<usize> {
    let mut j = open + 1;
    loop {
        if tokens.get(j)?.is_punct("}") {
            return Some(j + 1);
        }
        if !tokens.get(j)?.is_binding_name() {
            return None;
        }
        j += 1;
        if tokens.get(j).is_some_and(|t| t.is_word("as")) {
            j += 1;
            if !tokens.get(j)?.is_binding_name() {
                return None;
            }
            j += 1;
        }
        if tokens.get(j).is_some_and(|t| t.is_punct(",")) {
            j += 1;
        } else if !tokens.get(j)?.is_punct("}") {
            return None;
        }
    }
}

/// Reads the module reference after `from`: a string (unquoted), a template
/// (verbatim, non-literal when it has holes), or a bare word (verbatim).
fn read_module_ref(tokens: &[Token], j: usize) -> Option<(String, bool, Option<String>, usize)> {
    let t = tokens.get(j)?;
    match t.kind {
        TokenKind::String => Some((unquote(&t.text), true, None, j + 1)),
        TokenKind::Keyword | TokenKind::Identifier => Some((t.text.clone(), true, None, j + 1)),
        TokenKind::TemplateChunk => {
            if t.text.ends_with('`') && t.text.len() >= 2 {
                // hole-free template: a single self-contained chunk
                let literal = !t.text.contains("${");
                let reason = (!literal).then(|| TEMPLATE_LITERAL.to_string());
                Some((t.text.clone(), literal, reason, j + 1))
            } else {
                let mut k = j;
                let mut depth = 0i32;
                loop {
                    let tok = tokens.get(k)?;
                    match tok.kind {
                        TokenKind::TemplateExprStart => depth += 1,
                        TokenKind::TemplateExprEnd => depth -= 1,
                        TokenKind::TemplateTail if depth == 0 => {
                            k += 1;
                            break;
                        }
                        _ => {}
                    }
                    k += 1;
                }
                Some((
                    stringify(&tokens[j..k]),
                    false,
                    Some(TEMPLATE_LITERAL.to_string()),
                    k,
                ))
            }
        }
        _ => None,
    }
}

/// Classifies a dynamic-import specifier expression.
fn classify_specifier(expr: &[Token]) -> (String, bool, Option<String>) {
    if expr.len() == 1 && expr[0].kind == TokenKind::String {
        return (unquote(&expr[0].text), true, None);
    }
    let text = stringify(expr);
    if expr[0].kind == TokenKind::TemplateChunk && text.contains("${") {
        (text, false, Some(TEMPLATE_LITERAL.to_string()))
    } else {
        (text, true, None)
    }
}

/// Parses an `assert { ... }` / `with { ... }` clause at `i`. Returns the
/// pairs and the index just past the clause, or `None` when no clause starts
/// there.
fn parse_attribute_clause(
    tokens: &[Token],
    i: usize,
) -> Option<(HashMap<String, String>, usize)> {
    let word = tokens.get(i)?;
    if !(word.is_word("assert") || word.is_word("with")) {
        return None;
    }
    if !tokens.get(i + 1)?.is_punct("{") {
        return None;
    }
    let close = find_destructure_end(tokens, i + 1)?;
    Some((parse_attribute_pairs(&tokens[i + 2..close]), close + 1))
}

/// Parses a dynamic call's options object (the tokens between its braces).
/// When the first top-level key is `with` or `assert` with an object value,
/// the nested object's pairs are the attributes; otherwise the top-level
/// pairs are used directly.
fn parse_dynamic_options(tokens: &[Token]) -> HashMap<String, String> {
    if let (Some(key), Some(colon)) = (tokens.first(), tokens.get(1)) {
        if colon.is_punct(":")
            && (key.is_word("with") || key.is_word("assert"))
            && tokens.get(2).is_some_and(|t| t.is_punct("{"))
        {
            if let Some(close) = find_destructure_end(tokens, 2) {
                return parse_attribute_pairs(&tokens[3..close]);
            }
        }
    }
    parse_attribute_pairs(tokens)
}

/// Collects `key: value` pairs from the tokens between an object's braces.
/// String values (and keys) are unquoted; any other value keeps its raw
/// text. Malformed entries are skipped, not rejected.
fn parse_attribute_pairs(tokens: &[Token]) -> HashMap<String, String> {
    let mut pairs = HashMap::new();
    let mut i = 0;
    while i < tokens.len() {
        let key = &tokens[i];
        let keyed = matches!(
            key.kind,
            TokenKind::Keyword | TokenKind::Identifier | TokenKind::String
        ) && tokens.get(i + 1).is_some_and(|t| t.is_punct(":"));
        if !keyed {
            i += 1;
            continue;
        }

        let start = i + 2;
        let mut j = start;
        let mut depth = 0i32;
        while let Some(t) = tokens.get(j) {
            if t.kind == TokenKind::Punctuator {
                match t.text.as_str() {
                    "(" | "[" | "{" => depth += 1,
                    "," if depth == 0 => break,
                    ")" | "]" | "}" => depth -= 1,
                    _ => {}
                }
            }
            j += 1;
        }

        let value_tokens = &tokens[start..j];
        let value = if value_tokens.len() == 1 && value_tokens[0].kind == TokenKind::String {
            unquote(&value_tokens[0].text)
        } else {
            stringify(value_tokens)
        };
        pairs.insert(unquote(&key.text), value);
        i = j + 1;
    }
    pairs
}

/// Strips matching enclosing quote characters, if present.
fn unquote(text: &str) -> String {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'"' || bytes[0] == b'\'') && bytes[bytes.len() - 1] == bytes[0]
    {
        text[1..text.len() - 1].to_string()
    } else {
        text.to_string()
    }
}
