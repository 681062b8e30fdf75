// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Import-side statement rewriting.
//!
//! Static `import` declarations become one `const NAME = require(MODULE)`
//! declaration per binding; dynamic `import(...)` calls are retargeted at a
//! configurable loader identifier. Anything that does not match a known form
//! is copied through unchanged; this stage never fails.

use super::boundary::find_destructure_end;
use crate::lexer::{Token, TokenKind};

/// Rewrites import forms in a trivia-free token stream, producing a new
/// stream. `loader` is the identifier substituted for dynamic `import`
/// call sites.
///
/// Non-matching `import` occurrences are copied through and scanning resumes
/// at the very next token; no tokens are ever dropped on a non-match.
pub fn rewrite_imports(tokens: &[Token], loader: &str) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].is_word("import") {
            if tokens.get(i + 1).is_some_and(|t| t.is_punct("(")) {
                // Dynamic call: only the `import` token changes; arguments,
                // option objects, and any trailing chain pass through.
                out.push(Token::identifier(loader));
                i += 1;
                continue;
            }
            if let Some(decl) = parse_static_import(tokens, i) {
                emit_bindings(&mut out, &decl);
                i = decl.end;
                continue;
            }
        }
        out.push(tokens[i].clone());
        i += 1;
    }
    out
}

/// A recognized static import statement.
struct StaticImport {
    default: Option<String>,
    namespace: Option<String>,
    /// (imported name, alias)
    named: Vec<(String, Option<String>)>,
    module: Token,
    side_effect: bool,
    /// Index just past the consumed statement
    end: usize,
}

fn parse_static_import(tokens: &[Token], i: usize) -> Option<StaticImport> {
    let mut default = None;
    let mut namespace = None;
    let mut named = Vec::new();
    let mut side_effect = false;
    let module;
    let mut j = i + 1;

    if tokens.get(j)?.kind == TokenKind::String {
        module = tokens[j].clone();
        side_effect = true;
        j += 1;
    } else {
        if tokens.get(j)?.kind == TokenKind::Identifier {
            default = Some(tokens[j].text.clone());
            j += 1;
            if tokens.get(j).is_some_and(|t| t.is_punct(",")) {
                j += 1;
            }
        }
        if tokens.get(j)?.is_punct("{") {
            j += 1;
            loop {
                if tokens.get(j)?.is_punct("}") {
                    j += 1;
                    break;
                }
                let imported = tokens.get(j)?;
                if !imported.is_binding_name() {
                    return None;
                }
                let imported = imported.text.clone();
                j += 1;
                let mut alias = None;
                if tokens.get(j).is_some_and(|t| t.is_word("as")) {
                    let local = tokens.get(j + 1)?;
                    if !local.is_binding_name() {
                        return None;
                    }
                    alias = Some(local.text.clone());
                    j += 2;
                }
                named.push((imported, alias));
                if tokens.get(j).is_some_and(|t| t.is_punct(",")) {
                    j += 1;
                } else if !tokens.get(j)?.is_punct("}") {
                    return None;
                }
            }
        } else if tokens.get(j)?.is_punct("*") {
            if !tokens.get(j + 1)?.is_word("as") {
                return None;
            }
            let ns = tokens.get(j + 2)?;
            if ns.kind != TokenKind::Identifier {
                return None;
            }
            namespace = Some(ns.text.clone());
            j += 3;
        }
        if default.is_none() && namespace.is_none() && named.is_empty() {
            return None;
        }
        if !tokens.get(j)?.is_word("from") {
            return None;
        }
        j += 1;
        // A non-string specifier (template literal, identifier) is not a
        // recognized static form; the whole statement passes through.
        if tokens.get(j)?.kind != TokenKind::String {
            return None;
        }
        module = tokens[j].clone();
        j += 1;
    }

    // Attribute clause: consumed here, dropped from the output
    if tokens
        .get(j)
        .is_some_and(|t| t.is_word("assert") || t.is_word("with"))
        && tokens.get(j + 1).is_some_and(|t| t.is_punct("{"))
    {
        let close = find_destructure_end(tokens, j + 1)?;
        j = close + 1;
    }
    if tokens.get(j).is_some_and(|t| t.is_punct(";")) {
        j += 1;
    }

    Some(StaticImport {
        default,
        namespace,
        named,
        module,
        side_effect,
        end: j,
    })
}

fn emit_bindings(out: &mut Vec<Token>, decl: &StaticImport) {
    if decl.side_effect {
        push_require(out, &decl.module);
        out.push(Token::punctuator(";"));
        return;
    }

    if let Some(ns) = &decl.namespace {
        push_const(out, ns);
        push_require(out, &decl.module);
        out.push(Token::punctuator(";"));
        // The default binding derives from the namespace so the module is
        // evaluated once, not twice.
        if let Some(default) = &decl.default {
            push_const(out, default);
            out.push(Token::identifier(ns.as_str()));
            out.push(Token::punctuator("."));
            out.push(Token::identifier("default"));
            out.push(Token::punctuator(";"));
        }
        return;
    }

    if let Some(default) = &decl.default {
        push_const(out, default);
        push_require(out, &decl.module);
        out.push(Token::punctuator("."));
        out.push(Token::identifier("default"));
        out.push(Token::punctuator(";"));
    }
    for (imported, alias) in &decl.named {
        push_const(out, alias.as_ref().unwrap_or(imported));
        push_require(out, &decl.module);
        out.push(Token::punctuator("."));
        out.push(Token::identifier(imported.as_str()));
        out.push(Token::punctuator(";"));
    }
}

fn push_const(out: &mut Vec<Token>, name: &str) {
    out.push(Token::keyword("const"));
    out.push(Token::identifier(name));
    out.push(Token::punctuator("="));
}

fn push_require(out: &mut Vec<Token>, module: &Token) {
    out.push(Token::identifier("require"));
    out.push(Token::punctuator("("));
    out.push(module.clone());
    out.push(Token::punctuator(")"));
}
