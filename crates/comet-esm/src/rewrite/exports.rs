// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Export-side statement rewriting.
//!
//! Export declarations keep their declaration and gain `exports.X = X;`
//! assignments; re-export forms become `require(...)` plumbing. Anything
//! unrecognized passes through unchanged, including `export class` and the
//! anonymous `export default EXPRESSION;` form (its rewrite is deliberately
//! left open). This stage never fails.

use super::boundary::find_destructure_end;
use crate::lexer::{Token, TokenKind};

/// Rewrites export forms in a trivia-free token stream, producing a new
/// stream. Runs before the import rewriter so that a retained function body
/// still exposes its dynamic `import(...)` calls to it.
pub fn rewrite_exports(tokens: &[Token]) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].is_word("export") {
            if let Some(next) = rewrite_export_at(&mut out, tokens, i) {
                i = next;
                continue;
            }
        }
        out.push(tokens[i].clone());
        i += 1;
    }
    out
}

/// Dispatches on the token after `export`. Returns the resume index on a
/// recognized form; `None` leaves the stream to the pass-through path.
/// Parsing completes before anything is emitted, so a late mismatch never
/// leaves partial output behind.
fn rewrite_export_at(out: &mut Vec<Token>, tokens: &[Token], i: usize) -> Option<usize> {
    let next = tokens.get(i + 1)?;
    if next.is_word("const") || next.is_word("let") || next.is_word("var") {
        return rewrite_var_declaration(out, tokens, i);
    }
    if next.is_punct("{") {
        return rewrite_named_list(out, tokens, i);
    }
    if next.is_punct("*") {
        return rewrite_star(out, tokens, i);
    }
    if next.is_word("default") {
        return rewrite_default_declaration(out, tokens, i);
    }
    if next.is_word("function")
        || (next.is_word("async") && tokens.get(i + 2).is_some_and(|t| t.is_word("function")))
    {
        return rewrite_function_declaration(out, tokens, i);
    }
    None
}

/// `export const|let|var ...;`: declaration kept verbatim (minus `export`),
/// one `exports.NAME = NAME;` appended per bound name.
fn rewrite_var_declaration(out: &mut Vec<Token>, tokens: &[Token], i: usize) -> Option<usize> {
    let mut names = Vec::new();
    let mut j = i + 2;
    loop {
        let t = tokens.get(j)?;
        if t.kind == TokenKind::Identifier {
            names.push(t.text.clone());
            j += 1;
        } else if t.is_punct("{") || t.is_punct("[") {
            let close = find_destructure_end(tokens, j)?;
            collect_pattern_names(&tokens[j..=close], &mut names);
            j = close + 1;
        } else {
            return None;
        }

        if tokens.get(j).is_some_and(|t| t.is_punct("=")) {
            j = skip_initializer(tokens, j + 1);
        }
        match tokens.get(j) {
            Some(t) if t.is_punct(",") => j += 1,
            Some(t) if t.is_punct(";") => {
                j += 1;
                break;
            }
            None => break,
            Some(_) => return None,
        }
    }
    if names.is_empty() {
        return None;
    }

    out.extend(tokens[i + 1..j].iter().cloned());
    if !tokens[j - 1].is_punct(";") {
        out.push(Token::punctuator(";"));
    }
    for name in &names {
        push_exports_assign(out, name, name);
    }
    Some(j)
}

/// Enumerates every identifier bound inside a destructuring pattern (the
/// slice includes the enclosing brackets). Rename keys before `:` and
/// default-value expressions after `=` are skipped; nesting at any depth is
/// reached by the linear walk.
fn collect_pattern_names(tokens: &[Token], names: &mut Vec<String>) {
    let last = tokens.len() - 1;
    let mut k = 1;
    while k < last {
        let t = &tokens[k];
        if t.kind == TokenKind::Identifier {
            if tokens.get(k + 1).is_some_and(|t| t.is_punct(":")) {
                // rename key; the binding follows the colon
                k += 1;
                continue;
            }
            names.push(t.text.clone());
            k += 1;
            continue;
        }
        if t.is_punct("=") {
            k += 1;
            let mut depth = 0i32;
            while k < last {
                let u = &tokens[k];
                if u.kind == TokenKind::Punctuator {
                    match u.text.as_str() {
                        "(" | "[" | "{" => depth += 1,
                        "," if depth == 0 => break,
                        ")" | "]" | "}" => {
                            if depth == 0 {
                                break;
                            }
                            depth -= 1;
                        }
                        _ => {}
                    }
                }
                k += 1;
            }
            continue;
        }
        k += 1;
    }
}

/// Skips an initializer expression, returning the index of the depth-zero
/// `,` or `;` that ends it (or the stream length).
fn skip_initializer(tokens: &[Token], start: usize) -> usize {
    let mut depth = 0i32;
    let mut j = start;
    while let Some(t) = tokens.get(j) {
        if t.kind == TokenKind::Punctuator {
            match t.text.as_str() {
                "(" | "[" | "{" => depth += 1,
                "," | ";" if depth == 0 => break,
                ")" | "]" | "}" => depth -= 1,
                _ => {}
            }
        }
        j += 1;
    }
    j
}

/// `export { a, b as c };` and `export { ... } from MODREF;`.
fn rewrite_named_list(out: &mut Vec<Token>, tokens: &[Token], i: usize) -> Option<usize> {
    let open = i + 1;
    let close = find_destructure_end(tokens, open)?;

    // (local, alias)
    let mut entries: Vec<(String, Option<String>)> = Vec::new();
    let mut k = open + 1;
    while k < close {
        let local = &tokens[k];
        if !local.is_binding_name() {
            return None;
        }
        let local = local.text.clone();
        let mut alias = None;
        k += 1;
        if k < close && tokens[k].is_word("as") {
            if k + 1 >= close || !tokens[k + 1].is_binding_name() {
                return None;
            }
            alias = Some(tokens[k + 1].text.clone());
            k += 2;
        }
        entries.push((local, alias));
        if k < close {
            if !tokens[k].is_punct(",") {
                return None;
            }
            k += 1;
        }
    }

    let mut j = close + 1;
    if tokens.get(j).is_some_and(|t| t.is_word("from")) {
        let module = tokens.get(j + 1)?;
        if !matches!(
            module.kind,
            TokenKind::String | TokenKind::Identifier | TokenKind::Keyword
        ) {
            return None;
        }
        let module = module.clone();
        j = skip_attribute_clause(tokens, j + 2);
        if tokens.get(j).is_some_and(|t| t.is_punct(";")) {
            j += 1;
        }
        // One independent statement per entry, each with its own require
        for (local, alias) in &entries {
            out.push(Token::identifier("exports"));
            out.push(Token::punctuator("."));
            out.push(Token::identifier(alias.as_ref().unwrap_or(local).as_str()));
            out.push(Token::punctuator("="));
            push_require(out, &module);
            out.push(Token::punctuator("."));
            out.push(Token::identifier(local.as_str()));
            out.push(Token::punctuator(";"));
        }
        return Some(j);
    }

    if tokens.get(j).is_some_and(|t| t.is_punct(";")) {
        j += 1;
    }
    for (local, alias) in &entries {
        if local == "default" {
            // `default as Name` re-exposes Name as the default export
            push_exports_assign(out, "default", alias.as_ref().unwrap_or(local));
        } else {
            push_exports_assign(out, alias.as_ref().unwrap_or(local), local);
        }
    }
    Some(j)
}

/// `export * from MODREF;` and `export * as NAME from MODREF;`.
fn rewrite_star(out: &mut Vec<Token>, tokens: &[Token], i: usize) -> Option<usize> {
    let mut j = i + 2;
    let mut name = None;
    if tokens.get(j).is_some_and(|t| t.is_word("as")) {
        let n = tokens.get(j + 1)?;
        if !n.is_binding_name() {
            return None;
        }
        name = Some(n.text.clone());
        j += 2;
    }
    if !tokens.get(j)?.is_word("from") {
        return None;
    }
    let module = tokens.get(j + 1)?;
    if !matches!(
        module.kind,
        TokenKind::String | TokenKind::Identifier | TokenKind::Keyword
    ) {
        return None;
    }
    let module = module.clone();
    j = skip_attribute_clause(tokens, j + 2);
    if tokens.get(j).is_some_and(|t| t.is_punct(";")) {
        j += 1;
    }

    match name {
        Some(name) => {
            out.push(Token::identifier("exports"));
            out.push(Token::punctuator("."));
            out.push(Token::identifier(name));
            out.push(Token::punctuator("="));
            push_require(out, &module);
            out.push(Token::punctuator(";"));
        }
        None => {
            out.push(Token::identifier("Object"));
            out.push(Token::punctuator("."));
            out.push(Token::identifier("assign"));
            out.push(Token::punctuator("("));
            out.push(Token::identifier("exports"));
            out.push(Token::punctuator(","));
            push_require(out, &module);
            out.push(Token::punctuator(")"));
            out.push(Token::punctuator(";"));
        }
    }
    Some(j)
}

/// `export default function NAME(...){...}` / `export default class NAME{...}`.
/// An anonymous default export is not recognized here and passes through.
fn rewrite_default_declaration(out: &mut Vec<Token>, tokens: &[Token], i: usize) -> Option<usize> {
    let decl_start = i + 2;
    let mut k = decl_start;
    if tokens.get(k).is_some_and(|t| t.is_word("async"))
        && tokens.get(k + 1).is_some_and(|t| t.is_word("function"))
    {
        k += 1;
    }
    let (name, body_close) = if tokens.get(k).is_some_and(|t| t.is_word("function")) {
        function_bounds(tokens, k)?
    } else if tokens.get(k).is_some_and(|t| t.is_word("class")) {
        class_bounds(tokens, k)?
    } else {
        return None;
    };

    out.extend(tokens[decl_start..=body_close].iter().cloned());
    push_exports_assign(out, "default", &name);
    Some(body_close + 1)
}

/// `export [async] function NAME(...){...}` (generators included).
fn rewrite_function_declaration(out: &mut Vec<Token>, tokens: &[Token], i: usize) -> Option<usize> {
    let decl_start = i + 1;
    let func_idx = if tokens[decl_start].is_word("async") {
        decl_start + 1
    } else {
        decl_start
    };
    let (name, body_close) = function_bounds(tokens, func_idx)?;

    out.extend(tokens[decl_start..=body_close].iter().cloned());
    push_exports_assign(out, &name, &name);
    Some(body_close + 1)
}

/// Locates the name and body-closing brace of a function declaration whose
/// `function` keyword sits at `func_idx`. `None` for anonymous functions.
fn function_bounds(tokens: &[Token], func_idx: usize) -> Option<(String, usize)> {
    let mut k = func_idx + 1;
    if tokens.get(k).is_some_and(|t| t.is_punct("*")) {
        k += 1;
    }
    let name_tok = tokens.get(k)?;
    if name_tok.kind != TokenKind::Identifier {
        return None;
    }
    let name = name_tok.text.clone();
    k += 1;

    if !tokens.get(k)?.is_punct("(") {
        return None;
    }
    // Parameter list: parens may nest via default values
    let mut depth = 0i32;
    let mut p = k + 1;
    loop {
        let t = tokens.get(p)?;
        if t.is_punct("(") {
            depth += 1;
        } else if t.is_punct(")") {
            if depth == 0 {
                break;
            }
            depth -= 1;
        }
        p += 1;
    }

    let body_open = p + 1;
    if !tokens.get(body_open)?.is_punct("{") {
        return None;
    }
    let body_close = find_destructure_end(tokens, body_open)?;
    Some((name, body_close))
}

/// Locates the name and body-closing brace of a class declaration whose
/// `class` keyword sits at `class_idx`. Skips a heritage clause.
fn class_bounds(tokens: &[Token], class_idx: usize) -> Option<(String, usize)> {
    let name_tok = tokens.get(class_idx + 1)?;
    if name_tok.kind != TokenKind::Identifier {
        return None;
    }
    let mut k = class_idx + 2;
    let mut depth = 0i32;
    loop {
        let t = tokens.get(k)?;
        if t.kind == TokenKind::Punctuator {
            match t.text.as_str() {
                "(" | "[" => depth += 1,
                ")" | "]" => depth -= 1,
                "{" if depth == 0 => break,
                _ => {}
            }
        }
        k += 1;
    }
    let body_close = find_destructure_end(tokens, k)?;
    Some((name_tok.text.clone(), body_close))
}

/// Consumes an `assert { ... }` / `with { ... }` clause if one starts at
/// `j`, returning the index just past it.
fn skip_attribute_clause(tokens: &[Token], j: usize) -> usize {
    if tokens
        .get(j)
        .is_some_and(|t| t.is_word("assert") || t.is_word("with"))
        && tokens.get(j + 1).is_some_and(|t| t.is_punct("{"))
    {
        if let Some(close) = find_destructure_end(tokens, j + 1) {
            return close + 1;
        }
    }
    j
}

fn push_exports_assign(out: &mut Vec<Token>, exported: &str, value: &str) {
    out.push(Token::identifier("exports"));
    out.push(Token::punctuator("."));
    out.push(Token::identifier(exported));
    out.push(Token::punctuator("="));
    out.push(Token::identifier(value));
    out.push(Token::punctuator(";"));
}

fn push_require(out: &mut Vec<Token>, module: &Token) {
    out.push(Token::identifier("require"));
    out.push(Token::punctuator("("));
    out.push(module.clone());
    out.push(Token::punctuator(")"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::stringify::stringify;

    fn rewrite(source: &str) -> String {
        let tokens: Vec<Token> = lex(source)
            .unwrap()
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        stringify(&rewrite_exports(&tokens))
    }

    #[test]
    fn test_export_const_assignment() {
        assert_eq!(rewrite("export const a = 1;"), "const a=1;exports.a=a;");
    }

    #[test]
    fn test_export_let_without_value() {
        assert_eq!(
            rewrite("export let noValue;"),
            "let noValue;exports.noValue=noValue;"
        );
    }

    #[test]
    fn test_export_var_multiple_declarators() {
        assert_eq!(
            rewrite("export var a = 1, b = 2;"),
            "var a=1,b=2;exports.a=a;exports.b=b;"
        );
    }

    #[test]
    fn test_missing_semicolon_is_added() {
        assert_eq!(rewrite("export const a = 1"), "const a=1;exports.a=a;");
    }

    #[test]
    fn test_destructured_object() {
        assert_eq!(
            rewrite("export const { a, b } = obj;"),
            "const{a,b}=obj;exports.a=a;exports.b=b;"
        );
    }

    #[test]
    fn test_destructured_nested_and_renamed() {
        // b is a rename key, not a binding
        assert_eq!(
            rewrite("export const { a, b: { c, d }, e } = obj;"),
            "const{a,b:{c,d},e}=obj;exports.a=a;exports.c=c;exports.d=d;exports.e=e;"
        );
    }

    #[test]
    fn test_destructured_array_with_defaults() {
        assert_eq!(
            rewrite("export const [x, y = fallback(1, 2)] = pair;"),
            "const[x,y=fallback(1,2)]=pair;exports.x=x;exports.y=y;"
        );
    }

    #[test]
    fn test_destructured_rest() {
        assert_eq!(
            rewrite("export const { a, ...rest } = obj;"),
            "const{a,...rest}=obj;exports.a=a;exports.rest=rest;"
        );
    }

    #[test]
    fn test_named_bindings() {
        assert_eq!(rewrite("export { x, y };"), "exports.x=x;exports.y=y;");
    }

    #[test]
    fn test_named_alias() {
        assert_eq!(rewrite("export { a as b };"), "exports.b=a;");
    }

    #[test]
    fn test_named_default_alias() {
        assert_eq!(rewrite("export { default as Main };"), "exports.default=Main;");
    }

    #[test]
    fn test_default_named_function() {
        assert_eq!(
            rewrite("export default function myFunc(){}"),
            "function myFunc(){}exports.default=myFunc;"
        );
    }

    #[test]
    fn test_default_named_class() {
        assert_eq!(
            rewrite("export default class C{}"),
            "class C{}exports.default=C;"
        );
        assert_eq!(
            rewrite("export default class C extends Base {}"),
            "class C extends Base{}exports.default=C;"
        );
    }

    #[test]
    fn test_plain_function() {
        assert_eq!(
            rewrite("export function greet(){}"),
            "function greet(){}exports.greet=greet;"
        );
    }

    #[test]
    fn test_async_function() {
        assert_eq!(
            rewrite("export async function fetchData(){}"),
            "async function fetchData(){}exports.fetchData=fetchData;"
        );
    }

    #[test]
    fn test_generator_function() {
        assert_eq!(
            rewrite("export function* gen(){yield 1;}"),
            "function*gen(){yield 1;}exports.gen=gen;"
        );
    }

    #[test]
    fn test_function_with_braces_in_params_and_body() {
        assert_eq!(
            rewrite("export function f(a = {}, [b] = []){return {a, b};}"),
            "function f(a={},[b]=[]){return{a,b};}exports.f=f;"
        );
    }

    #[test]
    fn test_export_all_from_string() {
        assert_eq!(
            rewrite(r#"export * from "./mod.js""#),
            r#"Object.assign(exports,require("./mod.js"));"#
        );
    }

    #[test]
    fn test_export_all_from_identifier_verbatim() {
        assert_eq!(
            rewrite("export * from dynamicPath"),
            "Object.assign(exports,require(dynamicPath));"
        );
    }

    #[test]
    fn test_export_namespace_as() {
        assert_eq!(
            rewrite(r#"export * as utils from "./util.js""#),
            r#"exports.utils=require("./util.js");"#
        );
    }

    #[test]
    fn test_reexport_named_each_require() {
        assert_eq!(
            rewrite(r#"export { foo, bar } from "./module-23.js";"#),
            r#"exports.foo=require("./module-23.js").foo;exports.bar=require("./module-23.js").bar;"#
        );
    }

    #[test]
    fn test_reexport_alias_and_default() {
        assert_eq!(
            rewrite(r#"export { baz as myBaz } from "./module-24.js";"#),
            r#"exports.myBaz=require("./module-24.js").baz;"#
        );
        assert_eq!(
            rewrite(r#"export { default as MainComponent, helper } from "./components.js";"#),
            r#"exports.MainComponent=require("./components.js").default;exports.helper=require("./components.js").helper;"#
        );
    }

    #[test]
    fn test_function_body_kept_for_import_rewriter() {
        assert_eq!(
            rewrite(r#"export function getModule(){return import("module-21");}"#),
            r#"function getModule(){return import("module-21");}exports.getModule=getModule;"#
        );
    }

    #[test]
    fn test_unrecognized_forms_pass_through() {
        // Anonymous default export: rewrite strategy is an open question
        assert_eq!(rewrite("export default 123;"), "export default 123;");
        assert_eq!(
            rewrite("export default function(){};"),
            "export default function(){};"
        );
        // export class is not a recognized form
        assert_eq!(rewrite("export class C{}"), "export class C{}");
        // Bare trailing export
        assert_eq!(rewrite("export X"), "export X");
    }

    #[test]
    fn test_input_not_mutated() {
        let tokens: Vec<Token> = lex("export const a = 1;")
            .unwrap()
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        let before = tokens.clone();
        let _ = rewrite_exports(&tokens);
        assert_eq!(tokens, before);
    }
}
