// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The transform pipeline: lex, filter trivia, extract metadata, rewrite
//! exports then imports, reserialize.

use serde::Serialize;

use crate::error::Result;
use crate::extract::{ModuleReference, extract_references};
use crate::lexer::{Token, lex};
use crate::rewrite::{rewrite_exports, rewrite_imports};
use crate::stringify::stringify;

/// Loader identifier substituted for dynamic `import(...)` calls unless the
/// caller provides one.
pub const DEFAULT_LOADER: &str = "requireByHttp";

/// The result of transforming one module source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleTransform {
    /// The rewritten source code
    pub code: String,
    /// Every module reference found, in source order
    pub meta: Vec<ModuleReference>,
}

/// Converts ESM syntax to CJS and extracts module metadata, using the
/// default loader identifier for dynamic imports.
pub fn transform(source: &str) -> Result<ModuleTransform> {
    transform_with_loader(source, DEFAULT_LOADER)
}

/// Converts ESM syntax to CJS and extracts module metadata.
///
/// `loader` names the function substituted for dynamic `import(...)` call
/// sites. It is an explicit parameter rather than process-wide state, so
/// concurrent transforms with different loaders cannot interfere.
pub fn transform_with_loader(source: &str, loader: &str) -> Result<ModuleTransform> {
    let cleaned: Vec<Token> = lex(source)?
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .collect();

    let meta = extract_references(&cleaned);

    // Export rewriting must come first: it can retain a statement body (an
    // exported function, say) whose dynamic import(...) the import rewriter
    // still has to see.
    let rewritten = rewrite_imports(&rewrite_exports(&cleaned), loader);

    Ok(ModuleTransform {
        code: stringify(&rewritten),
        meta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ReferenceKind;

    #[test]
    fn test_default_loader_constant() {
        assert_eq!(DEFAULT_LOADER, "requireByHttp");
    }

    #[test]
    fn test_transform_uses_default_loader() {
        let result = transform(r#"import("module-12");"#).unwrap();
        assert_eq!(result.code, r#"requireByHttp("module-12");"#);
    }

    #[test]
    fn test_transform_with_custom_loader() {
        let result = transform_with_loader(r#"import("module-12");"#, "loadRemote").unwrap();
        assert_eq!(result.code, r#"loadRemote("module-12");"#);
    }

    #[test]
    fn test_export_rewriting_precedes_import_rewriting() {
        let result = transform(r#"export function getModule(){return import("module-21");}"#)
            .unwrap();
        assert_eq!(
            result.code,
            r#"function getModule(){return requireByHttp("module-21");}exports.getModule=getModule;"#
        );
        assert_eq!(result.meta.len(), 1);
        assert_eq!(result.meta[0].kind, ReferenceKind::Dynamic);
        assert_eq!(result.meta[0].specifier, "module-21");
    }

    #[test]
    fn test_lex_error_aborts() {
        assert!(transform("const s = \"unterminated").is_err());
    }

    #[test]
    fn test_meta_reflects_pre_rewrite_stream() {
        let result = transform(r#"import A from "a";export * from "b";"#).unwrap();
        let specifiers: Vec<_> = result.meta.iter().map(|r| r.specifier.as_str()).collect();
        assert_eq!(specifiers, vec!["a", "b"]);
    }
}
