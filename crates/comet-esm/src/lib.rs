// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # comet-esm
//!
//! Converts ES-module syntax (`import`/`export`, dynamic `import(...)`,
//! module-attribute clauses) into the synchronous CommonJS convention
//! (`require(...)`, `exports.x = ...`), while extracting a metadata record
//! for every module reference encountered.
//!
//! ## Pipeline
//!
//! ```text
//! source → lex → trivia filter → extract references
//!                              → rewrite exports → rewrite imports → stringify
//! ```
//!
//! Every stage is a pure, synchronous transformation over in-memory token
//! sequences: no I/O, no shared state, so any number of transforms may run
//! in parallel. Only lexing can fail; the rewrite stages degrade to
//! pass-through on anything they do not recognize.
//!
//! ## Quick Start
//!
//! ```rust
//! use comet_esm::transform;
//!
//! let result = transform(r#"import { a } from "mod";"#)?;
//! assert_eq!(result.code, r#"const a=require("mod").a;"#);
//! assert_eq!(result.meta[0].specifier, "mod");
//! # Ok::<(), comet_esm::LexError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod extract;
pub mod lexer;
pub mod rewrite;
pub mod stringify;
mod transform;

// Re-exports for convenience
pub use error::{LexError, Result};
pub use extract::{ModuleReference, ReferenceKind, extract_references};
pub use lexer::{Scanner, Token, TokenKind, lex};
pub use rewrite::{find_destructure_end, rewrite_exports, rewrite_imports};
pub use stringify::stringify;
pub use transform::{DEFAULT_LOADER, ModuleTransform, transform, transform_with_loader};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
