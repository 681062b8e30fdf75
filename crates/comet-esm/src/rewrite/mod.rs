// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Statement rewriting over trivia-free token streams.
//!
//! Both rewriters consume a borrowed input sequence and build a brand-new
//! output sequence; on anything outside the recognized grammar they copy
//! tokens through unchanged rather than failing. Order matters at the
//! pipeline level: exports are rewritten before imports so that statement
//! bodies retained by the export rewriter still reach the import rewriter.
//!
//! ## Structure
//!
//! - `imports.rs` - static/side-effect/dynamic `import` forms
//! - `exports.rs` - export declarations, lists, and re-export forms
//! - `boundary.rs` - the `{`/`[` boundary matcher both sides lean on

mod boundary;
mod exports;
mod imports;

pub use boundary::find_destructure_end;
pub use exports::rewrite_exports;
pub use imports::rewrite_imports;
