// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Destructuring-boundary matching.

use crate::lexer::{Token, TokenKind};

/// Finds the index of the punctuator closing the `{` or `[` at `open_index`.
///
/// Only the one bracket family being matched is tracked; the other family is
/// ignored rather than cross-validated. Handles arbitrary nesting:
/// `{ a, b: [c, { d }] }`, `[a, [b, c]]`, and so on.
///
/// Returns `None` when `open_index` does not sit on a `{`/`[` punctuator or
/// when the stream ends before the match.
pub fn find_destructure_end(tokens: &[Token], open_index: usize) -> Option<usize> {
    let open = tokens.get(open_index)?;
    if open.kind != TokenKind::Punctuator {
        return None;
    }
    let close_text = match open.text.as_str() {
        "{" => "}",
        "[" => "]",
        _ => return None,
    };

    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(open_index + 1) {
        if tok.kind != TokenKind::Punctuator {
            continue;
        }
        if tok.text == open.text {
            depth += 1;
        } else if tok.text == close_text {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        }
    }

    None
}
