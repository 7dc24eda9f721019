//! SQL-style substring extraction over byte buffers.
//!
//! Index semantics follow the SQL `SUBSTR` convention: `start` is 1-based
//! counting characters (not bytes), negative `start` counts back from the
//! end, and `length` clamps to the end of the text.

use std::ops::Range;

use crate::api::registry::ResourceRegistry;
use crate::registry::table::Handle;

use super::encoding::{char_count, Encoding};

/// Translate a character index and count into a byte range of `source`.
///
/// `start > 0` counts from 1 at the front, `start < 0` counts back from
/// the end (`-1` is the last character) and `start == 0` also means the
/// first character. A start outside the text yields `None`; an empty
/// source therefore always yields `None`. A negative or overlong `length`
/// clamps to the end of the text, while `length == 0` produces an empty
/// range at the start position.
///
/// Two scans: one to count characters, one to locate the byte offsets.
pub fn char_range(
    source: &[u8],
    start: i32,
    length: i32,
    encoding: Encoding,
) -> Option<Range<usize>> {
    let total = char_count(source, encoding) as i64;

    let start = i64::from(start);
    let start = if start > 0 {
        start - 1
    } else if start < 0 {
        total + start
    } else {
        0
    };
    if start < 0 || start >= total {
        return None;
    }

    let length = i64::from(length);
    let length = if length < 0 || start + length > total {
        total - start
    } else {
        length
    };

    let mut begin = 0;
    for _ in 0..start {
        begin += encoding.char_len_at(source, begin);
    }
    let mut end = begin;
    for _ in 0..length {
        end += encoding.char_len_at(source, end);
    }
    Some(begin..end)
}

/// Extract `length` characters of `source` beginning at `start`, copy them
/// into a fresh allocation and track it in `registry`.
///
/// Returns `None` when `start` is out of range or the registry rejects the
/// registration. An in-range request for zero characters yields an empty,
/// tracked buffer rather than `None`.
pub fn substring(
    registry: &ResourceRegistry,
    source: &[u8],
    start: i32,
    length: i32,
    encoding: Encoding,
) -> Option<Handle> {
    let range = char_range(source, start, length, encoding)?;
    registry.register(&source[range])
}
