//! Cursor-based pagination for the listing methods
//!
//! The cursor is the base64 of the last returned item's name. Walking
//! `nextCursor` to exhaustion yields the full sorted list with no
//! duplicates or omissions, whatever the configured page limit.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{CoreError, CoreResult};

/// Encode the pagination cursor for a name
pub fn encode_cursor(name: &str) -> String {
    STANDARD.encode(name.as_bytes())
}

/// Decode a client-supplied cursor back into a name
///
/// # Errors
///
/// Returns an invalid-params error for cursors that are not base64 UTF-8.
pub fn decode_cursor(cursor: &str) -> CoreResult<String> {
    let bytes = STANDARD
        .decode(cursor)
        .map_err(|_| CoreError::invalid_params("invalid cursor"))?;
    String::from_utf8(bytes).map_err(|_| CoreError::invalid_params("invalid cursor"))
}

/// Take one page from a name-sorted list
///
/// Drops every item whose name is `<=` the cursor's name, takes up to
/// `limit` items (all of them when `limit` is `None`), and returns the next
/// cursor when items remain.
///
/// # Errors
///
/// Propagates cursor decode failures.
pub fn paginate<T>(
    items: Vec<T>,
    name_of: impl Fn(&T) -> &str,
    cursor: Option<&str>,
    limit: Option<usize>,
) -> CoreResult<(Vec<T>, Option<String>)> {
    let after = match cursor {
        Some(cursor) => Some(decode_cursor(cursor)?),
        None => None,
    };

    let mut remaining: Vec<T> = match after {
        Some(after) => items
            .into_iter()
            .filter(|item| name_of(item) > after.as_str())
            .collect(),
        None => items,
    };

    let next_cursor = match limit {
        Some(limit) if remaining.len() > limit => {
            remaining.truncate(limit);
            remaining.last().map(|item| encode_cursor(name_of(item)))
        }
        _ => None,
    };

    Ok((remaining, next_cursor))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(page: &[String]) -> Vec<&str> {
        page.iter().map(String::as_str).collect()
    }

    #[test]
    fn no_limit_returns_everything() {
        let items = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let (page, next) = paginate(items, String::as_str, None, None).unwrap();
        assert_eq!(names(&page), ["a", "b", "c"]);
        assert!(next.is_none());
    }

    #[test]
    fn cursor_walk_covers_all_items_once() {
        let items: Vec<String> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut collected = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let (page, next) =
                paginate(items.clone(), String::as_str, cursor.as_deref(), Some(2)).unwrap();
            collected.extend(page);
            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        assert_eq!(names(&collected), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn exact_page_boundary_has_no_next_cursor() {
        let items = vec!["a".to_string(), "b".to_string()];
        let (page, next) = paginate(items, String::as_str, None, Some(2)).unwrap();
        assert_eq!(page.len(), 2);
        assert!(next.is_none());
    }

    #[test]
    fn garbage_cursor_is_invalid_params() {
        let items = vec!["a".to_string()];
        let error = paginate(items, String::as_str, Some("!!!not-base64!!!"), None).unwrap_err();
        assert_eq!(error.to_wire().code, -32602);
    }
}
