//! Cursor pagination over ordered collections
//!
//! A cursor is the id of the last element the caller has seen. The next page
//! is the run of elements strictly after it. Positions are found by a linear
//! scan for a matching id, so a cursor stays valid for as long as the element
//! it names is still in the collection.
//!
//! A cursor that matches nothing (including the literal `"undefined"` a
//! client sends before it has any items) restarts from the beginning rather
//! than failing.

use crate::models::Identified;

/// Page size for posts, comments, profile tabs and search
pub const PAGE_SIZE: usize = 10;

/// Page size for the activity tab
pub const ACTIVITY_PAGE_SIZE: usize = 20;

/// Index of the element named by `cursor`, if any
pub fn cursor_position<T: Identified>(items: &[T], cursor: Option<&str>) -> Option<usize> {
    let cursor = cursor.filter(|c| !c.is_empty())?;
    items.iter().position(|item| item.id() == cursor)
}

/// Up to `page_size` elements strictly after `cursor`
pub fn page_after<'a, T: Identified>(
    items: &'a [T],
    cursor: Option<&str>,
    page_size: usize,
) -> &'a [T] {
    let start = cursor_position(items, cursor).map_or(0, |i| i + 1);
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(String);

    impl Identified for Item {
        fn id(&self) -> &str {
            &self.0
        }
    }

    fn items(n: usize) -> Vec<Item> {
        (1..=n).map(|i| Item(i.to_string())).collect()
    }

    fn ids(page: &[Item]) -> Vec<&str> {
        page.iter().map(|i| i.0.as_str()).collect()
    }

    #[test]
    fn test_first_page() {
        let list = items(25);
        assert_eq!(ids(page_after(&list, None, 10)), ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]);
        assert_eq!(page_after(&list, Some(""), 10).len(), 10);
    }

    #[test]
    fn test_page_excludes_cursor() {
        let list = items(25);
        for cursor in &list {
            let page = page_after(&list, Some(&cursor.0), 10);
            assert!(page.iter().all(|i| i.0 != cursor.0));
            let pos: usize = cursor.0.parse().unwrap();
            assert!(page.iter().all(|i| i.0.parse::<usize>().unwrap() > pos));
        }
    }

    #[test]
    fn test_same_cursor_same_page() {
        let list = items(25);
        let a = ids(page_after(&list, Some("7"), 10));
        let b = ids(page_after(&list, Some("7"), 10));
        assert_eq!(a, b);
    }

    #[test]
    fn test_walk_reconstructs_collection() {
        let list = items(23);
        let mut seen: Vec<&str> = Vec::new();
        let mut cursor: Option<&str> = None;
        loop {
            let page = page_after(&list, cursor, 10);
            if page.is_empty() {
                break;
            }
            seen.extend(ids(page));
            cursor = page.last().map(|i| i.0.as_str());
        }
        assert_eq!(seen, ids(&list));
    }

    #[test]
    fn test_unknown_cursor_restarts() {
        // Unmatched cursors fall back to the first page instead of erroring.
        let list = items(5);
        assert_eq!(ids(page_after(&list, Some("undefined"), 10)), ["1", "2", "3", "4", "5"]);
        assert_eq!(cursor_position(&list, Some("undefined")), None);
    }

    #[test]
    fn test_last_element_gives_empty_page() {
        let list = items(5);
        assert!(page_after(&list, Some("5"), 10).is_empty());
        assert!(page_after::<Item>(&[], None, 10).is_empty());
    }
}
