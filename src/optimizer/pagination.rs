//! Pagination helpers.
//!
//! Pages are fetched with one extra probe item so that "more pages exist"
//! is known without a separate count query.

use serde::Serialize;

use crate::error::{CacheError, Result};

// == Page ==
/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Builds a page from up to `page_size + 1` fetched items.
    pub fn from_probe(mut items: Vec<T>, page_size: usize) -> Self {
        let has_more = items.len() > page_size;
        items.truncate(page_size);
        Self {
            data: items,
            has_more,
        }
    }
}

/// Offset and limit to request for a 1-based `page`, probe item included.
pub fn page_window(page: usize, page_size: usize) -> Result<(usize, usize)> {
    if page == 0 {
        return Err(CacheError::InvalidConfiguration(
            "page numbers start at 1".to_string(),
        ));
    }
    if page_size == 0 {
        return Err(CacheError::InvalidConfiguration(
            "page_size must be positive".to_string(),
        ));
    }

    let skip = (page - 1)
        .checked_mul(page_size)
        .ok_or_else(|| CacheError::InvalidConfiguration("page offset overflows".to_string()))?;
    let take = page_size
        .checked_add(1)
        .ok_or_else(|| CacheError::InvalidConfiguration("page_size too large".to_string()))?;

    Ok((skip, take))
}

/// Cache key for one page under `prefix`.
pub fn page_cache_key(prefix: &str, page: usize, page_size: usize) -> String {
    format!("{prefix}:page:{page}:size:{page_size}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_probe_with_extra_item() {
        let page = Page::from_probe(vec![1, 2, 3, 4], 3);
        assert_eq!(page.data, vec![1, 2, 3]);
        assert!(page.has_more);
    }

    #[test]
    fn test_from_probe_exact_page() {
        let page = Page::from_probe(vec![1, 2, 3], 3);
        assert_eq!(page.data, vec![1, 2, 3]);
        assert!(!page.has_more);
    }

    #[test]
    fn test_from_probe_short_page() {
        let page = Page::from_probe(vec![1], 3);
        assert_eq!(page.data, vec![1]);
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 20).unwrap(), (0, 21));
        assert_eq!(page_window(3, 10).unwrap(), (20, 11));
    }

    #[test]
    fn test_page_window_rejects_zero() {
        assert!(matches!(
            page_window(0, 10),
            Err(CacheError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            page_window(1, 0),
            Err(CacheError::InvalidConfiguration(_))
        ));
        assert!(page_window(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_page_cache_key() {
        assert_eq!(page_cache_key("leads", 2, 25), "leads:page:2:size:25");
    }
}
