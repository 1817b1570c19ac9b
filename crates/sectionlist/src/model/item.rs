//! Items that can be shown in a sectioned list.

use std::sync::Arc;

/// Trait for items that expose a section key.
///
/// The section key drives both fast-scroll grouping (its first character) and
/// filtering (case-insensitive substring match).
///
/// # Example
///
/// ```
/// use sectionlist::SectionItem;
///
/// #[derive(Clone)]
/// struct Album {
///     title: String,
///     artist: String,
/// }
///
/// impl SectionItem for Album {
///     fn section_key(&self) -> &str {
///         &self.title
///     }
/// }
/// ```
pub trait SectionItem: Send + Sync {
    /// Returns the key used for sectioning and filtering.
    fn section_key(&self) -> &str;
}

impl SectionItem for String {
    fn section_key(&self) -> &str {
        self
    }
}

impl SectionItem for &'static str {
    fn section_key(&self) -> &str {
        self
    }
}

impl<T: SectionItem + ?Sized> SectionItem for Arc<T> {
    fn section_key(&self) -> &str {
        (**self).section_key()
    }
}

/// An item paired with an externally computed section key.
///
/// Useful when the key is not a field of the item, or when the item type
/// lives in another crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyed<T> {
    key: String,
    item: T,
}

impl<T> Keyed<T> {
    /// Pair an item with a key.
    pub fn new(key: impl Into<String>, item: T) -> Self {
        Self {
            key: key.into(),
            item,
        }
    }

    /// Wrap every item, computing its key with `key_fn`.
    pub fn wrap_all<I, F>(items: I, mut key_fn: F) -> Vec<Self>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> String,
    {
        items
            .into_iter()
            .map(|item| Self {
                key: key_fn(&item),
                item,
            })
            .collect()
    }

    /// The wrapped item.
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Consume the wrapper, returning the item.
    pub fn into_inner(self) -> T {
        self.item
    }
}

impl<T: Send + Sync> SectionItem for Keyed<T> {
    fn section_key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_key() {
        assert_eq!("Apple".to_string().section_key(), "Apple");
        assert_eq!("bee".section_key(), "bee");
    }

    #[test]
    fn test_arc_delegates() {
        let item = Arc::new("Cherry".to_string());
        assert_eq!(item.section_key(), "Cherry");
    }

    #[test]
    fn test_keyed_wrap_all() {
        let wrapped = Keyed::wrap_all(vec![3u32, 10], |n| format!("track {n}"));
        assert_eq!(wrapped[1].section_key(), "track 10");
        assert_eq!(*wrapped[0].item(), 3);
        assert_eq!(wrapped[1].clone().into_inner(), 10);
    }
}
