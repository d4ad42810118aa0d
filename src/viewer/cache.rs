//! In-memory frame cache, keyed by the frame's request URL.
//!
//! Entries live until the viewer closes or switches camera. In-flight
//! prefetches are tracked so the same frame is not requested twice.

use std::collections::{HashMap, HashSet};

use super::image::ImageHandle;

#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<String, ImageHandle>,
    pending: HashSet<String>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&ImageHandle> {
        self.entries.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn insert(&mut self, url: String, handle: ImageHandle) {
        self.pending.remove(&url);
        self.entries.insert(url, handle);
    }

    /// Mark a download as started. Returns false if it already is.
    pub fn mark_pending(&mut self, url: &str) -> bool {
        self.pending.insert(url.to_string())
    }

    pub fn clear_pending(&mut self, url: &str) {
        self.pending.remove(url);
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.pending.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(url: &str) -> ImageHandle {
        ImageHandle::Remote {
            url: url.to_string(),
        }
    }

    #[test]
    fn test_insert_clears_pending() {
        let mut cache = ImageCache::new();
        assert!(cache.mark_pending("/a"));
        assert!(!cache.mark_pending("/a"));

        cache.insert("/a".to_string(), remote("x"));
        assert!(!cache.is_pending("/a"));
        assert!(cache.contains("/a"));
    }

    #[test]
    fn test_clear() {
        let mut cache = ImageCache::new();
        cache.insert("/a".to_string(), remote("x"));
        cache.mark_pending("/b");

        cache.clear();
        assert!(cache.keys().next().is_none());
        assert!(!cache.is_pending("/b"));
    }
}
