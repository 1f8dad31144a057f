//! Optimized collection types for Trellis.
//!
//! Re-exports hash collections backed by AHash, plus the ordered maps the
//! runtime uses wherever insertion order is semantic (method tables,
//! default options, registries).

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
pub use indexmap::{IndexMap, IndexSet};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert("key", "value");
        assert_eq!(map.get("key"), Some(&"value"));
    }

    #[test]
    fn test_indexmap_preserves_order() {
        let mut map = IndexMap::new();
        map.insert("b", 2);
        map.insert("a", 1);
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
