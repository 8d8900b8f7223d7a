//! Field identities
//!
//! Two puts belong to the same burst when they carry the same [`FieldId`].
//! Ids are handed out once per field registration by a [`FieldIdAllocator`];
//! the glue that attaches to the host's write trap keeps the id alongside the
//! field it registered.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Opaque identity of one logged field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(u64);

impl FieldId {
    /// Wrap a raw id. Distinct fields must use distinct raw values, otherwise
    /// their puts are coalesced together.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field#{}", self.0)
    }
}

/// Monotonic source of [`FieldId`]s
#[derive(Debug)]
pub struct FieldIdAllocator {
    next: AtomicU64,
}

impl FieldIdAllocator {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Hand out a fresh id
    pub fn allocate(&self) -> FieldId {
        FieldId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}

impl Default for FieldIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_allocator_is_monotonic() {
        let alloc = FieldIdAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert!(b > a);
        assert_ne!(a, b);
        assert_eq!(alloc.allocated(), 2);
    }

    #[test]
    fn test_allocator_unique_across_threads() {
        let alloc = Arc::new(FieldIdAllocator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let alloc = Arc::clone(&alloc);
                thread::spawn(move || (0..250).map(|_| alloc.allocate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldId::from_raw(7).to_string(), "field#7");
    }
}
