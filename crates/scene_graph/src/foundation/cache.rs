//! Lazily recomputed value cells

use std::cell::Cell;
use std::fmt;

/// Memoizing cell that is either valid or stale
///
/// A stale cell recomputes on the next [`ValueCache::get`]; clearing marks it
/// stale but keeps the last value around until it is overwritten. Interior
/// mutability lets read-only accessors fill the cache, which also makes the
/// type `!Sync`.
pub struct ValueCache<T> {
    value: Cell<Option<T>>,
    valid: Cell<bool>,
}

impl<T: Copy> ValueCache<T> {
    /// Create an empty, stale cache
    pub const fn new() -> Self {
        Self {
            value: Cell::new(None),
            valid: Cell::new(false),
        }
    }

    /// Return the stored value, recomputing it first if stale
    pub fn get(&self, compute: impl FnOnce() -> T) -> T {
        if self.valid.get() {
            if let Some(value) = self.value.get() {
                return value;
            }
        }

        let value = compute();
        self.value.set(Some(value));
        self.valid.set(true);
        value
    }

    /// Mark the cache stale
    pub fn clear(&self) {
        self.valid.set(false);
    }

    /// Whether the next `get` returns the stored value without recomputing
    pub fn is_valid(&self) -> bool {
        self.valid.get() && self.value.get().is_some()
    }

    /// Last stored value, valid or not
    pub fn peek(&self) -> Option<T> {
        self.value.get()
    }
}

impl<T: Copy> Default for ValueCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for ValueCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCache")
            .field("value", &self.value.get())
            .field("valid", &self.valid.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computes_once_while_valid() {
        let cache = ValueCache::new();
        let calls = Cell::new(0);

        let compute = || {
            calls.set(calls.get() + 1);
            42
        };
        assert_eq!(cache.get(compute), 42);
        assert_eq!(cache.get(|| unreachable!("cache should be valid")), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_clear_keeps_value_until_recompute() {
        let cache = ValueCache::new();
        cache.get(|| 1.5_f32);
        cache.clear();

        assert!(!cache.is_valid());
        assert_eq!(cache.peek(), Some(1.5));
        assert_eq!(cache.get(|| 2.5), 2.5);
        assert!(cache.is_valid());
    }

    #[test]
    fn test_starts_stale() {
        let cache: ValueCache<u8> = ValueCache::default();
        assert!(!cache.is_valid());
        assert_eq!(cache.peek(), None);
    }
}
