//! Asset handle implementation
//!
//! Cheap, shared handles to loaded assets.

use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed)
}

/// A shared handle to an asset of type `T`.
///
/// Unloading an asset from the manager only drops the manager's handle;
/// scenes holding a clone keep the asset alive.
#[derive(Debug)]
pub struct AssetHandle<T> {
    id: u64,
    inner: Rc<T>,
}

impl<T> AssetHandle<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            id: next_id(),
            inner: Rc::new(value),
        }
    }

    /// Unique id, shared by all clones
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Number of live clones
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> Hash for AssetHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> std::ops::Deref for AssetHandle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
