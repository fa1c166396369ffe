use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

/// Registry of locally held audio payloads addressed by `blob:` URLs.
///
/// Authenticated clips cannot be handed to a loader by their remote URL, so
/// the payload is downloaded, registered here, and probed through the local
/// URL. Entries live exactly as long as their [`ObjectUrlGuard`].
#[derive(Clone, Default)]
pub struct ObjectUrls {
    inner: Arc<Mutex<Registry>>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: HashMap<String, Bytes>,
    created: u64,
    revoked: u64,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create(&self, bytes: Bytes) -> ObjectUrlGuard {
        let mut registry = self.registry();
        registry.next_id += 1;
        registry.created += 1;
        let url = format!("blob:workbench/{}", registry.next_id);
        registry.entries.insert(url.clone(), bytes);
        drop(registry);

        ObjectUrlGuard {
            urls: self.clone(),
            url,
        }
    }

    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        self.registry().entries.get(url).cloned()
    }

    /// Number of URLs created and not yet revoked.
    pub fn live(&self) -> usize {
        self.registry().entries.len()
    }

    pub fn created(&self) -> u64 {
        self.registry().created
    }

    pub fn revoked(&self) -> u64 {
        self.registry().revoked
    }

    fn revoke(&self, url: &str) {
        let mut registry = self.registry();
        if registry.entries.remove(url).is_some() {
            registry.revoked += 1;
        }
    }
}

/// Owned handle to one registered URL; revokes it on drop.
///
/// Drop runs on every exit path, including a probe future being dropped by
/// a timeout or cancellation, so an entry can neither leak nor be revoked
/// twice.
pub struct ObjectUrlGuard {
    urls: ObjectUrls,
    url: String,
}

impl ObjectUrlGuard {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrlGuard {
    fn drop(&mut self) {
        self.urls.revoke(&self.url);
    }
}

impl std::fmt::Debug for ObjectUrlGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ObjectUrlGuard").field(&self.url).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_revokes_once_on_drop() {
        let urls = ObjectUrls::new();
        let guard = urls.create(Bytes::from_static(b"abc"));
        let url = guard.url().to_string();

        assert_eq!(urls.live(), 1);
        assert_eq!(urls.resolve(&url).as_deref(), Some(&b"abc"[..]));

        drop(guard);
        assert_eq!(urls.live(), 0);
        assert_eq!(urls.revoked(), 1);
        assert!(urls.resolve(&url).is_none());

        urls.revoke(&url);
        assert_eq!(urls.revoked(), 1);
    }

    #[test]
    fn urls_are_unique() {
        let urls = ObjectUrls::new();
        let a = urls.create(Bytes::new());
        let b = urls.create(Bytes::new());
        assert_ne!(a.url(), b.url());
        assert_eq!(urls.created(), 2);
        assert_eq!(urls.live(), 2);
    }
}
