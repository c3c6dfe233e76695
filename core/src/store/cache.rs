// Single-flight descriptor cache
//
// Layout and sidebar descriptors are fetched at most once per store
// lifetime. Concurrent requests for the same key share one in-flight load;
// later requests get the cached value. Entries are never invalidated short
// of dropping the store, so a backend-side layout change only shows up
// after a restart.

use std::future::Future;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::warn;

enum Flight<T> {
    Pending(broadcast::Sender<T>),
    Ready(T),
}

pub struct SingleFlight<T> {
    entries: DashMap<String, Flight<T>>,
}

impl<T> SingleFlight<T>
where
    T: Clone + Default + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Cached value for `key`, if a load already completed.
    pub fn get(&self, key: &str) -> Option<T> {
        self.entries.get(key).and_then(|entry| match &*entry {
            Flight::Ready(value) => Some(value.clone()),
            Flight::Pending(_) => None,
        })
    }

    /// Return the cached value for `key`, or run `load` exactly once while
    /// concurrent callers wait for its result.
    pub async fn get_or_load<F, Fut>(&self, key: &str, load: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        // Decide leader vs. waiter atomically; the map ref must not be held
        // across an await.
        let waiter = match self.entries.entry(key.to_string()) {
            Entry::Occupied(entry) => match entry.get() {
                Flight::Ready(value) => return value.clone(),
                Flight::Pending(tx) => Some(tx.subscribe()),
            },
            Entry::Vacant(entry) => {
                let (tx, _) = broadcast::channel(1);
                entry.insert(Flight::Pending(tx));
                None
            }
        };

        match waiter {
            Some(mut rx) => match rx.recv().await {
                Ok(value) => value,
                Err(e) => {
                    warn!(target: "cache", key = %key, error = %e, "Lost the in-flight load; falling back");
                    self.get(key).unwrap_or_default()
                }
            },
            None => {
                let value = load().await;
                if let Some(mut entry) = self.entries.get_mut(key) {
                    if let Flight::Pending(tx) = &*entry {
                        let _ = tx.send(value.clone());
                    }
                    *entry = Flight::Ready(value.clone());
                }
                value
            }
        }
    }
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Default + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_load() {
        let cache = Arc::new(SingleFlight::<String>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let load = |calls: Arc<AtomicUsize>| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            "layout".to_string()
        };

        let (a, b) = tokio::join!(
            cache.get_or_load("temp-voice", || load(calls.clone())),
            cache.get_or_load("temp-voice", || load(calls.clone())),
        );

        assert_eq!(a, "layout");
        assert_eq!(b, "layout");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_completed_load_is_cached() {
        let cache = SingleFlight::<String>::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_load("sidebar", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    "menu".to_string()
                })
                .await;
            assert_eq!(value, "menu");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get("sidebar").as_deref(), Some("menu"));
    }

    #[tokio::test]
    async fn test_keys_load_independently() {
        let cache = SingleFlight::<String>::new();

        let a = cache.get_or_load("a", || async { "A".to_string() }).await;
        let b = cache.get_or_load("b", || async { "B".to_string() }).await;

        assert_eq!(a, "A");
        assert_eq!(b, "B");
        assert!(cache.get("c").is_none());
    }
}
