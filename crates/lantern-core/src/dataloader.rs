//! Request coalescing and short-lived caching of keyed lookups.

use crate::config::DataLoaderConfig;
use crate::error::FetchError;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::OnceLock;
use std::sync::PoisonError;
use tokio::sync::watch;
use tokio::time::Instant;

/// Fetches the values of many keys; must return one value per key, in key
/// order.
pub type LoadFn<K, V> =
    Arc<dyn Fn(Vec<K>) -> BoxFuture<'static, Result<Vec<V>, FetchError>> + Send + Sync>;

/// Shared by a batch's dispatcher and every caller waiting on it.
struct BatchOutcome<V> {
    result: OnceLock<Result<Vec<V>, FetchError>>,
    done: watch::Sender<bool>,
}

struct PendingBatch<K, V> {
    id: u64,
    keys: Vec<K>,
    outcome: Arc<BatchOutcome<V>>,
}

impl<K, V> PendingBatch<K, V> {
    fn new(id: u64) -> Self {
        Self {
            id,
            keys: Vec::new(),
            outcome: Arc::new(BatchOutcome {
                result: OnceLock::new(),
                done: watch::Sender::new(false),
            }),
        }
    }
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

struct LoaderState<K, V> {
    pending: Option<PendingBatch<K, V>>,
    next_batch_id: u64,
    cache: HashMap<K, CacheEntry<V>>,
    last_reset: Instant,
}

impl<K: Eq + Hash, V> LoaderState<K, V> {
    fn reset_if_due(&mut self, now: Instant, interval: std::time::Duration) {
        if now.duration_since(self.last_reset) >= interval {
            self.cache.clear();
            self.last_reset = now;
        }
    }

    fn sweep(&mut self, now: Instant) {
        self.cache.retain(|_, entry| entry.expires_at > now);
    }
}

struct Inner<K, V> {
    name: String,
    config: DataLoaderConfig,
    load_fn: LoadFn<K, V>,
    state: Mutex<LoaderState<K, V>>,
}

impl<K, V> Inner<K, V> {
    fn lock(&self) -> MutexGuard<'_, LoaderState<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Batches concurrent `load` calls made within a short window into one
/// call of its load function, and caches the results for a while.
///
/// Cloning a loader yields a handle to the same batches and cache.
pub struct DataLoader<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> Clone for DataLoader<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> DataLoader<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(name: impl Into<String>, config: DataLoaderConfig, load_fn: F) -> Self
    where
        F: Fn(Vec<K>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<V>, FetchError>> + Send + 'static,
    {
        Self::from_load_fn(name, config, Arc::new(move |keys| load_fn(keys).boxed()))
    }

    pub fn from_load_fn(
        name: impl Into<String>,
        config: DataLoaderConfig,
        load_fn: LoadFn<K, V>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                config,
                load_fn,
                state: Mutex::new(LoaderState {
                    pending: None,
                    next_batch_id: 0,
                    cache: HashMap::new(),
                    last_reset: Instant::now(),
                }),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Loads the value of `key`, from the cache when an unexpired entry
    /// exists and otherwise through the next batch.
    pub async fn load(&self, key: K) -> Result<V, FetchError> {
        let (outcome, position) = {
            let mut state = self.inner.lock();
            let now = Instant::now();
            state.reset_if_due(now, self.inner.config.reset_interval);
            match state.cache.get(&key) {
                Some(entry) if entry.expires_at > now => return Ok(entry.value.clone()),
                Some(_) => {
                    state.cache.remove(&key);
                },
                None => {},
            }
            self.enqueue(&mut state, key)
        };

        let mut done = outcome.done.subscribe();
        if done.wait_for(|finished| *finished).await.is_err() {
            return Err(FetchError::new(format!(
                "loader {} dropped a batch before it finished",
                self.inner.name,
            )));
        }
        match outcome.result.get() {
            Some(Ok(values)) => values.get(position).cloned().ok_or_else(|| {
                FetchError::new(format!("loader {} lost a batch slot", self.inner.name))
            }),
            Some(Err(err)) => Err(err.clone()),
            None => Err(FetchError::new(format!(
                "loader {} finished a batch without a result",
                self.inner.name,
            ))),
        }
    }

    pub async fn load_many(&self, keys: Vec<K>) -> Result<Vec<V>, FetchError> {
        futures::future::try_join_all(keys.into_iter().map(|key| self.load(key))).await
    }

    /// Stores `value` for `key` as if it had just been loaded.
    pub fn prime(&self, key: K, value: V) {
        let mut state = self.inner.lock();
        let expires_at = Instant::now() + self.inner.config.ttl;
        state.cache.insert(key, CacheEntry { value, expires_at });
    }

    pub fn clear(&self) {
        self.inner.lock().cache.clear();
    }

    /// Number of unexpired cache entries.
    pub fn cached_len(&self) -> usize {
        let now = Instant::now();
        self.inner
            .lock()
            .cache
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    /// Adds `key` to the pending batch, opening one if needed, and returns
    /// where its value will be found.
    fn enqueue(
        &self,
        state: &mut LoaderState<K, V>,
        key: K,
    ) -> (Arc<BatchOutcome<V>>, usize) {
        let next_id = state.next_batch_id;
        let batch = state
            .pending
            .get_or_insert_with(|| PendingBatch::new(next_id));
        let opened = batch.id == next_id;
        let position = match batch.keys.iter().position(|k| *k == key) {
            Some(position) => position,
            None => {
                batch.keys.push(key);
                batch.keys.len() - 1
            },
        };
        let outcome = Arc::clone(&batch.outcome);
        let full = batch.keys.len() >= self.inner.config.max_batch;

        if opened {
            state.next_batch_id += 1;
        }
        if full {
            if let Some(batch) = state.pending.take() {
                tokio::spawn(dispatch(Arc::clone(&self.inner), batch));
            }
        } else if opened {
            self.spawn_window(next_id);
        }
        (outcome, position)
    }

    /// Dispatches batch `id` once the wait window passes, unless it filled
    /// up and went out earlier.
    fn spawn_window(&self, id: u64) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.config.wait).await;
            let batch = {
                let mut state = inner.lock();
                if state.pending.as_ref().is_some_and(|b| b.id == id) {
                    state.pending.take()
                } else {
                    None
                }
            };
            match batch {
                Some(batch) => dispatch(inner, batch).await,
                None => tracing::trace!(loader = %inner.name, id, "batch already dispatched"),
            }
        });
    }
}

async fn dispatch<K, V>(inner: Arc<Inner<K, V>>, batch: PendingBatch<K, V>)
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    tracing::debug!(loader = %inner.name, keys = batch.keys.len(), "dispatching batch");
    let expected = batch.keys.len();
    let result = match (inner.load_fn)(batch.keys.clone()).await {
        Ok(values) if values.len() != expected => {
            tracing::warn!(
                loader = %inner.name,
                expected,
                returned = values.len(),
                "batch function returned the wrong number of results",
            );
            Err(FetchError::new(format!(
                "loader {} returned {} results for {expected} keys",
                inner.name,
                values.len(),
            )))
        },
        other => other,
    };

    if let Ok(values) = &result {
        let mut state = inner.lock();
        let now = Instant::now();
        state.sweep(now);
        let expires_at = now + inner.config.ttl;
        for (key, value) in batch.keys.iter().zip(values) {
            state.cache.insert(
                key.clone(),
                CacheEntry {
                    value: value.clone(),
                    expires_at,
                },
            );
        }
    }
    let _ = batch.outcome.result.set(result);
    batch.outcome.done.send_replace(true);
}

impl<K, V> fmt::Debug for DataLoader<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataLoader")
            .field("name", &self.inner.name)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Splits rows fetched for a batch into one list per key, keeping row
/// order. Rows whose key is missing or not among `keys` are dropped.
///
/// ```
/// # use lantern_core::dataloader::partition_by_key;
/// let rows = vec![(2, "b"), (1, "a"), (2, "c"), (9, "z")];
/// let slots = partition_by_key(&[1, 2, 3], rows, |row| Some(row.0));
/// assert_eq!(slots, vec![vec![(1, "a")], vec![(2, "b"), (2, "c")], vec![]]);
/// ```
pub fn partition_by_key<K, V, F>(keys: &[K], rows: Vec<V>, key_of: F) -> Vec<Vec<V>>
where
    K: Eq + Hash,
    F: Fn(&V) -> Option<K>,
{
    let mut index: HashMap<&K, usize> = HashMap::with_capacity(keys.len());
    for (position, key) in keys.iter().enumerate() {
        index.entry(key).or_insert(position);
    }
    let mut slots: Vec<Vec<V>> = keys.iter().map(|_| Vec::new()).collect();
    for row in rows {
        let Some(key) = key_of(&row) else {
            continue;
        };
        if let Some(&position) = index.get(&key) {
            slots[position].push(row);
        }
    }
    slots
}
