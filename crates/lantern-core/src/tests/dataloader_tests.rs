//! Batching, caching and expiry of the generic dataloader.

use crate::config::DataLoaderConfig;
use crate::dataloader::DataLoader;
use crate::FetchError;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

type Calls = Arc<Mutex<Vec<Vec<u32>>>>;

fn config() -> DataLoaderConfig {
    DataLoaderConfig {
        wait: Duration::from_millis(10),
        max_batch: 3,
        ttl: Duration::from_millis(300),
        reset_interval: Duration::from_secs(60),
    }
}

fn doubling_loader(config: DataLoaderConfig) -> (DataLoader<u32, u32>, Calls) {
    let calls: Calls = Arc::default();
    let seen = Arc::clone(&calls);
    let loader = DataLoader::new("double", config, move |keys: Vec<u32>| {
        let seen = Arc::clone(&seen);
        async move {
            if let Ok(mut seen) = seen.lock() {
                seen.push(keys.clone());
            }
            Ok::<_, FetchError>(keys.into_iter().map(|k| k * 2).collect())
        }
    });
    (loader, calls)
}

fn calls_of(calls: &Calls) -> Vec<Vec<u32>> {
    calls.lock().map(|c| c.clone()).unwrap_or_default()
}

// =============================================================================
// Batching
// =============================================================================

#[tokio::test(start_paused = true)]
async fn loads_in_one_window_share_a_batch() -> Result<(), FetchError> {
    let (loader, calls) = doubling_loader(config());
    let (a, b, c) = tokio::join!(loader.load(1), loader.load(2), loader.load(1));
    assert_eq!((a?, b?, c?), (2, 4, 2));
    assert_eq!(calls_of(&calls), vec![vec![1, 2]]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn full_batch_dispatches_without_waiting() -> Result<(), FetchError> {
    let (loader, calls) = doubling_loader(config());
    let values = loader.load_many(vec![1, 2, 3, 4]).await?;
    assert_eq!(values, vec![2, 4, 6, 8]);
    assert_eq!(calls_of(&calls), vec![vec![1, 2, 3], vec![4]]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn length_mismatch_fails_every_key() {
    let loader: DataLoader<u32, u32> =
        DataLoader::new("short", config(), |_keys: Vec<u32>| async move {
            Ok::<_, FetchError>(vec![1])
        });
    let (a, b) = tokio::join!(loader.load(1), loader.load(2));
    assert!(a.is_err());
    assert_eq!(a, b);
    assert_eq!(loader.cached_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn fetch_error_is_shared() {
    let loader: DataLoader<u32, u32> =
        DataLoader::new("failing", config(), |_keys: Vec<u32>| async move {
            Err::<Vec<u32>, _>(FetchError::new("db unavailable"))
        });
    let (a, b) = tokio::join!(loader.load(1), loader.load(2));
    assert_eq!(a, Err(FetchError::new("db unavailable")));
    assert_eq!(b, Err(FetchError::new("db unavailable")));
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test(start_paused = true)]
async fn cached_values_are_served_until_ttl() -> Result<(), FetchError> {
    let (loader, calls) = doubling_loader(config());
    loader.load(5).await?;
    loader.load(5).await?;
    assert_eq!(calls_of(&calls).len(), 1);

    tokio::time::advance(Duration::from_millis(301)).await;
    loader.load(5).await?;
    assert_eq!(calls_of(&calls).len(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn expired_entries_are_swept_on_the_next_batch() -> Result<(), FetchError> {
    let (loader, _calls) = doubling_loader(config());
    loader.load_many(vec![1, 2]).await?;
    assert_eq!(loader.cached_len(), 2);

    tokio::time::advance(Duration::from_millis(301)).await;
    assert_eq!(loader.cached_len(), 0);
    loader.load(9).await?;
    assert_eq!(loader.cached_len(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn periodic_reset_drops_everything() -> Result<(), FetchError> {
    let config = DataLoaderConfig {
        ttl: Duration::from_secs(3600),
        reset_interval: Duration::from_secs(1),
        ..config()
    };
    let (loader, calls) = doubling_loader(config);
    loader.load(1).await?;
    tokio::time::advance(Duration::from_secs(2)).await;
    loader.load(1).await?;
    assert_eq!(calls_of(&calls).len(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn primed_values_skip_the_batch() -> Result<(), FetchError> {
    let (loader, calls) = doubling_loader(config());
    loader.prime(7, 70);
    assert_eq!(loader.load(7).await?, 70);
    assert!(calls_of(&calls).is_empty());

    loader.clear();
    assert_eq!(loader.load(7).await?, 14);
    Ok(())
}
