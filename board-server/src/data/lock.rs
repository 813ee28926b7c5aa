use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

/// Per-post mutual exclusion, post-granularity rather than table-granularity.
///
/// Each post id maps to a lazily created `Arc<Mutex<()>>`. Callers naming
/// the same post serialize; callers naming different posts proceed
/// independently. The guard is released on every exit path of the closure,
/// including error returns and panics.
#[derive(Default)]
pub struct PostLocks {
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl PostLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock_for(&self, post_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(post_id).or_default().clone()
    }

    pub async fn with_post_lock<F, Fut, T>(&self, post_id: Uuid, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let lock = self.lock_for(post_id).await;
        let _guard = lock.lock().await;
        f().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::RwLock;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn same_post_callers_serialize() {
        let locks = Arc::new(PostLocks::new());
        let post_id = Uuid::new_v4();
        let counter = Arc::new(RwLock::new(0i64));

        // Read-yield-write would lose updates without the lock closing the
        // window between the read and the write.
        let mut handles = Vec::new();
        for _ in 0..50 {
            let locks = Arc::clone(&locks);
            let counter = Arc::clone(&counter);
            handles.push(tokio::spawn(async move {
                locks
                    .with_post_lock(post_id, || async {
                        let current = *counter.read().await;
                        tokio::task::yield_now().await;
                        *counter.write().await = current + 1;
                    })
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*counter.read().await, 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn different_posts_do_not_block_each_other() {
        let locks = Arc::new(PostLocks::new());
        let post_a = Uuid::new_v4();
        let post_b = Uuid::new_v4();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let other = Arc::clone(&locks);
        let handle = tokio::spawn(async move {
            other
                .with_post_lock(post_b, || async {
                    let _ = tx.send(());
                })
                .await;
        });

        // Holding post A's scope must not keep post B's holder from running.
        locks
            .with_post_lock(post_a, || async {
                tokio::time::timeout(Duration::from_secs(1), rx)
                    .await
                    .expect("post B's caller was blocked by post A's lock")
                    .unwrap();
            })
            .await;

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn guard_is_released_when_the_closure_fails() {
        let locks = PostLocks::new();
        let post_id = Uuid::new_v4();

        let failed: Result<(), &str> = locks
            .with_post_lock(post_id, || async { Err("row mutation failed") })
            .await;
        assert!(failed.is_err());

        // A second acquisition would hang forever if the guard leaked.
        let ok = tokio::time::timeout(
            Duration::from_secs(1),
            locks.with_post_lock(post_id, || async { 42 }),
        )
        .await
        .expect("lock was not released after a failed mutation");
        assert_eq!(ok, 42);
    }
}
