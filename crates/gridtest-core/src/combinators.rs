//! Ordering combinators over deferred-start task factories.
//!
//! A factory starts no work until it is invoked, which lets these functions
//! decide *when* each operation begins rather than just how it is awaited.
//! They are free functions on purpose; nothing here augments a shared future
//! type.

use anyhow::Result;
use futures::future::{try_join_all, BoxFuture};
use std::future::Future;

/// A deferred-start asynchronous operation.
pub type TaskFactory<T> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T>> + Send>;

/// Box an async closure into a [`TaskFactory`].
pub fn task<F, Fut, T>(f: F) -> TaskFactory<T>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    Box::new(move || Box::pin(f()))
}

/// Run the factories one after another: each is invoked only once the
/// previous operation has settled, and an error stops the chain (later
/// factories are never invoked).
///
/// Resolved values are discarded. This is an ordering primitive, not a
/// collector.
pub async fn sequence<T>(factories: Vec<TaskFactory<T>>) -> Result<()> {
    for factory in factories {
        factory().await?;
    }
    Ok(())
}

/// Invoke every factory immediately and wait for all operations to settle.
///
/// Fails as soon as any operation fails. Each operation runs as a detached
/// task, so siblings of a failed operation keep running to completion on the
/// runtime; they are not cancelled. On success the resolved values come back
/// in input order.
pub async fn parallel<T>(factories: Vec<TaskFactory<T>>) -> Result<Vec<T>>
where
    T: Send + 'static,
{
    let handles: Vec<_> = factories
        .into_iter()
        .map(|factory| tokio::spawn(factory()))
        .collect();

    try_join_all(handles.into_iter().map(|handle| async move {
        match handle.await {
            Ok(result) => result,
            Err(join_error) => Err(anyhow::anyhow!("parallel task panicked: {join_error}")),
        }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn recording_factory(
        log: Arc<Mutex<Vec<String>>>,
        name: &'static str,
        delay: Duration,
    ) -> TaskFactory<()> {
        task(move || {
            log.lock().unwrap().push(format!("invoke {name}"));
            async move {
                tokio::time::sleep(delay).await;
                log.lock().unwrap().push(format!("settle {name}"));
                Ok(())
            }
        })
    }

    #[tokio::test]
    async fn sequence_waits_for_each_step_to_settle() {
        let log = Arc::new(Mutex::new(Vec::new()));
        // Descending delays so overlap would reorder the log
        let factories = vec![
            recording_factory(log.clone(), "a", Duration::from_millis(30)),
            recording_factory(log.clone(), "b", Duration::from_millis(20)),
            recording_factory(log.clone(), "c", Duration::from_millis(10)),
        ];

        sequence(factories).await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "invoke a", "settle a", "invoke b", "settle b", "invoke c", "settle c"
            ]
        );
    }

    #[tokio::test]
    async fn sequence_error_short_circuits_later_factories() {
        let invoked = Arc::new(AtomicBool::new(false));
        let invoked_clone = invoked.clone();

        let factories = vec![
            task(|| async { Ok(()) }),
            task(|| async { Err(anyhow::anyhow!("step failed")) }),
            task(move || {
                invoked_clone.store(true, Ordering::SeqCst);
                async { Ok(()) }
            }),
        ];

        let err = sequence(factories).await.unwrap_err();
        assert!(err.to_string().contains("step failed"));
        assert!(!invoked.load(Ordering::SeqCst), "third factory ran after an error");
    }

    #[tokio::test]
    async fn parallel_invokes_all_factories_before_any_settle() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let factories = vec![
            recording_factory(log.clone(), "a", Duration::from_millis(10)),
            recording_factory(log.clone(), "b", Duration::from_millis(20)),
            recording_factory(log.clone(), "c", Duration::from_millis(30)),
        ];

        parallel(factories).await.unwrap();

        let log = log.lock().unwrap();
        let last_invoke = log.iter().rposition(|e| e.starts_with("invoke")).unwrap();
        let first_settle = log.iter().position(|e| e.starts_with("settle")).unwrap();
        assert!(
            last_invoke < first_settle,
            "an operation settled before every factory was invoked: {log:?}"
        );
    }

    #[tokio::test]
    async fn parallel_fails_fast_but_siblings_run_to_completion() {
        let sibling_finished = Arc::new(AtomicBool::new(false));
        let flag = sibling_finished.clone();

        let factories = vec![
            task(|| async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err::<(), _>(anyhow::anyhow!("branch exploded"))
            }),
            task(move || async move {
                tokio::time::sleep(Duration::from_millis(60)).await;
                flag.store(true, Ordering::SeqCst);
                Ok(())
            }),
        ];

        let err = parallel(factories).await.unwrap_err();
        assert!(err.to_string().contains("branch exploded"));
        // Failure surfaced before the slow sibling settled...
        assert!(!sibling_finished.load(Ordering::SeqCst));
        // ...but the sibling was not cancelled and still finishes
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(sibling_finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn parallel_preserves_input_order_of_values() {
        let factories: Vec<TaskFactory<u32>> = vec![
            task(|| async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                Ok(1)
            }),
            task(|| async { Ok(2) }),
            task(|| async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(3)
            }),
        ];

        assert_eq!(parallel(factories).await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn empty_inputs_resolve_immediately() {
        sequence::<()>(Vec::new()).await.unwrap();
        assert!(parallel::<()>(Vec::new()).await.unwrap().is_empty());
    }
}
