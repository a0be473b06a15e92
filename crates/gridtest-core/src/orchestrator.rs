//! Fan-out of one test callback across several browser sessions.

use std::future::Future;

use anyhow::{Context, Result};
use tokio::sync::oneshot;
use tracing::debug;

use crate::browser::Browser;
use crate::combinators::{parallel, task, TaskFactory};
use crate::error::HarnessError;
use crate::factory::SessionFactory;
use crate::session::DriverSession;

/// Single-use completion signal for one test branch.
///
/// The callback must call [`Done::finish`] exactly once when its branch is
/// complete; `finish` consumes the signal, so calling it twice is not
/// expressible. Dropping it unfinished fails the branch.
pub struct Done {
    tx: oneshot::Sender<()>,
}

impl Done {
    fn channel() -> (Done, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Done { tx }, rx)
    }

    /// Mark this branch finished.
    pub fn finish(self) {
        // The receiver only disappears once its branch is abandoned, in
        // which case the signal no longer matters
        let _ = self.tx.send(());
    }
}

/// Runs one callback against a set of browsers, one remote session each.
pub struct Orchestrator {
    factory: SessionFactory,
}

impl Orchestrator {
    pub fn new(factory: SessionFactory) -> Self {
        Self { factory }
    }

    /// Convenience constructor from an automation server endpoint.
    pub fn against(remote_url: impl Into<String>) -> Self {
        Self::new(SessionFactory::new(remote_url))
    }

    /// Build one session per browser and run `callback` against each of them
    /// in parallel.
    ///
    /// Sessions are built and callbacks start without waiting on one another.
    /// The aggregate resolves only once every branch has returned and signaled
    /// its [`Done`]; it fails as soon as any branch's callback errors or drops
    /// its signal, without cancelling or cleaning up sibling branches.
    /// Quitting the session on every exit path is the callback's job.
    pub async fn test_with<F, Fut>(&self, browsers: &[Browser], callback: F) -> Result<()>
    where
        F: Fn(DriverSession, Done) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let factory = self.factory.clone();
        run_branches(
            browsers,
            move |browser| {
                let factory = factory.clone();
                async move { factory.create_session(browser).await }
            },
            callback,
        )
        .await
    }
}

/// Branch plumbing behind [`Orchestrator::test_with`], generic over how a
/// session is built so the completion semantics are testable without a
/// remote server.
async fn run_branches<S, B, BFut, F, Fut>(browsers: &[Browser], build: B, callback: F) -> Result<()>
where
    S: Send + 'static,
    B: Fn(Browser) -> BFut + Clone + Send + 'static,
    BFut: Future<Output = Result<S>> + Send + 'static,
    F: Fn(S, Done) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let factories: Vec<TaskFactory<()>> = browsers
        .iter()
        .copied()
        .map(|browser| {
            let build = build.clone();
            let callback = callback.clone();
            task(move || async move {
                let session = build(browser).await?;
                debug!(%browser, "branch started");

                let (done, finished) = Done::channel();
                callback(session, done)
                    .await
                    .with_context(|| format!("test branch for {browser} failed"))?;
                finished
                    .await
                    .map_err(|_| HarnessError::Branch { browser })?;

                debug!(%browser, "branch finished");
                Ok(())
            })
        })
        .collect();

    parallel(factories).await.map(|_| ())
}
