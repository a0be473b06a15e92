//! Session acquisition against the remote automation server.

use std::time::Duration;

use anyhow::{Context, Result};
use fantoccini::ClientBuilder;
use tracing::debug;

use crate::browser::Browser;
use crate::error::HarnessError;
use crate::session::DriverSession;

const SESSION_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Opens [`DriverSession`]s against one automation server endpoint.
///
/// Cheap to clone; the orchestrator clones it into every branch.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    remote_url: String,
}

impl SessionFactory {
    pub fn new(remote_url: impl Into<String>) -> Self {
        Self {
            remote_url: remote_url.into(),
        }
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    /// Open a new remote session for `browser`.
    ///
    /// The capability descriptor comes from the browser's fixed lookup table;
    /// the network round trip is bounded so a dead grid does not hang the
    /// whole run. The returned session must be quit by its owner.
    pub async fn create_session(&self, browser: Browser) -> Result<DriverSession> {
        debug!(%browser, remote_url = %self.remote_url, "creating session");

        let mut builder = ClientBuilder::native();
        let connect = builder
            .capabilities(browser.capabilities())
            .connect(&self.remote_url);

        let client = tokio::time::timeout(SESSION_CONNECT_TIMEOUT, connect)
            .await
            .with_context(|| {
                format!(
                    "connection to automation server {} timed out after {}s",
                    self.remote_url,
                    SESSION_CONNECT_TIMEOUT.as_secs()
                )
            })?
            .map_err(|source| HarnessError::SessionBuild { browser, source })?;

        Ok(DriverSession::new(client, browser))
    }
}
