//! Ownership handle for one live remote browser instance.

use std::time::Duration;

use anyhow::{Context, Result};
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, Locator};
use serde_json::Value;
use tracing::debug;

use crate::browser::Browser;

/// One remote browser under automation control.
///
/// Created by [`crate::SessionFactory`], used exclusively by the test branch
/// it was handed to, and terminated by [`DriverSession::quit`], which consumes
/// the handle so no further operation is expressible afterwards. The remote
/// session leaks if the owner never quits; the orchestrator does not clean up
/// on its behalf.
pub struct DriverSession {
    client: Client,
    browser: Browser,
}

impl DriverSession {
    pub(crate) fn new(client: Client, browser: Browser) -> Self {
        Self { client, browser }
    }

    pub fn browser(&self) -> Browser {
        self.browser
    }

    /// Load a page into the session.
    pub async fn navigate(&mut self, url: &str) -> Result<()> {
        debug!(browser = %self.browser, url, "navigating");
        self.client
            .goto(url)
            .await
            .with_context(|| format!("failed to navigate {} session to {}", self.browser, url))?;
        Ok(())
    }

    /// Set how long the remote server lets an async script run before it
    /// aborts the call. The script bridge relies on this; it has no timeout
    /// of its own.
    pub async fn set_script_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.client
            .update_timeouts(script_timeout_config(timeout))
            .await
            .context("failed to set the script timeout")?;
        Ok(())
    }

    /// Set the page-load timeout for subsequent navigations.
    pub async fn set_page_load_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.client
            .update_timeouts(page_load_timeout_config(timeout))
            .await
            .context("failed to set the page-load timeout")?;
        Ok(())
    }

    /// Execute a script synchronously in the page context. Raw passthrough;
    /// most callers want the result contract in [`crate::bridge`] instead.
    pub async fn execute(&mut self, script: &str, args: Vec<Value>) -> Result<Value> {
        Ok(self.client.execute(script, args).await?)
    }

    /// Execute a script through the WebDriver async path, where the final
    /// argument is the completion callback. Raw passthrough for the bridge.
    pub async fn execute_async(&mut self, script: &str, args: Vec<Value>) -> Result<Value> {
        Ok(self.client.execute_async(script, args).await?)
    }

    pub async fn current_url(&self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    /// Wait until the element matching `selector` is gone or hidden.
    pub async fn wait_until_gone(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(100);

        loop {
            match self.client.find(Locator::Css(selector)).await {
                // A detached element counts as gone
                Err(_) => return Ok(()),
                Ok(element) => {
                    if !element.is_displayed().await.unwrap_or(false) {
                        return Ok(());
                    }
                }
            }

            if start.elapsed() >= timeout {
                anyhow::bail!("timeout waiting for element to disappear: {}", selector);
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Terminate the remote session. Consumes the handle.
    pub async fn quit(self) -> Result<()> {
        debug!(browser = %self.browser, "quitting session");
        self.client
            .close()
            .await
            .with_context(|| format!("failed to quit the {} session", self.browser))?;
        Ok(())
    }
}

// `TimeoutConfiguration::new` takes (script, page_load, implicit). Each
// setter must touch only its own slot; an accidental implicit wait would
// also slow every `find` poll in `wait_until_gone`.
fn script_timeout_config(timeout: Duration) -> TimeoutConfiguration {
    TimeoutConfiguration::new(Some(timeout), None, None)
}

fn page_load_timeout_config(timeout: Duration) -> TimeoutConfiguration {
    TimeoutConfiguration::new(None, Some(timeout), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_timeout_lands_in_the_script_slot() {
        let config = script_timeout_config(Duration::from_secs(15));
        assert_eq!(config.script(), Some(Duration::from_secs(15)));
        assert_eq!(config.page_load(), None);
        assert_eq!(config.implicit(), None);
    }

    #[test]
    fn page_load_timeout_lands_in_the_page_load_slot() {
        let config = page_load_timeout_config(Duration::from_secs(10));
        assert_eq!(config.page_load(), Some(Duration::from_secs(10)));
        assert_eq!(config.script(), None);
        assert_eq!(config.implicit(), None);
    }

    #[test]
    fn session_is_send() {
        // Branches run as spawned tasks, so the handle must cross threads
        fn assert_send<T: Send>() {}
        assert_send::<DriverSession>();
    }
}
