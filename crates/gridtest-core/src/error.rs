//! Typed failure kinds for the orchestrator.
//!
//! Public async APIs return `anyhow::Result`; these variants travel inside it
//! and stay reachable through `downcast_ref` when callers need to tell the
//! failure modes apart.

use crate::browser::Browser;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A browser name outside the supported set reached the parse boundary.
    #[error("unsupported browser '{name}' (expected one of: chrome, firefox, opera, ie)")]
    UnsupportedBrowser { name: String },

    /// The remote automation server refused or failed to create a session.
    #[error("failed to build a {browser} session against the automation server")]
    SessionBuild {
        browser: Browser,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    /// The injected script rejected or threw inside the page context.
    /// The message carries the remote description and stack, joined.
    #[error("{description}\n\n{stack}")]
    ScriptExecution { description: String, stack: String },

    /// A test branch dropped its completion signal without finishing.
    #[error("{browser} branch dropped its completion signal before calling finish")]
    Branch { browser: Browser },
}
