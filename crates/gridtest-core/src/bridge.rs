//! Script bridge between the orchestrating process and the page context.
//!
//! Injected scripts get local `resolve(data)` / `reject(error)` bindings that
//! funnel into the WebDriver async-script completion callback as a single
//! `{success, data | error}` outcome, with a top-level try/catch so uncaught
//! throws land on the reject path. The outcome is never exposed raw: it comes
//! back as the resolved data or as a process-side error carrying the remote
//! description and stack.
//!
//! Arguments travel through the WebDriver argument mechanism, never through
//! text interpolation; inside the script they are visible as `args` (the
//! trailing completion callback is stripped off).

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::HarnessError;
use crate::session::DriverSession;

/// Execute a synchronous-looking script body and return its value.
///
/// The body is wrapped as an immediately-invoked function whose return value
/// feeds `resolve`, so the author never touches completion callbacks.
pub async fn execute_script(session: &mut DriverSession, body: &str) -> Result<Value> {
    execute_async_script(session, &wrap_sync(body), Vec::new()).await
}

/// Like [`execute_script`], with arguments marshalled into the page context.
pub async fn execute_script_with_args(
    session: &mut DriverSession,
    body: &str,
    args: Vec<Value>,
) -> Result<Value> {
    execute_async_script(session, &wrap_sync(body), args).await
}

/// Execute a script that settles itself by calling `resolve` or `reject`.
///
/// The caller must have set a script timeout on the session beforehand; the
/// bridge has no timeout of its own and otherwise waits as long as the remote
/// server allows.
pub async fn execute_async_script(
    session: &mut DriverSession,
    script: &str,
    args: Vec<Value>,
) -> Result<Value> {
    debug!(browser = %session.browser(), script_len = script.len(), "executing script");

    let raw = session.execute_async(&wrap_async(script), args).await?;
    let outcome: ScriptOutcome = serde_json::from_value(raw)
        .context("script bridge returned an unexpected result shape")?;
    Ok(outcome.into_result()?)
}

/// Outcome shape produced by the async wrapper inside the page.
#[derive(Debug, Deserialize)]
struct ScriptOutcome {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<ScriptFault>,
}

#[derive(Debug, Default, Deserialize)]
struct ScriptFault {
    #[serde(default)]
    description: String,
    #[serde(default)]
    stack: String,
}

impl ScriptOutcome {
    fn into_result(self) -> Result<Value, HarnessError> {
        if self.success {
            Ok(self.data)
        } else {
            let fault = self.error.unwrap_or_default();
            Err(HarnessError::ScriptExecution {
                description: fault.description,
                stack: fault.stack,
            })
        }
    }
}

fn wrap_sync(body: &str) -> String {
    format!(
        "resolve((function () {{\n{body}\n}})());"
    )
}

fn wrap_async(script: &str) -> String {
    format!(
        r#"var __done = arguments[arguments.length - 1];
var args = Array.prototype.slice.call(arguments, 0, arguments.length - 1);
var resolve = function (data) {{
  __done({{ success: true, data: data }});
}};
var reject = function (error) {{
  var description = error && (error.description || error.message);
  __done({{
    success: false,
    error: {{
      description: description ? String(description) : String(error),
      stack: error && error.stack ? String(error.stack) : ''
    }}
  }});
}};
try {{
{script}
}} catch (error) {{
  reject(error);
}}"#
    )
}
