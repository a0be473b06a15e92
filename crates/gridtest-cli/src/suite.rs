//! The shipped URL-polyfill check suite.
//!
//! Every assertion about the URL implementation runs inside the page context;
//! a mismatch throws there and comes back through the script bridge as a
//! process-side error carrying the remote message and stack. The process side
//! only re-checks the final query string, which exercises round-trip fidelity
//! of the bridge itself.

use std::time::Duration;

use anyhow::{Context, Result};
use gridtest_config::GridConfig;
use gridtest_core::{bridge, Orchestrator};
use tracing::{debug, info};

/// Expected query string after appending `page=1` and deleting `type`.
const EXPECTED_FINAL_SEARCH: &str = "?fr=yset_ie_syc_oracle&page=1";

const URL_SUITE_SCRIPT: &str = r#"
var url = new URL('https://www.yahoo.com:80/?fr=yset_ie_syc_oracle&type=orcl_hpset#page0');

if (url.hash !== '#page0') throw new Error('Invalid hash : ' + url.hash);
if (url.host !== 'www.yahoo.com:80') throw new Error('Invalid host : ' + url.host);
if (url.hostname !== 'www.yahoo.com') throw new Error('Invalid hostname : ' + url.hostname);
if (url.href !== 'https://www.yahoo.com:80/?fr=yset_ie_syc_oracle&type=orcl_hpset#page0') throw new Error('Invalid href : ' + url.href);
if (url.origin !== 'https://www.yahoo.com:80') throw new Error('Invalid origin : ' + url.origin);
if (url.pathname !== '/') throw new Error('Invalid pathname : ' + url.pathname);
if (url.port !== '80') throw new Error('Invalid port : ' + url.port);
if (url.protocol !== 'https:') throw new Error('Invalid protocol : ' + url.protocol);
if (url.search !== '?fr=yset_ie_syc_oracle&type=orcl_hpset') throw new Error('Invalid search : ' + url.search);

url.searchParams.append('page', 1);
if (url.search !== '?fr=yset_ie_syc_oracle&type=orcl_hpset&page=1') throw new Error('Invalid search (append page 1) : ' + url.search);

url.searchParams.delete('type');
if (url.search !== '?fr=yset_ie_syc_oracle&page=1') throw new Error('Invalid search (delete type) : ' + url.search);

return {
  href: url.href,
  search: url.search,
  host: url.host,
  pathname: url.pathname
};
"#;

/// Run the URL suite once per configured browser, all branches in parallel.
pub async fn run_url_suite(config: &GridConfig) -> Result<()> {
    let orchestrator = Orchestrator::against(config.remote_url.clone());
    let test_host = config.test_host.clone();
    let timeouts = config.timeouts.clone();

    orchestrator
        .test_with(&config.browsers, move |mut session, done| {
            let test_host = test_host.clone();
            let timeouts = timeouts.clone();
            async move {
                let browser = session.browser();

                session
                    .set_script_timeout(Duration::from_secs(timeouts.script_secs))
                    .await?;
                session
                    .set_page_load_timeout(Duration::from_secs(timeouts.page_load_secs))
                    .await?;

                session.navigate(&test_host).await?;
                // Give the page's polyfill bootstrap time to run
                tokio::time::sleep(Duration::from_millis(timeouts.settle_ms)).await;

                let components: serde_json::Value =
                    bridge::execute_script(&mut session, URL_SUITE_SCRIPT)
                        .await
                        .with_context(|| format!("URL suite failed in {browser}"))?;
                debug!(%browser, ?components, "suite script returned");

                let search = components
                    .get("search")
                    .and_then(|v| v.as_str())
                    .context("suite script returned no search component")?;
                anyhow::ensure!(
                    search == EXPECTED_FINAL_SEARCH,
                    "search came back as {search:?}, expected {EXPECTED_FINAL_SEARCH:?}"
                );

                session.quit().await?;
                info!(%browser, "URL suite passed");
                done.finish();
                Ok(())
            }
        })
        .await
}
