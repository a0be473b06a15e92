//! CLI argument parsing for gridtest.

use clap::Parser;
use gridtest_core::Browser;

#[derive(Parser, Clone)]
#[command(name = "gridtest")]
#[command(about = "Run the URL suite across remote browsers on an automation grid")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the automation server endpoint (e.g. http://localhost:4444/wd/hub)
    #[arg(long, value_name = "URL")]
    pub remote_url: Option<String>,

    /// Override the page loaded into each session before the suite runs
    #[arg(long, value_name = "URL")]
    pub test_host: Option<String>,

    /// Browser to run against; repeatable, overrides the configured list
    #[arg(short, long = "browser", value_name = "NAME")]
    pub browsers: Vec<Browser>,
}
