use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    gridtest_cli::run().await
}
