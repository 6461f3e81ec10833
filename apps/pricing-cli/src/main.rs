//! `gulong-pricing` binary.

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gulong_pricing::init_tracing();

    let cli = gulong_pricing::Cli::parse();
    gulong_pricing::run(cli).await?;

    Ok(())
}
