//! Unicampi CLI binary.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use unicampi::cli::Cli;

/// Main entry point for the unicampi CLI.
///
/// Commands read local snapshots one after another, so the current-thread
/// runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Example: RUST_LOG=unicampi=debug,unicampi_query=trace unicampi query
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("unicampi=info,unicampi_query=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting unicampi CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Unicampi CLI completed successfully");
    Ok(())
}
