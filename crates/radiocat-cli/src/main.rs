//! radiocat CLI - daily liveness-checked internet radio catalogs
//!
//! Thin entry point; everything lives in the library so integration tests
//! and the binary share one code path.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    radiocat_cli::run().await
}
