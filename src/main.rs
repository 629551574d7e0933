use clap::Parser;
use comuna_temps::cli::{run, Cli};
use comuna_temps::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
