use anyhow::Result;
use clap::Parser;
use vocab::{init_logging, run, ServerArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    init_logging(&args.log_level);

    run(args).await
}
