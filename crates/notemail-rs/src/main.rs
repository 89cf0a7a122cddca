use clap::Parser;
use notemail_rs::{Cli, init_logging, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging();
    run(Cli::parse()).await
}
