use clap::Parser;

use stickerpea::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    stickerpea::core::app::run(Cli::parse()).await
}
