use anyhow::Result;
use clap::Parser;

use mdview::cli::CliArgs;
use mdview::config::ViewerConfig;

fn main() -> Result<()> {
    mdview::tracing::init();

    let args = CliArgs::parse();
    let startup = args
        .into_config(ViewerConfig::load())
        .map_err(anyhow::Error::msg)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(mdview::runtime::run(startup))
}
