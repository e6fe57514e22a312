mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::Result;
use clap::Parser;

use config::ServerConfig;
use ui::server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = ServerConfig::parse();

    // A bad data file stops startup here.
    let dataset = data::loader::load_file(&config.data)?;

    ui::server::serve(config.bind_addr(), AppState::new(dataset)).await
}
