pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod counter;
pub mod layout;
pub mod meta;
pub mod mode;
pub mod runtime;
pub mod tui;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::{Cli, LayoutKind};
use color_eyre::eyre::Result;

use crate::{
  app::App,
  config::Config,
  counter::{AppState, Counter},
  meta::{MetaApp, MetaState},
  runtime::Effects,
  utils::{initialize_logging, initialize_panic_handler},
};

async fn tokio_main() -> Result<()> {
  initialize_logging()?;
  initialize_panic_handler()?;

  let args = Cli::parse();
  let mut config = Config::new()?;
  args.apply(&mut config.fetch);
  log::info!("Fetch settings: {:?}", config.fetch);

  let counter = Counter::new(config.fetch.fetch_settings());
  let effects = Effects::new(config.fetch.effect_settings())?;
  let mut app = App::new(config, args.tick_rate, args.frame_rate);
  match args.layout {
    LayoutKind::Single => app.run(counter, AppState::new(), effects).await?,
    LayoutKind::Split => app.run(MetaApp::new(counter), MetaState::default(), effects).await?,
  }

  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  if let Err(e) = tokio_main().await {
    eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
    Err(e)
  } else {
    Ok(())
  }
}
