use clap::{Parser, ValueEnum};

use crate::{config::FetchConfig, utils::version};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LayoutKind {
  /// One counter app.
  Single,
  /// Two independent counter apps side by side.
  #[default]
  Split,
}

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
  #[arg(short, long, value_enum, help = "How many counter apps to run", default_value_t = LayoutKind::Split)]
  pub layout: LayoutKind,

  #[arg(short, long, value_name = "URL", help = "Endpoint returning the users JSON array")]
  pub users_url: Option<String>,

  #[arg(long, value_name = "MS", help = "Per-request timeout for the users fetch")]
  pub timeout_ms: Option<u64>,

  #[arg(short, long, value_name = "N", help = "Retry the users fetch up to N attempts")]
  pub retries: Option<u32>,

  #[arg(short, long, value_name = "FLOAT", help = "Tick rate, i.e. number of ticks per second", default_value_t = 4.0)]
  pub tick_rate: f64,

  #[arg(
    short,
    long,
    value_name = "FLOAT",
    help = "Frame rate, i.e. number of frames per second",
    default_value_t = 24.0
  )]
  pub frame_rate: f64,
}

impl Cli {
  /// Flags given on the command line win over the configuration file.
  pub fn apply(&self, fetch: &mut FetchConfig) {
    if let Some(users_url) = &self.users_url {
      fetch.users_url = users_url.clone();
    }
    if let Some(timeout_ms) = self.timeout_ms {
      fetch.timeout_ms = timeout_ms;
    }
    if let Some(retries) = self.retries {
      fetch.retries = Some(retries);
    }
  }
}
