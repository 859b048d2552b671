use std::{
  collections::HashMap,
  path::{Path, PathBuf},
  time::Duration,
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{de::Deserializer, Deserialize};

use crate::{
  action::AppAction,
  counter::FetchSettings,
  mode::Mode,
  runtime::EffectSettings,
  utils::{get_config_dir, get_data_dir},
};

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub _data_dir: PathBuf,
  #[serde(default)]
  pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
  pub users_url: String,
  pub timeout_ms: u64,
  pub retries: Option<u32>,
  pub retry_backoff_ms: u64,
}

impl Default for FetchConfig {
  fn default() -> Self {
    let settings = FetchSettings::default();
    Self {
      users_url: settings.users_url,
      timeout_ms: settings.timeout.as_millis() as u64,
      retries: settings.retries,
      retry_backoff_ms: EffectSettings::default().retry_backoff.as_millis() as u64,
    }
  }
}

impl FetchConfig {
  pub fn fetch_settings(&self) -> FetchSettings {
    FetchSettings {
      users_url: self.users_url.clone(),
      timeout: Duration::from_millis(self.timeout_ms),
      retries: self.retries,
    }
  }

  pub fn effect_settings(&self) -> EffectSettings {
    EffectSettings { retry_backoff: Duration::from_millis(self.retry_backoff_ms) }
  }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
  #[serde(default, flatten)]
  pub config: AppConfig,
  #[serde(default)]
  pub keybindings: KeyBindings,
  #[serde(default)]
  pub fetch: FetchConfig,
}

impl Config {
  pub fn new() -> Result<Self, config::ConfigError> {
    Self::load(&get_config_dir(), &get_data_dir())
  }

  /// Embedded defaults first, then whichever config files exist in `config_dir`.
  pub fn load(config_dir: &Path, data_dir: &Path) -> Result<Self, config::ConfigError> {
    let mut builder = config::Config::builder()
      .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
      .set_default("_config_dir", config_dir.to_string_lossy().to_string())?
      .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

    let config_files = [
      ("config.json5", config::FileFormat::Json5),
      ("config.json", config::FileFormat::Json),
      ("config.toml", config::FileFormat::Toml),
    ];
    let mut found_config = false;
    for (file, format) in &config_files {
      builder = builder.add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
      if config_dir.join(file).exists() {
        found_config = true
      }
    }
    if !found_config {
      log::info!("No configuration file found in {}, using defaults", config_dir.display());
    }

    builder.build()?.try_deserialize()
  }
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyBindings(pub HashMap<Mode, HashMap<Vec<KeyEvent>, AppAction>>);

impl<'de> Deserialize<'de> for KeyBindings {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let parsed_map = HashMap::<Mode, HashMap<String, AppAction>>::deserialize(deserializer)?;

    let mut keybindings = HashMap::new();
    for (mode, inner_map) in parsed_map {
      let mut converted = HashMap::new();
      for (key_str, cmd) in inner_map {
        let keys = parse_key_sequence(&key_str).map_err(serde::de::Error::custom)?;
        converted.insert(keys, cmd);
      }
      keybindings.insert(mode, converted);
    }

    Ok(KeyBindings(keybindings))
  }
}

fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
  let raw_lower = raw.to_ascii_lowercase();
  let (remaining, modifiers) = extract_modifiers(&raw_lower);
  parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
  let mut modifiers = KeyModifiers::empty();
  let mut current = raw;

  loop {
    match current {
      rest if rest.starts_with("ctrl-") => {
        modifiers.insert(KeyModifiers::CONTROL);
        current = &rest[5..];
      },
      rest if rest.starts_with("alt-") => {
        modifiers.insert(KeyModifiers::ALT);
        current = &rest[4..];
      },
      rest if rest.starts_with("shift-") => {
        modifiers.insert(KeyModifiers::SHIFT);
        current = &rest[6..];
      },
      _ => break,
    };
  }

  (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, mut modifiers: KeyModifiers) -> Result<KeyEvent, String> {
  let c = match raw {
    "esc" => KeyCode::Esc,
    "enter" => KeyCode::Enter,
    "left" => KeyCode::Left,
    "right" => KeyCode::Right,
    "up" => KeyCode::Up,
    "down" => KeyCode::Down,
    "home" => KeyCode::Home,
    "end" => KeyCode::End,
    "pageup" => KeyCode::PageUp,
    "pagedown" => KeyCode::PageDown,
    "backtab" => {
      modifiers.insert(KeyModifiers::SHIFT);
      KeyCode::BackTab
    },
    "backspace" => KeyCode::Backspace,
    "delete" => KeyCode::Delete,
    "insert" => KeyCode::Insert,
    "f1" => KeyCode::F(1),
    "f2" => KeyCode::F(2),
    "f3" => KeyCode::F(3),
    "f4" => KeyCode::F(4),
    "f5" => KeyCode::F(5),
    "space" => KeyCode::Char(' '),
    "hyphen" | "minus" => KeyCode::Char('-'),
    "tab" => KeyCode::Tab,
    c if c.chars().count() == 1 => {
      let mut c = c.chars().next().unwrap_or_default();
      if modifiers.contains(KeyModifiers::SHIFT) {
        c = c.to_ascii_uppercase();
      }
      KeyCode::Char(c)
    },
    _ => return Err(format!("Unable to parse {raw}")),
  };
  Ok(KeyEvent::new(c, modifiers))
}

pub fn parse_key_sequence(raw: &str) -> Result<Vec<KeyEvent>, String> {
  if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
    return Err(format!("Unable to parse `{}`", raw));
  }
  let raw = if !raw.contains("><") {
    let raw = raw.strip_prefix('<').unwrap_or(raw);
    raw.strip_suffix('>').unwrap_or(raw)
  } else {
    raw
  };
  let sequences = raw
    .split("><")
    .map(|seq| {
      if let Some(s) = seq.strip_prefix('<') {
        s
      } else if let Some(s) = seq.strip_suffix('>') {
        s
      } else {
        seq
      }
    })
    .collect::<Vec<_>>();

  sequences.into_iter().map(parse_key_event).collect()
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::{action::TuiAction, counter::Action};

  #[test]
  fn embedded_config_parses() {
    let config: Config = json5::from_str(CONFIG).expect("embedded config");
    let normal = config.keybindings.get(&Mode::Normal).expect("normal bindings");

    assert_eq!(normal.get(&parse_key_sequence("<+>").unwrap()), Some(&AppAction::Counter(Action::Increment)));
    assert_eq!(normal.get(&parse_key_sequence("<f>").unwrap()), Some(&AppAction::Counter(Action::FetchUsers)));
    assert_eq!(normal.get(&parse_key_sequence("<q>").unwrap()), Some(&AppAction::Tui(TuiAction::Quit)));

    let input = config.keybindings.get(&Mode::Input).expect("input bindings");
    assert_eq!(
      input.get(&parse_key_sequence("<esc>").unwrap()),
      Some(&AppAction::Tui(TuiAction::ChangeMode(Mode::Normal)))
    );
    assert_eq!(config.fetch, FetchConfig::default());
  }

  #[test]
  fn fetch_section_overrides_defaults() {
    let config: Config =
      json5::from_str(r#"{ fetch: { timeout_ms: 35, retries: 5 } }"#).expect("config with fetch section");
    let settings = config.fetch.fetch_settings();

    assert_eq!(settings.timeout, Duration::from_millis(35));
    assert_eq!(settings.retries, Some(5));
    assert_eq!(settings.users_url, FetchSettings::default().users_url);
  }

  fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("counterfx-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[test]
  fn load_reads_the_embedded_fetch_section() {
    let dir = scratch_dir("empty");
    let config = Config::load(&dir, &dir).unwrap();
    let embedded: Config = json5::from_str(CONFIG).unwrap();

    assert_eq!(config.fetch, embedded.fetch);
    assert_eq!(config.config._config_dir, dir);
    assert_eq!(
      config.keybindings.get(&Mode::Normal).and_then(|b| b.get(&parse_key_sequence("<f>").unwrap())),
      Some(&AppAction::Counter(Action::FetchUsers))
    );
  }

  #[test]
  fn user_file_overrides_single_fields_and_keeps_default_bindings() {
    let dir = scratch_dir("override");
    std::fs::write(
      dir.join("config.json5"),
      r#"{ fetch: { timeout_ms: 35 }, keybindings: { Normal: { "<x>": "Decrement" } } }"#,
    )
    .unwrap();
    let config = Config::load(&dir, &dir).unwrap();
    let embedded: Config = json5::from_str(CONFIG).unwrap();

    assert_eq!(config.fetch, FetchConfig { timeout_ms: 35, ..embedded.fetch });
    let normal = config.keybindings.get(&Mode::Normal).unwrap();
    assert_eq!(normal.get(&parse_key_sequence("<x>").unwrap()), Some(&AppAction::Counter(Action::Decrement)));
    assert_eq!(normal.get(&parse_key_sequence("<q>").unwrap()), Some(&AppAction::Tui(TuiAction::Quit)));
  }

  #[test]
  fn simple_keys() {
    assert_eq!(parse_key_event("a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty()));
    assert_eq!(parse_key_event("enter").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));
    assert_eq!(parse_key_event("esc").unwrap(), KeyEvent::new(KeyCode::Esc, KeyModifiers::empty()));
  }

  #[test]
  fn with_modifiers() {
    assert_eq!(parse_key_event("ctrl-a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
    assert_eq!(parse_key_event("alt-enter").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
    assert_eq!(parse_key_event("shift-backtab").unwrap(), KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
  }

  #[test]
  fn multi_key_sequences() {
    assert_eq!(
      parse_key_sequence("<ctrl-c><q>").unwrap(),
      vec![KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), KeyEvent::new(KeyCode::Char('q'), KeyModifiers::empty())]
    );
  }

  #[test]
  fn invalid_keys() {
    assert!(parse_key_event("invalid-key").is_err());
    assert!(parse_key_sequence("<ctrl-a").is_err());
  }
}
