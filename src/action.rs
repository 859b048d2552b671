use std::fmt;

use serde::{
  de::{self, Deserializer, Visitor},
  Deserialize,
};
use strum::Display;

use crate::{components::notifications::NotificationEnum, counter::Action, mode::Mode};

/// What a keybinding or component can ask for: either terminal housekeeping or
/// a counter action for the focused pane.
#[derive(Display, Clone, Debug, PartialEq)]
pub enum AppAction {
  Tui(TuiAction),
  Counter(Action),
}

#[derive(Display, Debug, Clone, PartialEq)]
pub enum TuiAction {
  Tick,
  Render,
  Resize(u16, u16),
  Suspend,
  Resume,
  Quit,
  Error(String),
  FocusNext,
  FocusPrevious,
  ChangeMode(Mode),
  Notify(NotificationEnum),
  Status(String),
}

impl<'de> Deserialize<'de> for AppAction {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    struct ActionVisitor;

    impl<'de> Visitor<'de> for ActionVisitor {
      type Value = AppAction;

      fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a valid string representation of Action")
      }

      fn visit_str<E>(self, value: &str) -> Result<AppAction, E>
      where
        E: de::Error,
      {
        match value {
          // -- terminal actions
          "Tick" => Ok(AppAction::Tui(TuiAction::Tick)),
          "Render" => Ok(AppAction::Tui(TuiAction::Render)),
          "Suspend" => Ok(AppAction::Tui(TuiAction::Suspend)),
          "Resume" => Ok(AppAction::Tui(TuiAction::Resume)),
          "Quit" => Ok(AppAction::Tui(TuiAction::Quit)),
          "FocusNext" => Ok(AppAction::Tui(TuiAction::FocusNext)),
          "FocusPrevious" => Ok(AppAction::Tui(TuiAction::FocusPrevious)),
          "InputMode" => Ok(AppAction::Tui(TuiAction::ChangeMode(Mode::Input))),
          "NormalMode" => Ok(AppAction::Tui(TuiAction::ChangeMode(Mode::Normal))),
          data if data.starts_with("Error(") => {
            let error_msg = data.trim_start_matches("Error(").trim_end_matches(')');
            Ok(AppAction::Tui(TuiAction::Error(error_msg.to_string())))
          },
          data if data.starts_with("Resize(") => {
            let parts: Vec<&str> = data.trim_start_matches("Resize(").trim_end_matches(')').split(',').collect();
            if parts.len() == 2 {
              let width: u16 = parts[0].trim().parse().map_err(E::custom)?;
              let height: u16 = parts[1].trim().parse().map_err(E::custom)?;
              Ok(AppAction::Tui(TuiAction::Resize(width, height)))
            } else {
              Err(E::custom(format!("Invalid Resize format: {}", value)))
            }
          },
          // -- counter actions
          "Noop" => Ok(AppAction::Counter(Action::Noop)),
          "Increment" => Ok(AppAction::Counter(Action::Increment)),
          "Decrement" => Ok(AppAction::Counter(Action::Decrement)),
          "DelayedIncrement" => Ok(AppAction::Counter(Action::DelayedIncrement)),
          "DelayedDecrement" => Ok(AppAction::Counter(Action::DelayedDecrement)),
          "FetchUsers" => Ok(AppAction::Counter(Action::FetchUsers)),
          // following the link only counts the click
          "FollowLink" => Ok(AppAction::Counter(Action::Increment)),
          _ => Err(E::custom(format!("Unknown Action variant: {}", value))),
        }
      }
    }

    deserializer.deserialize_str(ActionVisitor)
  }
}
