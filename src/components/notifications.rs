use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use ratatui::prelude::*;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::{Component, Frame, ViewState};
use crate::{
  action::{AppAction, TuiAction},
  layout::get_notification_layout,
  ui::notification_box::NotificationBox,
};

const NOTIFICATION_DURATION: Duration = Duration::from_secs(3);
const MAX_NOTIFICATIONS: usize = 4;

#[derive(Default)]
pub struct Notifications {
  notifications: Vec<NotificationWithTimestamp>,
}

pub type NotificationWithTimestamp = (NotificationEnum, Instant);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum NotificationEnum {
  Info(String),
  Warning(String),
  Error(String),
}

impl NotificationEnum {
  pub fn message(&self) -> &str {
    match self {
      NotificationEnum::Info(s) | NotificationEnum::Warning(s) | NotificationEnum::Error(s) => s,
    }
  }
}

impl Notifications {
  pub fn new() -> Self {
    Self::default()
  }

  fn app_tick(&mut self) {
    self.notifications.retain(|(_, timestamp)| timestamp.elapsed() < NOTIFICATION_DURATION);
  }

  fn push(&mut self, notification: NotificationEnum) {
    // oldest goes first
    self.notifications.push((notification, Instant::now()));
    if self.notifications.len() > MAX_NOTIFICATIONS {
      self.notifications.remove(0);
    }
  }
}

impl Component for Notifications {
  fn update(&mut self, action: AppAction) -> Result<Option<AppAction>> {
    match action {
      AppAction::Tui(TuiAction::Tick) => self.app_tick(),
      AppAction::Tui(TuiAction::Notify(notification)) => self.push(notification),
      AppAction::Tui(TuiAction::Error(message)) => self.push(NotificationEnum::Error(message)),
      _ => (),
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, rect: Rect, _state: &ViewState) -> Result<()> {
    for (i, notification) in self.notifications.iter().enumerate() {
      let content = notification.0.message();
      let notification_box = NotificationBox::new(notification, content);
      let rect = get_notification_layout(rect, content, i as u16);
      f.render_widget(notification_box, rect);
    }
    Ok(())
  }
}
