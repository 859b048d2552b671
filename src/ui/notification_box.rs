use ratatui::{
  buffer::Buffer,
  layout::{Alignment, Rect},
  style::{Color, Modifier, Style},
  text::Text,
  widgets::{Block, BorderType, Clear, Paragraph, Widget, Wrap},
};

use crate::components::notifications::{NotificationEnum, NotificationWithTimestamp};

#[derive(Debug)]
pub struct NotificationBox<'a> {
  notification: &'a NotificationWithTimestamp,
  content: &'a str,
}

impl<'a> NotificationBox<'a> {
  pub fn new(notification: &'a NotificationWithTimestamp, content: &'a str) -> Self {
    Self { notification, content }
  }

  fn title(&self) -> &'static str {
    match &self.notification.0 {
      NotificationEnum::Info(_) => "Info",
      NotificationEnum::Warning(_) => "Warning",
      NotificationEnum::Error(_) => "Error",
    }
  }
}

impl Widget for NotificationBox<'_> {
  fn render(self, area: Rect, buf: &mut Buffer) {
    Clear.render(area, buf);

    let color = match &self.notification.0 {
      NotificationEnum::Info(_) => Color::Blue,
      NotificationEnum::Warning(_) => Color::Yellow,
      NotificationEnum::Error(_) => Color::Red,
    };
    let block = Block::bordered()
      .border_type(BorderType::Rounded)
      .title(self.title())
      .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

    let text = Text::from(self.content.to_string()).style(Style::default().fg(color).bg(Color::Reset));

    Paragraph::new(text).alignment(Alignment::Right).wrap(Wrap { trim: true }).block(block).render(area, buf);
  }
}
