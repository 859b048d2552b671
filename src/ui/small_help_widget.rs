use ratatui::{
  buffer::Buffer,
  layout::{Alignment, Rect},
  style::{Color, Style},
  text::Text,
  widgets::{Paragraph, Widget, Wrap},
};

/// One line of colored status text.
#[derive(Default, Debug)]
pub struct SmallHelpWidget {
  content: String,
  color: Color,
  alignment: Alignment,
}

impl SmallHelpWidget {
  pub fn new(content: String, color: Color, alignment: Alignment) -> Self {
    Self { content, color, alignment }
  }
}

impl Widget for SmallHelpWidget {
  fn render(self, area: Rect, buf: &mut Buffer) {
    let text = Text::from(self.content).style(Style::default().fg(self.color).bg(Color::Reset));
    Paragraph::new(text).wrap(Wrap { trim: true }).alignment(self.alignment).render(area, buf);
  }
}
