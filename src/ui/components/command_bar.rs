// Command bar component - 하단 커맨드 바 컴포넌트
//
// 포커스된 뷰에서 쓸 수 있는 단축키 표시

use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// 커맨드 항목
#[derive(Debug, Clone)]
pub struct CommandItem {
    /// 단축키 표시
    pub key: String,
    pub label: String,
    pub enabled: bool,
}

impl CommandItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// 커맨드 바 컴포넌트
pub struct CommandBar {
    commands: Vec<CommandItem>,
    bg_color: Color,
    key_fg_color: Color,
    label_fg_color: Color,
    disabled_color: Color,
}

impl Default for CommandBar {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            bg_color: Color::Rgb(30, 30, 30),
            key_fg_color: Color::Rgb(0, 120, 212),
            label_fg_color: Color::Rgb(212, 212, 212),
            disabled_color: Color::Rgb(100, 100, 100),
        }
    }
}

impl CommandBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(mut self, commands: Vec<CommandItem>) -> Self {
        self.commands = commands;
        self
    }

    /// 테마 적용
    pub fn theme(mut self, theme: &Theme) -> Self {
        self.bg_color = theme.command_bar_bg.to_color();
        self.key_fg_color = theme.accent.to_color();
        self.label_fg_color = theme.command_bar_fg.to_color();
        self.disabled_color = theme.fg_dim.to_color();
        self
    }

    fn spans(&self) -> Vec<Span<'_>> {
        let mut spans = vec![Span::raw(" ")];
        for (i, cmd) in self.commands.iter().enumerate() {
            let (key_style, label_style) = if cmd.enabled {
                (
                    Style::default()
                        .fg(self.key_fg_color)
                        .add_modifier(Modifier::BOLD),
                    Style::default().fg(self.label_fg_color),
                )
            } else {
                (
                    Style::default().fg(self.disabled_color),
                    Style::default().fg(self.disabled_color),
                )
            };

            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(cmd.key.as_str(), key_style));
            spans.push(Span::styled(":", label_style));
            spans.push(Span::styled(cmd.label.as_str(), label_style));
        }
        spans
    }
}

impl Widget for CommandBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.bg_color));
        Paragraph::new(Line::from(self.spans())).render(area, buf);
    }
}
