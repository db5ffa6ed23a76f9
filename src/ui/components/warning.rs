// Warning screen component - 경고 화면 컴포넌트
//
// 터미널이 너무 작을 때 뷰 대신 표시. 실행 중인 작업은 계속 진행된다.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::ui::layout::{MIN_HEIGHT, MIN_WIDTH};
use crate::ui::Theme;

pub struct WarningScreen {
    current_size: (u16, u16),
    /// 실행 중인 작업 수
    running: usize,
    warning_color: Color,
    bg_color: Color,
    fg_color: Color,
    error_color: Color,
}

impl Default for WarningScreen {
    fn default() -> Self {
        Self {
            current_size: (0, 0),
            running: 0,
            warning_color: Color::Yellow,
            bg_color: Color::Rgb(30, 30, 30),
            fg_color: Color::Rgb(212, 212, 212),
            error_color: Color::Red,
        }
    }
}

impl WarningScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_size(mut self, width: u16, height: u16) -> Self {
        self.current_size = (width, height);
        self
    }

    pub fn running(mut self, count: usize) -> Self {
        self.running = count;
        self
    }

    /// 테마 적용
    pub fn theme(mut self, theme: &Theme) -> Self {
        self.warning_color = theme.warning.to_color();
        self.bg_color = theme.bg_primary.to_color();
        self.fg_color = theme.fg_primary.to_color();
        self.error_color = theme.error.to_color();
        self
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(Span::styled("Terminal too small", bold(self.warning_color))),
            Line::from(vec![
                Span::styled(
                    format!("{}x{}", self.current_size.0, self.current_size.1),
                    bold(self.error_color),
                ),
                Span::styled(
                    format!(" / {}x{}", MIN_WIDTH, MIN_HEIGHT),
                    Style::default().fg(self.fg_color),
                ),
            ]),
        ];
        if self.running > 0 {
            lines.push(Line::from(Span::styled(
                format!("{} running", self.running),
                Style::default().fg(self.fg_color),
            )));
        }
        lines
    }
}

impl Widget for WarningScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.bg_color));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.warning_color))
            .style(Style::default().bg(self.bg_color));

        Paragraph::new(self.lines())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(block)
            .render(area, buf);
    }
}
