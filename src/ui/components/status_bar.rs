// Status bar component - 상태바 컴포넌트
//
// 작업 수, 현재 규칙, 최근 알림 표시

use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// 상태바 컴포넌트
pub struct StatusBar<'a> {
    /// 실행 중인 작업 수
    running: usize,
    /// 끝난 작업 수 (화면에 남아 있는 것)
    finished: usize,
    /// 현재 규칙 표시 이름
    rule_label: &'a str,
    /// 최근 알림 (오류 등)
    notice: Option<&'a str>,
    bg_color: Color,
    fg_color: Color,
    notice_color: Color,
}

impl<'a> Default for StatusBar<'a> {
    fn default() -> Self {
        Self {
            running: 0,
            finished: 0,
            rule_label: "",
            notice: None,
            bg_color: Color::Rgb(0, 122, 204),
            fg_color: Color::White,
            notice_color: Color::Yellow,
        }
    }
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn running(mut self, count: usize) -> Self {
        self.running = count;
        self
    }

    pub fn finished(mut self, count: usize) -> Self {
        self.finished = count;
        self
    }

    pub fn rule_label(mut self, label: &'a str) -> Self {
        self.rule_label = label;
        self
    }

    pub fn notice(mut self, notice: Option<&'a str>) -> Self {
        self.notice = notice;
        self
    }

    /// 테마 적용
    pub fn theme(mut self, theme: &Theme) -> Self {
        self.bg_color = theme.status_bar_bg.to_color();
        self.fg_color = theme.status_bar_fg.to_color();
        self.notice_color = theme.warning.to_color();
        self
    }

    fn left_text(&self) -> String {
        let mut text = format!(" {} running", self.running);
        if self.finished > 0 {
            text.push_str(&format!(", {} done", self.finished));
        }
        text
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.bg_color));

        let left = self.left_text();
        let notice = self
            .notice
            .map(|text| format!(" | {}", text))
            .unwrap_or_default();
        let right = format!("{} ", self.rule_label);

        let used = left.width() + notice.width() + right.width();
        let padding = " ".repeat((area.width as usize).saturating_sub(used));

        let line = Line::from(vec![
            Span::styled(left, Style::default().fg(self.fg_color)),
            Span::styled(notice, Style::default().fg(self.notice_color)),
            Span::raw(padding),
            Span::styled(right, Style::default().fg(self.fg_color)),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}
