//! 설정 뷰 위젯: 규칙 목록, 자동 닫기 체크박스, Accept 버튼

use crate::models::CompressionRule;
use crate::ui::Theme;
use crate::utils::path_display::truncate_middle;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct SettingsPanel<'a> {
    rules: &'a [CompressionRule],
    selectable: &'a [usize],
    selected: Option<usize>,
    close_on_finish: bool,
    apply_enabled: bool,
    focused: bool,
    bg_color: Color,
    fg_color: Color,
    dim_color: Color,
    active_border: Color,
    inactive_border: Color,
    selected_fg: Color,
    selected_bg: Color,
    accent: Color,
}

impl<'a> SettingsPanel<'a> {
    pub fn new(rules: &'a [CompressionRule], selectable: &'a [usize]) -> Self {
        Self {
            rules,
            selectable,
            selected: None,
            close_on_finish: true,
            apply_enabled: false,
            focused: false,
            bg_color: Color::Rgb(37, 37, 38),
            fg_color: Color::Rgb(212, 212, 212),
            dim_color: Color::Rgb(128, 128, 128),
            active_border: Color::Rgb(0, 120, 212),
            inactive_border: Color::Rgb(60, 60, 60),
            selected_fg: Color::White,
            selected_bg: Color::Rgb(0, 120, 212),
            accent: Color::Rgb(0, 120, 212),
        }
    }

    /// 선택된 규칙 (규칙 목록 인덱스)
    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    pub fn close_on_finish(mut self, value: bool) -> Self {
        self.close_on_finish = value;
        self
    }

    pub fn apply_enabled(mut self, value: bool) -> Self {
        self.apply_enabled = value;
        self
    }

    pub fn focused(mut self, value: bool) -> Self {
        self.focused = value;
        self
    }

    pub fn theme(mut self, theme: &Theme) -> Self {
        self.bg_color = theme.panel_bg.to_color();
        self.fg_color = theme.fg_primary.to_color();
        self.dim_color = theme.fg_dim.to_color();
        self.active_border = theme.panel_active_border.to_color();
        self.inactive_border = theme.panel_inactive_border.to_color();
        self.selected_fg = theme.item_selected.to_color();
        self.selected_bg = theme.item_selected_bg.to_color();
        self.accent = theme.accent.to_color();
        self
    }

    fn rule_lines(&self, width: usize) -> Vec<Line<'static>> {
        if self.selectable.is_empty() {
            return vec![Line::from(Span::styled(
                "No compression tool from the rules file is installed",
                Style::default().fg(self.dim_color),
            ))];
        }

        self.selectable
            .iter()
            .map(|&index| {
                let is_selected = self.selected == Some(index);
                let marker = if is_selected { "(•) " } else { "( ) " };
                let label = truncate_middle(&self.rules[index].label(), width.saturating_sub(4));
                let style = if is_selected && self.focused {
                    Style::default().fg(self.selected_fg).bg(self.selected_bg)
                } else if is_selected {
                    Style::default()
                        .fg(self.fg_color)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.fg_color)
                };
                Line::from(Span::styled(format!("{}{}", marker, label), style))
            })
            .collect()
    }
}

impl Widget for SettingsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let border = if self.focused {
            self.active_border
        } else {
            self.inactive_border
        };
        let block = Block::default()
            .title(" Archiver settings ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(self.bg_color));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = self.rule_lines(inner.width as usize);
        lines.push(Line::from(""));

        let checkbox = if self.close_on_finish { "[x]" } else { "[ ]" };
        lines.push(Line::from(vec![
            Span::styled(checkbox, Style::default().fg(self.accent)),
            Span::styled(
                " Close view after compression",
                Style::default().fg(self.fg_color),
            ),
        ]));

        let button_style = if self.apply_enabled {
            Style::default()
                .fg(self.selected_fg)
                .bg(self.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.dim_color)
        };
        lines.push(Line::from(Span::styled(" Accept ", button_style)).right_aligned());

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn rule(description: &str, variant: &str) -> CompressionRule {
        CompressionRule {
            description: description.into(),
            variant: variant.into(),
            mime_type: "application/zip".into(),
            extension: ".zip".into(),
            executable: PathBuf::from("/bin/zip"),
            arguments: vec![],
        }
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)).map(|cell| cell.symbol().to_string()))
            .collect()
    }

    #[test]
    fn test_render_marks_selected_rule() {
        let rules = vec![rule("ZIP", "fast"), rule("ZIP", "best")];
        let selectable = vec![0, 1];
        let area = Rect::new(0, 0, 40, 7);
        let mut buf = Buffer::empty(area);

        SettingsPanel::new(&rules, &selectable)
            .selected(Some(1))
            .render(area, &mut buf);

        assert!(row_text(&buf, 1).contains("( ) ZIP [fast]"));
        assert!(row_text(&buf, 2).contains("(•) ZIP [best]"));
        assert!(row_text(&buf, 4).contains("[x] Close view"));
    }

    #[test]
    fn test_render_without_selectable_rules() {
        let rules = vec![rule("ZIP", "")];
        let area = Rect::new(0, 0, 60, 6);
        let mut buf = Buffer::empty(area);

        SettingsPanel::new(&rules, &[]).render(area, &mut buf);

        assert!(row_text(&buf, 1).contains("No compression tool"));
    }
}
