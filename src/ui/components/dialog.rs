//! 확인 다이얼로그
//!
//! 작업 중지 확인과 실행 중 종료 확인에 쓰인다.

use crate::core::events::ViewId;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

/// 다이얼로그 내부 좌우 패딩 (border 안쪽 여백)
const DIALOG_H_PADDING: u16 = 2;
/// 다이얼로그 내부 상단 패딩 (border 아래 여백)
const DIALOG_V_PADDING: u16 = 1;

/// 다이얼로그 종류
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    /// 작업 중지 확인
    ConfirmStop {
        view: ViewId,
        output_name: String,
        selected_button: usize, // 0: Stop, 1: Keep going
    },
    /// 실행 중인 작업이 있을 때 종료 확인
    ConfirmQuit {
        running: usize,
        selected_button: usize, // 0: Quit, 1: Cancel
    },
}

impl DialogKind {
    pub fn confirm_stop(view: ViewId, output_name: impl Into<String>) -> Self {
        DialogKind::ConfirmStop {
            view,
            output_name: output_name.into(),
            selected_button: 0,
        }
    }

    pub fn confirm_quit(running: usize) -> Self {
        DialogKind::ConfirmQuit {
            running,
            selected_button: 0,
        }
    }

    pub fn selected_button(&self) -> usize {
        match self {
            DialogKind::ConfirmStop {
                selected_button, ..
            }
            | DialogKind::ConfirmQuit {
                selected_button, ..
            } => *selected_button,
        }
    }

    /// 버튼 전환 (두 버튼)
    pub fn toggle_button(&mut self) {
        match self {
            DialogKind::ConfirmStop {
                selected_button, ..
            }
            | DialogKind::ConfirmQuit {
                selected_button, ..
            } => *selected_button = 1 - (*selected_button).min(1),
        }
    }

    fn title(&self) -> &'static str {
        match self {
            DialogKind::ConfirmStop { .. } => "Stop compression",
            DialogKind::ConfirmQuit { .. } => "Quit",
        }
    }

    fn message(&self) -> String {
        match self {
            DialogKind::ConfirmStop { output_name, .. } => format!(
                "Are you sure you want to stop creating {}?",
                output_name
            ),
            DialogKind::ConfirmQuit { running: 1, .. } => {
                "An archive is still being created. Stop it and quit?".to_string()
            }
            DialogKind::ConfirmQuit { running, .. } => format!(
                "{} archives are still being created. Stop them and quit?",
                running
            ),
        }
    }

    fn buttons(&self) -> [&'static str; 2] {
        match self {
            DialogKind::ConfirmStop { .. } => ["Stop", "Keep going"],
            DialogKind::ConfirmQuit { .. } => ["Quit", "Cancel"],
        }
    }
}

/// 다이얼로그 위젯
pub struct Dialog<'a> {
    kind: &'a DialogKind,
    bg_color: Color,
    fg_color: Color,
    border_color: Color,
    title_color: Color,
    button_bg: Color,
    button_fg: Color,
    button_selected_bg: Color,
    button_selected_fg: Color,
}

impl<'a> Dialog<'a> {
    pub fn new(kind: &'a DialogKind) -> Self {
        Self {
            kind,
            bg_color: Color::Rgb(45, 45, 48),
            fg_color: Color::Rgb(212, 212, 212),
            border_color: Color::Rgb(244, 71, 71),
            title_color: Color::Rgb(244, 71, 71),
            button_bg: Color::Rgb(60, 60, 60),
            button_fg: Color::Rgb(212, 212, 212),
            button_selected_bg: Color::Rgb(0, 120, 212),
            button_selected_fg: Color::White,
        }
    }

    /// 테마 적용
    pub fn theme(mut self, theme: &Theme) -> Self {
        self.bg_color = theme.panel_bg.to_color();
        self.fg_color = theme.fg_primary.to_color();
        self.border_color = theme.error.to_color();
        self.title_color = theme.error.to_color();
        self.button_bg = theme.panel_inactive_border.to_color();
        self.button_fg = theme.fg_primary.to_color();
        self.button_selected_bg = theme.item_selected_bg.to_color();
        self.button_selected_fg = theme.item_selected.to_color();
        self
    }

    /// 다이얼로그 영역 계산 (화면 중앙)
    fn calculate_area(screen: Rect) -> Rect {
        let width = 50u16.min(screen.width.saturating_sub(4)).max(30);
        let height = 8u16;

        let width = width.min(screen.width);
        let height = height.min(screen.height);

        Rect {
            x: screen.x + screen.width.saturating_sub(width) / 2,
            y: screen.y + screen.height.saturating_sub(height) / 2,
            width,
            height,
        }
    }

    fn render_button(&self, buf: &mut Buffer, x: u16, y: u16, label: &str, is_selected: bool) -> u16 {
        let (bg, fg) = if is_selected {
            (self.button_selected_bg, self.button_selected_fg)
        } else {
            (self.button_bg, self.button_fg)
        };

        let padded_label = format!(" {} ", label);
        let width = padded_label.width() as u16;
        buf.set_string(x, y, &padded_label, Style::default().fg(fg).bg(bg));
        width
    }
}

impl Widget for Dialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = Self::calculate_area(area);
        if dialog_area.width < 4 || dialog_area.height < 4 {
            return;
        }

        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.kind.title()))
            .title_style(
                Style::default()
                    .fg(self.title_color)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .style(Style::default().bg(self.bg_color));
        block.render(dialog_area, buf);

        let msg_area = Rect {
            x: dialog_area.x + DIALOG_H_PADDING,
            y: dialog_area.y + DIALOG_V_PADDING,
            width: dialog_area.width.saturating_sub(DIALOG_H_PADDING * 2),
            height: dialog_area.height.saturating_sub(DIALOG_V_PADDING * 2 + 2),
        };
        Paragraph::new(self.kind.message())
            .style(Style::default().fg(self.fg_color))
            .wrap(Wrap { trim: true })
            .render(msg_area, buf);

        // 버튼 (하단 중앙)
        let [first, second] = self.kind.buttons();
        let buttons_width = (first.width() + second.width() + 6) as u16;
        let button_y = dialog_area.y + dialog_area.height - 2;
        let button_x = dialog_area.x + dialog_area.width.saturating_sub(buttons_width) / 2;
        let selected = self.kind.selected_button();

        let first_width = self.render_button(buf, button_x, button_y, first, selected == 0);
        self.render_button(buf, button_x + first_width + 2, button_y, second, selected == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_stop_defaults_to_stop_button() {
        let dialog = DialogKind::confirm_stop(3, "Archive.zip");
        assert_eq!(dialog.selected_button(), 0);
        assert!(dialog.message().contains("Archive.zip"));
        assert_eq!(dialog.buttons(), ["Stop", "Keep going"]);
    }

    #[test]
    fn test_toggle_button() {
        let mut dialog = DialogKind::confirm_quit(2);
        dialog.toggle_button();
        assert_eq!(dialog.selected_button(), 1);
        dialog.toggle_button();
        assert_eq!(dialog.selected_button(), 0);
    }

    #[test]
    fn test_quit_message_counts_jobs() {
        assert!(DialogKind::confirm_quit(1).message().starts_with("An archive"));
        assert!(DialogKind::confirm_quit(3).message().starts_with("3 archives"));
    }

    #[test]
    fn test_render_in_small_buffer() {
        let dialog = DialogKind::confirm_quit(1);
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        Dialog::new(&dialog).render(area, &mut buf);

        let text: String = (0..area.width)
            .filter_map(|x| buf.cell((x, 6)).map(|cell| cell.symbol().to_string()))
            .collect();
        assert!(text.contains("Quit"));
    }
}
