//! 작업 뷰 위젯
//!
//! 진행 중: "Creating archive: NAME", 경과 시간, pid, Stop 버튼
//! 종료 후: 결과 제목, 실패 사유, OK 버튼

use crate::models::{JobOutcome, JobPhase};
use crate::ui::Theme;
use crate::utils::formatter::{format_clock, format_elapsed};
use crate::utils::path_display::{display_dir, truncate_middle};
use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use std::path::Path;
use std::time::Duration;

pub struct CompressPanel<'a> {
    output_name: &'a str,
    working_dir: &'a Path,
    phase: &'a JobPhase,
    pid: Option<u32>,
    started: Option<DateTime<Local>>,
    elapsed: Duration,
    file_type: Option<&'a str>,
    focused: bool,
    bg_color: Color,
    fg_color: Color,
    dim_color: Color,
    active_border: Color,
    inactive_border: Color,
    button_fg: Color,
    button_bg: Color,
    success: Color,
    warning: Color,
    error: Color,
}

impl<'a> CompressPanel<'a> {
    pub fn new(output_name: &'a str, working_dir: &'a Path, phase: &'a JobPhase) -> Self {
        Self {
            output_name,
            working_dir,
            phase,
            pid: None,
            started: None,
            elapsed: Duration::ZERO,
            file_type: None,
            focused: false,
            bg_color: Color::Rgb(37, 37, 38),
            fg_color: Color::Rgb(212, 212, 212),
            dim_color: Color::Rgb(128, 128, 128),
            active_border: Color::Rgb(0, 120, 212),
            inactive_border: Color::Rgb(60, 60, 60),
            button_fg: Color::White,
            button_bg: Color::Rgb(0, 120, 212),
            success: Color::Rgb(78, 201, 176),
            warning: Color::Rgb(204, 167, 0),
            error: Color::Rgb(244, 71, 71),
        }
    }

    pub fn pid(mut self, pid: Option<u32>) -> Self {
        self.pid = pid;
        self
    }

    pub fn started(mut self, time: DateTime<Local>) -> Self {
        self.started = Some(time);
        self
    }

    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn file_type(mut self, mime: Option<&'a str>) -> Self {
        self.file_type = mime;
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
        self.button_fg = theme.item_selected.to_color();
        self.button_bg = theme.item_selected_bg.to_color();
        self.success = theme.success.to_color();
        self.warning = theme.warning.to_color();
        self.error = theme.error.to_color();
        self
    }

    /// (제목, 제목 색)
    fn headline(&self) -> (String, Color) {
        match self.phase {
            JobPhase::Starting | JobPhase::Running => {
                (format!("Creating archive: {}", self.output_name), self.fg_color)
            }
            JobPhase::StopPending => ("Waiting for confirmation...".to_string(), self.warning),
            JobPhase::Finished(outcome) => {
                let color = match outcome {
                    JobOutcome::Completed => self.success,
                    JobOutcome::Stopped => self.warning,
                    JobOutcome::Failed { .. } => self.error,
                };
                (outcome.title().to_string(), color)
            }
        }
    }

    fn detail_line(&self) -> String {
        let mut parts = Vec::new();
        if let Some(started) = self.started {
            parts.push(format!("started {}", format_clock(started)));
        }
        parts.push(format_elapsed(self.elapsed));
        match (self.phase, self.pid) {
            (JobPhase::Finished(_), _) => {
                if let Some(mime) = self.file_type {
                    parts.push(mime.to_string());
                }
            }
            (_, Some(pid)) => parts.push(format!("pid {}", pid)),
            (_, None) => parts.push("starting".to_string()),
        }
        parts.join(" · ")
    }

    fn button_label(&self) -> &'static str {
        if self.phase.is_active() {
            " Stop "
        } else {
            " OK "
        }
    }
}

impl Widget for CompressPanel<'_> {
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
            .title(format!(" {} ", self.output_name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(self.bg_color));
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        let (headline, headline_color) = self.headline();
        let mut lines = vec![
            Line::from(Span::styled(
                truncate_middle(&headline, width),
                Style::default()
                    .fg(headline_color)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("in {}", display_dir(self.working_dir, width.saturating_sub(3))),
                Style::default().fg(self.dim_color),
            )),
        ];

        let third = match self.phase {
            JobPhase::Finished(JobOutcome::Failed { reason }) => Span::styled(
                truncate_middle(reason, width),
                Style::default().fg(self.error),
            ),
            _ => Span::styled(self.detail_line(), Style::default().fg(self.dim_color)),
        };
        lines.push(Line::from(third));

        let button_style = if self.focused {
            Style::default()
                .fg(self.button_fg)
                .bg(self.button_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.fg_color)
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(self.button_label(), button_style)).right_aligned());

        Paragraph::new(lines).render(inner, buf);
    }
}
