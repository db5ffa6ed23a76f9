//! 뷰 스택 항목
//!
//! 창 하나에 설정 뷰(최대 1개)와 작업 뷰(작업당 1개)가 위아래로 쌓인다.

use crate::core::actions::ActionScope;
use crate::core::events::ViewId;
use crate::models::{CompressionJob, CompressionRule, JobOutcome, JobPhase, Settings};
use crate::system::process::ProcessHandle;
use crate::system::rules::selectable_indices;
use chrono::{DateTime, Local};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use unicode_width::UnicodeWidthStr;

/// 설정 뷰 id (작업 id는 1부터)
pub const SETTINGS_VIEW_ID: ViewId = 0;

const MIN_VIEW_WIDTH: u16 = 44;
const COMPRESS_VIEW_HEIGHT: u16 = 7;

#[derive(Debug)]
pub enum ArchiverView {
    Settings(SettingsView),
    Compress(CompressView),
}

impl ArchiverView {
    pub fn id(&self) -> ViewId {
        match self {
            ArchiverView::Settings(_) => SETTINGS_VIEW_ID,
            ArchiverView::Compress(view) => view.job.id,
        }
    }

    pub fn scope(&self) -> ActionScope {
        match self {
            ArchiverView::Settings(_) => ActionScope::Settings,
            ArchiverView::Compress(_) => ActionScope::Compress,
        }
    }

    /// 실행 중인 작업 뷰인지
    pub fn is_active_job(&self) -> bool {
        matches!(self, ArchiverView::Compress(view) if view.phase.is_active())
    }

    /// (선호 폭, 높이)
    pub fn preferred_size(&self, rules: &[CompressionRule]) -> (u16, u16) {
        match self {
            ArchiverView::Settings(view) => view.preferred_size(rules),
            ArchiverView::Compress(view) => view.preferred_size(),
        }
    }

    /// 스택에서 빠질 때의 정리
    pub fn teardown(self) {
        match self {
            ArchiverView::Settings(_) => {}
            ArchiverView::Compress(view) => view.teardown(),
        }
    }
}

/// 규칙 선택 뷰
#[derive(Debug, Clone)]
pub struct SettingsView {
    /// 도구가 설치된 규칙의 인덱스 (규칙 목록 기준)
    selectable: Vec<usize>,
    /// `selectable` 안의 커서
    cursor: Option<usize>,
    /// 변경 사항이 있어 Accept 가능
    pub apply_enabled: bool,
}

impl SettingsView {
    /// 설정에 저장된 규칙(설명 + 변형 일치)을 미리 선택
    pub fn new(rules: &[CompressionRule], settings: &Settings) -> Self {
        let selectable = selectable_indices(rules);
        let cursor = selectable
            .iter()
            .position(|&index| settings.matches_rule(&rules[index]))
            .or(if selectable.is_empty() { None } else { Some(0) });
        Self {
            selectable,
            cursor,
            apply_enabled: false,
        }
    }

    pub fn selectable(&self) -> &[usize] {
        &self.selectable
    }

    /// 선택된 규칙 인덱스 (규칙 목록 기준)
    pub fn selected_rule(&self) -> Option<usize> {
        self.cursor.map(|pos| self.selectable[pos])
    }

    /// 커서 이동 후 새로 선택된 규칙 인덱스. 움직이지 않았으면 None.
    pub fn step(&self, forward: bool) -> Option<usize> {
        let pos = self.cursor?;
        let next = if forward {
            (pos + 1).min(self.selectable.len().saturating_sub(1))
        } else {
            pos.saturating_sub(1)
        };
        (next != pos).then(|| self.selectable[next])
    }

    /// 규칙 선택. 선택할 수 없는 규칙이면 `false`.
    pub fn select_rule(&mut self, index: usize) -> bool {
        match self.selectable.iter().position(|&i| i == index) {
            Some(pos) => {
                if self.cursor != Some(pos) {
                    self.cursor = Some(pos);
                    self.apply_enabled = true;
                }
                true
            }
            None => false,
        }
    }

    fn preferred_size(&self, rules: &[CompressionRule]) -> (u16, u16) {
        let widest = self
            .selectable
            .iter()
            .map(|&index| rules[index].label().width())
            .max()
            .unwrap_or(0);
        let width = (widest as u16).saturating_add(10).max(MIN_VIEW_WIDTH);
        let rows = self.selectable.len().max(1) as u16;
        // 테두리 2 + 규칙 + 빈 줄 + 체크박스 + 버튼
        (width, rows.saturating_add(5))
    }
}

/// 작업 하나의 진행 뷰
#[derive(Debug)]
pub struct CompressView {
    pub job: CompressionJob,
    handle: Option<ProcessHandle>,
    pub pid: Option<u32>,
    pub phase: JobPhase,
    pub started_at: Instant,
    pub started_clock: DateTime<Local>,
    finished_after: Option<Duration>,
    pub file_type: Option<&'static str>,
}

impl CompressView {
    pub fn new(job: CompressionJob, handle: ProcessHandle) -> Self {
        Self {
            job,
            handle: Some(handle),
            pid: None,
            phase: JobPhase::Starting,
            started_at: Instant::now(),
            started_clock: Local::now(),
            finished_after: None,
            file_type: None,
        }
    }

    pub fn handle(&self) -> Option<&ProcessHandle> {
        self.handle.as_ref()
    }

    /// 경과 시간 (종료 후에는 고정)
    pub fn elapsed(&self) -> Duration {
        self.finished_after
            .unwrap_or_else(|| self.started_at.elapsed())
    }

    pub fn mark_started(&mut self, pid: u32) {
        self.pid = Some(pid);
        if self.phase == JobPhase::Starting {
            self.phase = JobPhase::Running;
        }
    }

    pub fn mark_finished(&mut self, outcome: JobOutcome, file_type: Option<&'static str>) {
        self.finished_after = Some(self.started_at.elapsed());
        self.file_type = file_type;
        self.phase = JobPhase::Finished(outcome);
    }

    fn preferred_size(&self) -> (u16, u16) {
        let name_width = self.job.output_name().width() as u16;
        (
            name_width.saturating_add(22).max(MIN_VIEW_WIDTH),
            COMPRESS_VIEW_HEIGHT,
        )
    }

    /// 실행 중이면 도구를 멈추고 미완성 결과 파일을 지운다.
    fn teardown(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.cancel() {
                info!(job = self.job.id, "view closed while compressing");
                remove_partial_output(&self.job.output_path);
            }
        }
    }
}

/// 미완성 압축 파일 삭제 (best-effort)
pub fn remove_partial_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => info!(path = %path.display(), "partial archive removed"),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!(path = %path.display(), error = %err, "could not remove partial archive"),
    }
}
