use crate::core::events::{AppEvent, ViewId};
use crate::models::{CompressionRule, JobId, Settings};
use crate::system::{ProcessRunner, RulesStore, SettingsStore};
use crate::ui::{DialogKind, LayoutManager, ThemeManager};
use crate::utils::error::{ArchiverError, Result};
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::info;

mod controllers;
mod dialogs;
mod dispatch;
pub mod views;

pub use views::{ArchiverView, CompressView, SettingsView, SETTINGS_VIEW_ID};

/// 앱 상태
///
/// 모든 상태 변경은 UI 스레드에서 `dispatch`를 거친다.
/// 감시 스레드는 `event_tx` 복제본으로 알림만 보낸다.
pub struct App {
    should_quit: bool,
    pub layout: LayoutManager,
    pub theme_manager: ThemeManager,
    rules: Vec<CompressionRule>,
    settings: Settings,
    settings_store: SettingsStore,
    runner: ProcessRunner,
    /// 위에서 아래로 쌓인 뷰
    views: Vec<ArchiverView>,
    /// 포커스된 뷰 인덱스
    focus: usize,
    pub dialog: Option<DialogKind>,
    next_job_id: JobId,
    event_tx: Sender<AppEvent>,
    event_rx: Receiver<AppEvent>,
    /// 상태바에 표시할 최근 알림
    notice: Option<String>,
}

impl App {
    pub fn new(rules_store: &RulesStore, settings_store: SettingsStore, runner: ProcessRunner) -> Self {
        let rules = rules_store.load();
        let settings = settings_store.load();
        info!(
            rules = rules.len(),
            rules_path = %rules_store.path().display(),
            settings_path = %settings_store.path().display(),
            "archiver ready"
        );
        Self::with_state(rules, settings, settings_store, runner)
    }

    fn with_state(
        rules: Vec<CompressionRule>,
        settings: Settings,
        settings_store: SettingsStore,
        runner: ProcessRunner,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        Self {
            should_quit: false,
            layout: LayoutManager::new(),
            theme_manager: ThemeManager::new(),
            rules,
            settings,
            settings_store,
            runner,
            views: Vec::new(),
            focus: 0,
            dialog: None,
            next_job_id: SETTINGS_VIEW_ID + 1,
            event_tx,
            event_rx,
            notice: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(rules: Vec<CompressionRule>) -> Self {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static TEST_APP_COUNTER: AtomicUsize = AtomicUsize::new(0);
        let suffix = TEST_APP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let settings_path = std::env::temp_dir().join(format!(
            "archiver-test-settings-{}-{}.toml",
            std::process::id(),
            suffix
        ));

        Self::with_state(
            rules,
            Settings::default(),
            SettingsStore::new(settings_path),
            ProcessRunner::new(),
        )
    }

    /// 이번 실행에 쓸 규칙 지정 (`--rule`)
    pub fn use_rule(&mut self, index: usize) -> Result<()> {
        let rule = self.rules.get(index).ok_or(ArchiverError::RuleNotFound {
            index,
            available: self.rules.len(),
        })?;
        self.settings.apply_rule(rule);
        Ok(())
    }

    /// 종료 상태 확인
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn rules(&self) -> &[CompressionRule] {
        &self.rules
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[cfg(test)]
    pub fn settings_path(&self) -> &std::path::Path {
        self.settings_store.path()
    }

    pub fn views(&self) -> &[ArchiverView] {
        &self.views
    }

    pub fn focus_index(&self) -> usize {
        self.focus
    }

    pub fn focused_view(&self) -> Option<&ArchiverView> {
        self.views.get(self.focus)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_dialog_active(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn settings_view(&self) -> Option<&SettingsView> {
        self.views.iter().find_map(|view| match view {
            ArchiverView::Settings(settings) => Some(settings),
            ArchiverView::Compress(_) => None,
        })
    }

    fn settings_view_mut(&mut self) -> Option<&mut SettingsView> {
        self.views.iter_mut().find_map(|view| match view {
            ArchiverView::Settings(settings) => Some(settings),
            ArchiverView::Compress(_) => None,
        })
    }

    #[cfg(test)]
    pub fn compress_view(&self, id: ViewId) -> Option<&CompressView> {
        self.views.iter().find_map(|view| match view {
            ArchiverView::Compress(compress) if compress.job.id == id => Some(compress),
            _ => None,
        })
    }

    fn compress_view_mut(&mut self, id: ViewId) -> Option<&mut CompressView> {
        self.views.iter_mut().find_map(|view| match view {
            ArchiverView::Compress(compress) if compress.job.id == id => Some(compress),
            _ => None,
        })
    }

    fn has_compress_views(&self) -> bool {
        self.views
            .iter()
            .any(|view| matches!(view, ArchiverView::Compress(_)))
    }

    /// 실행 중인 작업 수
    pub fn running_count(&self) -> usize {
        self.views.iter().filter(|view| view.is_active_job()).count()
    }

    /// 끝났지만 아직 화면에 남은 작업 수
    pub fn finished_count(&self) -> usize {
        self.views
            .iter()
            .filter(|view| matches!(view, ArchiverView::Compress(_)) && !view.is_active_job())
            .count()
    }

    /// 감시 스레드 알림 처리. 처리한 이벤트 수 반환.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    fn report(&mut self, message: String) {
        self.notice = Some(message);
    }

    /// 뷰 목록 정리: 포커스 보정, 남은 뷰가 없으면 종료
    fn reorganize(&mut self) {
        if self.views.is_empty() {
            self.quit();
            return;
        }
        if self.focus >= self.views.len() {
            self.focus = self.views.len() - 1;
        }
    }

    /// 종료: 남은 작업을 정리하고 설정 저장
    pub fn quit(&mut self) {
        for view in self.views.drain(..) {
            view.teardown();
        }
        self.focus = 0;
        self.dialog = None;
        self.settings_store.save(&self.settings);
        self.should_quit = true;
        info!("archiver quitting");
    }
}

#[cfg(test)]
mod tests;
