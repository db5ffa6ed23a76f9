//! 이벤트 디스패처

use super::views::remove_partial_output;
use super::{App, ArchiverView, CompressView, SettingsView, SETTINGS_VIEW_ID};
use crate::core::events::{AppEvent, ViewId};
use crate::models::{JobOutcome, JobPhase};
use crate::system::namer::plan_job;
use crate::system::process::StopResult;
use crate::ui::DialogKind;
use std::path::PathBuf;
use tracing::{debug, info, warn};

impl App {
    pub fn dispatch(&mut self, event: AppEvent) {
        debug!(?event, "dispatch");
        match event {
            AppEvent::ThreadStarted { view, pid } => self.on_thread_started(view, pid),
            AppEvent::JobCompleted {
                view,
                outcome,
                file_type,
            } => self.on_job_completed(view, outcome, file_type),
            AppEvent::StopRequested { view } => self.on_stop_requested(view),
            AppEvent::StopConfirmed { view, confirmed } => self.on_stop_confirmed(view, confirmed),
            AppEvent::RuleChanged { index } => self.on_rule_changed(index),
            AppEvent::CloseOnFinishChanged(value) => self.on_close_on_finish_changed(value),
            AppEvent::Accept => self.on_accept(),
            AppEvent::RemoveView { view } => self.remove_view(view),
            AppEvent::FilesReceived { sources, dir } => self.on_files_received(sources, dir),
            AppEvent::ToggleSettings => self.toggle_settings(),
            AppEvent::QuitRequested => self.on_quit_requested(),
            AppEvent::QuitConfirmed(confirmed) => self.on_quit_confirmed(confirmed),
        }
    }

    fn on_files_received(&mut self, sources: Vec<PathBuf>, dir: Option<PathBuf>) {
        let id = self.next_job_id;
        self.next_job_id += 1;

        let planned = plan_job(
            id,
            sources,
            dir,
            self.settings.active_rule(),
            Some(self.settings.priority),
        );
        let job = match planned {
            Ok(job) => job,
            Err(err) => {
                warn!(error = %err, "compression request rejected");
                self.report(format!("Cannot compress: {}", err));
                self.ensure_some_view();
                return;
            }
        };

        match self.runner.start(&job, self.event_tx.clone()) {
            Ok(handle) => {
                self.views
                    .push(ArchiverView::Compress(CompressView::new(job, handle)));
                self.focus = self.views.len() - 1;
            }
            Err(err) => {
                warn!(job = id, error = %err, "compression not started");
                self.report(format!("Cannot compress: {}", err));
                self.ensure_some_view();
            }
        }
    }

    fn on_thread_started(&mut self, id: ViewId, pid: u32) {
        match self.compress_view_mut(id) {
            Some(view) => view.mark_started(pid),
            None => debug!(view = id, "pid for a closed view"),
        }
    }

    fn on_job_completed(
        &mut self,
        id: ViewId,
        outcome: JobOutcome,
        file_type: Option<&'static str>,
    ) {
        // 확인 다이얼로그보다 완료가 먼저 오면 다이얼로그를 닫는다
        if matches!(&self.dialog, Some(DialogKind::ConfirmStop { view, .. }) if *view == id) {
            self.dialog = None;
        }

        let close_on_finish = self.settings.close_on_finish;
        let Some(view) = self.compress_view_mut(id) else {
            debug!(view = id, "completion for a closed view");
            return;
        };
        let output_name = view.job.output_name();
        view.mark_finished(outcome.clone(), file_type);

        let auto_close = match &outcome {
            JobOutcome::Completed => close_on_finish,
            JobOutcome::Stopped => true,
            JobOutcome::Failed { reason } => {
                self.report(format!("{}: {}", output_name, reason));
                false
            }
        };
        if auto_close {
            self.remove_view(id);
        }
    }

    /// Stop/OK 버튼: 실행 중이면 확인을 묻고, 끝났으면 뷰를 닫는다.
    fn on_stop_requested(&mut self, id: ViewId) {
        let Some(view) = self.compress_view_mut(id) else {
            return;
        };
        if !view.phase.is_active() {
            self.remove_view(id);
            return;
        }
        if view.phase == JobPhase::StopPending {
            return;
        }
        view.phase = JobPhase::StopPending;
        let output_name = view.job.output_name();
        self.dialog = Some(DialogKind::confirm_stop(id, output_name));
    }

    fn on_stop_confirmed(&mut self, id: ViewId, confirmed: bool) {
        if matches!(&self.dialog, Some(DialogKind::ConfirmStop { view, .. }) if *view == id) {
            self.dialog = None;
        }

        let Some(view) = self.compress_view_mut(id) else {
            return;
        };
        // 그 사이 작업이 끝났으면 결과 화면 유지
        if view.phase != JobPhase::StopPending {
            return;
        }
        if !confirmed {
            view.phase = if view.pid.is_some() {
                JobPhase::Running
            } else {
                JobPhase::Starting
            };
            return;
        }

        let result = view.handle().map(|handle| handle.stop());
        match result {
            Some(Ok(StopResult::Signalled)) => {
                info!(job = id, "compression stopped by user");
                remove_partial_output(&view.job.output_path);
            }
            Some(Ok(StopResult::AlreadyFinished)) | None => {}
            Some(Err(err)) => {
                warn!(job = id, error = %err, "stop failed");
                view.phase = JobPhase::Running;
                self.report(format!("Cannot stop: {}", err));
                return;
            }
        }
        self.remove_view(id);
    }

    fn on_rule_changed(&mut self, index: usize) {
        if let Some(view) = self.settings_view_mut() {
            if !view.select_rule(index) {
                debug!(index, "rule is not selectable");
            }
        }
    }

    fn on_close_on_finish_changed(&mut self, value: bool) {
        self.settings.close_on_finish = value;
        if let Some(view) = self.settings_view_mut() {
            view.apply_enabled = true;
        }
    }

    /// 선택한 규칙을 설정에 반영하고 저장
    fn on_accept(&mut self) {
        let Some(view) = self.settings_view() else {
            return;
        };
        if !view.apply_enabled {
            return;
        }
        if let Some(index) = view.selected_rule() {
            self.settings.apply_rule(&self.rules[index]);
        }
        self.settings_store.save(&self.settings);
        info!(rule = %self.settings.active_rule().label(), "settings accepted");

        if self.has_compress_views() {
            if let Some(view) = self.settings_view_mut() {
                view.apply_enabled = false;
            }
        } else {
            self.remove_view(SETTINGS_VIEW_ID);
        }
    }

    fn toggle_settings(&mut self) {
        if self.settings_view().is_some() {
            self.remove_view(SETTINGS_VIEW_ID);
        } else {
            self.show_settings();
        }
    }

    fn show_settings(&mut self) {
        let view = SettingsView::new(&self.rules, &self.settings);
        self.views.insert(0, ArchiverView::Settings(view));
        self.focus = 0;
    }

    /// 보여줄 뷰가 하나도 없으면 설정 뷰를 연다 (알림을 볼 수 있도록)
    fn ensure_some_view(&mut self) {
        if self.views.is_empty() {
            self.show_settings();
        }
    }

    fn remove_view(&mut self, id: ViewId) {
        let Some(pos) = self.views.iter().position(|view| view.id() == id) else {
            return;
        };
        self.views.remove(pos).teardown();
        if self.focus > pos {
            self.focus -= 1;
        }
        self.reorganize();
    }

    fn on_quit_requested(&mut self) {
        let running = self.running_count();
        if running > 0 {
            self.dialog = Some(DialogKind::confirm_quit(running));
        } else {
            self.quit();
        }
    }

    fn on_quit_confirmed(&mut self, confirmed: bool) {
        if matches!(self.dialog, Some(DialogKind::ConfirmQuit { .. })) {
            self.dialog = None;
        }
        if confirmed {
            self.quit();
        }
    }
}
