//! 키 액션 → 이벤트 변환

use super::{App, ArchiverView};
use crate::core::actions::{Action, ActionScope};
use crate::core::events::AppEvent;
use tracing::debug;

impl App {
    /// 액션 실행. 뷰 전용 액션은 포커스된 뷰에만 적용된다.
    pub fn execute_action(&mut self, action: Action) {
        debug!(action = action.id(), label = action.label(), "execute action");
        if action.scope() != ActionScope::Global {
            self.execute_view_action(action);
            return;
        }
        match action {
            Action::Quit => self.dispatch(AppEvent::QuitRequested),
            Action::ToggleSettings => self.dispatch(AppEvent::ToggleSettings),
            Action::FocusNext => self.focus_next(),
            Action::MoveStackLeft => self.move_stack(-1, 0),
            Action::MoveStackRight => self.move_stack(1, 0),
            Action::MoveStackUp => self.move_stack(0, -1),
            Action::MoveStackDown => self.move_stack(0, 1),
            _ => {}
        }
    }

    fn execute_view_action(&mut self, action: Action) {
        let Some(view) = self.views.get(self.focus) else {
            return;
        };
        let event = match (view, action) {
            (ArchiverView::Settings(settings), Action::SelectPrev) => settings
                .step(false)
                .map(|index| AppEvent::RuleChanged { index }),
            (ArchiverView::Settings(settings), Action::SelectNext) => settings
                .step(true)
                .map(|index| AppEvent::RuleChanged { index }),
            (ArchiverView::Settings(_), Action::ToggleCloseOnFinish) => Some(
                AppEvent::CloseOnFinishChanged(!self.settings.close_on_finish),
            ),
            (ArchiverView::Settings(_), Action::Accept) => Some(AppEvent::Accept),
            (ArchiverView::Compress(compress), Action::StopJob) => Some(AppEvent::StopRequested {
                view: compress.job.id,
            }),
            // 끝난 작업 뷰에서 Enter는 OK 버튼
            (ArchiverView::Compress(compress), Action::Accept) if !compress.phase.is_active() => {
                Some(AppEvent::RemoveView {
                    view: compress.job.id,
                })
            }
            _ => None,
        };
        if let Some(event) = event {
            self.dispatch(event);
        }
    }

    fn focus_next(&mut self) {
        if !self.views.is_empty() {
            self.focus = (self.focus + 1) % self.views.len();
        }
    }

    /// 뷰 스택 위치 이동 (터미널 밖으로는 나가지 않음)
    fn move_stack(&mut self, dx: i32, dy: i32) {
        let (width, height) = self.layout.terminal_size();
        let position = &mut self.settings.window_position;
        position.x = (i32::from(position.x) + dx).clamp(0, i32::from(width.saturating_sub(1))) as u16;
        position.y = (i32::from(position.y) + dy).clamp(0, i32::from(height.saturating_sub(1))) as u16;
    }
}
