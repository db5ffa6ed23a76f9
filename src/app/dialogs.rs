//! 확인 다이얼로그 응답 처리

use super::App;
use crate::core::events::AppEvent;
use crate::ui::DialogKind;

impl App {
    /// 버튼 전환 (Tab / 화살표)
    pub fn dialog_toggle_button(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.toggle_button();
        }
    }

    /// Enter: 선택된 버튼으로 응답
    pub fn dialog_submit(&mut self) {
        if let Some(selected) = self.dialog.as_ref().map(DialogKind::selected_button) {
            self.answer_dialog(selected == 0);
        }
    }

    /// 다이얼로그 응답을 해당 이벤트로 전달
    pub fn answer_dialog(&mut self, confirmed: bool) {
        let event = match &self.dialog {
            Some(DialogKind::ConfirmStop { view, .. }) => AppEvent::StopConfirmed {
                view: *view,
                confirmed,
            },
            Some(DialogKind::ConfirmQuit { .. }) => AppEvent::QuitConfirmed(confirmed),
            None => return,
        };
        self.dispatch(event);
    }
}
