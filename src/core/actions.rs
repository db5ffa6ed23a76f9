//! 액션 시스템
//!
//! 키 바인딩과 커맨드바 항목이 모두 이 모듈의 테이블을 참조한다.

use crate::ui::components::command_bar::CommandItem;
use crossterm::event::{KeyCode, KeyModifiers};
use std::sync::LazyLock;

/// 모든 가능한 액션의 열거
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // 설정 뷰
    SelectPrev,
    SelectNext,
    ToggleCloseOnFinish,
    Accept,
    // 작업 뷰
    StopJob,
    // 공통
    FocusNext,
    ToggleSettings,
    MoveStackLeft,
    MoveStackRight,
    MoveStackUp,
    MoveStackDown,
    Quit,
}

/// 액션이 의미 있는 뷰
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionScope {
    Global,
    Settings,
    Compress,
}

/// 커맨드바 표시 정보
pub struct CommandBarEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub priority: u8,
}

/// 액션 정의 (메타데이터)
pub struct ActionDef {
    pub action: Action,
    pub id: &'static str,
    pub label: &'static str,
    pub scope: ActionScope,
    pub command_bar: Option<CommandBarEntry>,
}

/// 키 바인딩 정의
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: Option<KeyModifiers>, // None = any modifier
    pub action: Action,
}

pub static ACTION_DEFS: &[ActionDef] = &[
    ActionDef {
        action: Action::SelectPrev,
        id: "select_prev",
        label: "Previous rule",
        scope: ActionScope::Settings,
        command_bar: None,
    },
    ActionDef {
        action: Action::SelectNext,
        id: "select_next",
        label: "Next rule",
        scope: ActionScope::Settings,
        command_bar: Some(CommandBarEntry {
            key: "j/k",
            label: "Rule",
            priority: 10,
        }),
    },
    ActionDef {
        action: Action::ToggleCloseOnFinish,
        id: "toggle_close_on_finish",
        label: "Close after compression",
        scope: ActionScope::Settings,
        command_bar: Some(CommandBarEntry {
            key: "Space",
            label: "Auto close",
            priority: 20,
        }),
    },
    ActionDef {
        action: Action::Accept,
        id: "accept",
        label: "Accept",
        scope: ActionScope::Settings,
        command_bar: Some(CommandBarEntry {
            key: "Enter",
            label: "Accept",
            priority: 30,
        }),
    },
    ActionDef {
        action: Action::StopJob,
        id: "stop_job",
        label: "Stop / OK",
        scope: ActionScope::Compress,
        command_bar: Some(CommandBarEntry {
            key: "x",
            label: "Stop/OK",
            priority: 10,
        }),
    },
    ActionDef {
        action: Action::FocusNext,
        id: "focus_next",
        label: "Next view",
        scope: ActionScope::Global,
        command_bar: Some(CommandBarEntry {
            key: "Tab",
            label: "Next",
            priority: 50,
        }),
    },
    ActionDef {
        action: Action::ToggleSettings,
        id: "toggle_settings",
        label: "Show/hide settings",
        scope: ActionScope::Global,
        command_bar: Some(CommandBarEntry {
            key: "s",
            label: "Settings",
            priority: 60,
        }),
    },
    ActionDef {
        action: Action::MoveStackLeft,
        id: "move_left",
        label: "Move panels left",
        scope: ActionScope::Global,
        command_bar: None,
    },
    ActionDef {
        action: Action::MoveStackRight,
        id: "move_right",
        label: "Move panels right",
        scope: ActionScope::Global,
        command_bar: None,
    },
    ActionDef {
        action: Action::MoveStackUp,
        id: "move_up",
        label: "Move panels up",
        scope: ActionScope::Global,
        command_bar: None,
    },
    ActionDef {
        action: Action::MoveStackDown,
        id: "move_down",
        label: "Move panels down",
        scope: ActionScope::Global,
        command_bar: Some(CommandBarEntry {
            key: "S-←↓↑→",
            label: "Move",
            priority: 70,
        }),
    },
    ActionDef {
        action: Action::Quit,
        id: "quit",
        label: "Quit",
        scope: ActionScope::Global,
        command_bar: Some(CommandBarEntry {
            key: "q",
            label: "Quit",
            priority: 90,
        }),
    },
];

fn build_key_bindings() -> Vec<KeyBinding> {
    vec![
        // 종료
        KeyBinding {
            code: KeyCode::Char('q'),
            modifiers: Some(KeyModifiers::NONE),
            action: Action::Quit,
        },
        KeyBinding {
            code: KeyCode::Char('c'),
            modifiers: Some(KeyModifiers::CONTROL),
            action: Action::Quit,
        },
        KeyBinding {
            code: KeyCode::F(10),
            modifiers: None,
            action: Action::Quit,
        },
        // 패널 이동 (Shift + 화살표)
        KeyBinding {
            code: KeyCode::Left,
            modifiers: Some(KeyModifiers::SHIFT),
            action: Action::MoveStackLeft,
        },
        KeyBinding {
            code: KeyCode::Right,
            modifiers: Some(KeyModifiers::SHIFT),
            action: Action::MoveStackRight,
        },
        KeyBinding {
            code: KeyCode::Up,
            modifiers: Some(KeyModifiers::SHIFT),
            action: Action::MoveStackUp,
        },
        KeyBinding {
            code: KeyCode::Down,
            modifiers: Some(KeyModifiers::SHIFT),
            action: Action::MoveStackDown,
        },
        // 규칙 선택: Vim + 화살표
        KeyBinding {
            code: KeyCode::Char('k'),
            modifiers: Some(KeyModifiers::NONE),
            action: Action::SelectPrev,
        },
        KeyBinding {
            code: KeyCode::Up,
            modifiers: Some(KeyModifiers::NONE),
            action: Action::SelectPrev,
        },
        KeyBinding {
            code: KeyCode::Char('j'),
            modifiers: Some(KeyModifiers::NONE),
            action: Action::SelectNext,
        },
        KeyBinding {
            code: KeyCode::Down,
            modifiers: Some(KeyModifiers::NONE),
            action: Action::SelectNext,
        },
        KeyBinding {
            code: KeyCode::Char(' '),
            modifiers: None,
            action: Action::ToggleCloseOnFinish,
        },
        KeyBinding {
            code: KeyCode::Enter,
            modifiers: None,
            action: Action::Accept,
        },
        // 작업 뷰
        KeyBinding {
            code: KeyCode::Char('x'),
            modifiers: Some(KeyModifiers::NONE),
            action: Action::StopJob,
        },
        KeyBinding {
            code: KeyCode::Esc,
            modifiers: None,
            action: Action::StopJob,
        },
        // 공통
        KeyBinding {
            code: KeyCode::Tab,
            modifiers: None,
            action: Action::FocusNext,
        },
        KeyBinding {
            code: KeyCode::Char('s'),
            modifiers: Some(KeyModifiers::NONE),
            action: Action::ToggleSettings,
        },
    ]
}

static KEY_BINDINGS: LazyLock<Vec<KeyBinding>> = LazyLock::new(build_key_bindings);

/// 키 바인딩 목록 조회 (1회 초기화 후 재사용)
pub fn key_bindings() -> &'static [KeyBinding] {
    KEY_BINDINGS.as_slice()
}

/// 키 입력으로 액션 조회
pub fn find_action(modifiers: KeyModifiers, code: KeyCode) -> Option<Action> {
    key_bindings()
        .iter()
        .find(|binding| {
            binding.code == code
                && match binding.modifiers {
                    None => true,
                    Some(required) => modifiers == required,
                }
        })
        .map(|binding| binding.action)
}

impl Action {
    fn def(self) -> Option<&'static ActionDef> {
        ACTION_DEFS.iter().find(|d| d.action == self)
    }

    /// 로그용 식별자
    pub fn id(self) -> &'static str {
        self.def().map(|d| d.id).unwrap_or("unknown")
    }

    pub fn label(self) -> &'static str {
        self.def().map(|d| d.label).unwrap_or("")
    }

    pub fn scope(self) -> ActionScope {
        self.def().map(|d| d.scope).unwrap_or(ActionScope::Global)
    }
}

/// 포커스된 뷰 기준 커맨드바 항목 (뷰 전용 항목 먼저, priority 순)
pub fn generate_command_bar_items(focused: Option<ActionScope>) -> Vec<CommandItem> {
    let mut entries: Vec<(u8, &CommandBarEntry)> = ACTION_DEFS
        .iter()
        .filter(|def| def.scope == ActionScope::Global || Some(def.scope) == focused)
        .filter_map(|def| {
            def.command_bar.as_ref().map(|cb| {
                let group = if def.scope == ActionScope::Global { 1 } else { 0 };
                (group, cb)
            })
        })
        .collect();

    entries.sort_by_key(|(group, cb)| (*group, cb.priority));

    entries
        .into_iter()
        .map(|(_, cb)| CommandItem::new(cb.key, cb.label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_ids() {
        assert_eq!(Action::Accept.id(), "accept");
        assert_eq!(Action::Quit.id(), "quit");
        assert_eq!(Action::MoveStackDown.id(), "move_down");
        assert_eq!(Action::StopJob.label(), "Stop / OK");
    }

    #[test]
    fn test_find_action_keys() {
        assert_eq!(
            find_action(KeyModifiers::NONE, KeyCode::Char('j')),
            Some(Action::SelectNext)
        );
        assert_eq!(
            find_action(KeyModifiers::NONE, KeyCode::Up),
            Some(Action::SelectPrev)
        );
        assert_eq!(
            find_action(KeyModifiers::SHIFT, KeyCode::Up),
            Some(Action::MoveStackUp)
        );
        assert_eq!(
            find_action(KeyModifiers::CONTROL, KeyCode::Char('c')),
            Some(Action::Quit)
        );
        assert_eq!(find_action(KeyModifiers::CONTROL, KeyCode::Char('j')), None);
    }

    #[test]
    fn test_find_action_any_modifier() {
        assert_eq!(
            find_action(KeyModifiers::SHIFT, KeyCode::Enter),
            Some(Action::Accept)
        );
        assert_eq!(
            find_action(KeyModifiers::NONE, KeyCode::Tab),
            Some(Action::FocusNext)
        );
    }

    #[test]
    fn test_action_scope() {
        assert_eq!(Action::StopJob.scope(), ActionScope::Compress);
        assert_eq!(Action::Accept.scope(), ActionScope::Settings);
        assert_eq!(Action::Quit.scope(), ActionScope::Global);
    }

    #[test]
    fn test_command_bar_for_compress_view() {
        let items = generate_command_bar_items(Some(ActionScope::Compress));
        assert_eq!(items[0].key, "x");
        assert!(!items.iter().any(|item| item.label == "Accept"));
        assert_eq!(items.last().map(|item| item.label.as_str()), Some("Quit"));
    }

    #[test]
    fn test_command_bar_without_focus_has_only_global() {
        let items = generate_command_bar_items(None);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].label, "Next");
    }
}
