use super::*;
use crate::core::actions::Action;
use crate::models::{JobOutcome, JobPhase, WindowPosition};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn sh_rule(description: &str, script: &str) -> CompressionRule {
    CompressionRule {
        description: description.to_string(),
        variant: "test".to_string(),
        mime_type: "application/x-test".to_string(),
        extension: ".out".to_string(),
        executable: PathBuf::from("/bin/sh"),
        // sh -c SCRIPT FILENAME sources... → $0 = 결과 파일, $@ = 원본
        arguments: vec!["-c".into(), script.into(), "FILENAME".into()],
    }
}

fn missing_tool_rule() -> CompressionRule {
    CompressionRule {
        description: "Missing".to_string(),
        variant: String::new(),
        mime_type: "application/x-missing".to_string(),
        extension: ".miss".to_string(),
        executable: PathBuf::from("/nonexistent/archiver-tool"),
        arguments: vec!["FILENAME".into()],
    }
}

/// 규칙 하나짜리 앱 (설정도 그 규칙으로 맞춤)
fn make_test_app(rule: CompressionRule, close_on_finish: bool) -> App {
    let mut app = App::new_for_test(vec![rule.clone()]);
    app.settings.apply_rule(&rule);
    app.settings.close_on_finish = close_on_finish;
    app
}

fn make_sources(dir: &std::path::Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            fs::write(&path, format!("{}\n", name)).unwrap();
            path
        })
        .collect()
}

fn send_files(app: &mut App, sources: Vec<PathBuf>) -> ViewId {
    app.dispatch(AppEvent::FilesReceived { sources, dir: None });
    match app.views().last() {
        Some(ArchiverView::Compress(view)) => view.job.id,
        _ => panic!("compress view expected"),
    }
}

fn pump_until(app: &mut App, condition: impl Fn(&App) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !condition(app) {
        assert!(Instant::now() < deadline, "event pump timed out");
        app.pump_events();
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn phase_of(app: &App, id: ViewId) -> Option<JobPhase> {
    app.compress_view(id).map(|view| view.phase.clone())
}

#[cfg(unix)]
#[test]
fn test_completed_job_closes_view_and_quits() {
    let temp = TempDir::new().unwrap();
    let sources = make_sources(temp.path(), &["a.txt", "b.txt"]);
    let mut app = make_test_app(sh_rule("Concat", "cat \"$@\" > \"$0\""), true);

    let id = send_files(&mut app, sources);
    let output = app.compress_view(id).unwrap().job.output_path.clone();
    assert_eq!(output, temp.path().join("Archive.out"));

    pump_until(&mut app, |app| app.should_quit());

    assert!(app.views().is_empty());
    assert_eq!(fs::read_to_string(&output).unwrap(), "a.txt\nb.txt\n");
    // 종료 시 설정 저장
    assert!(app.settings_path().is_file());
    let _ = fs::remove_file(app.settings_path());
}

#[cfg(unix)]
#[test]
fn test_finished_view_stays_until_ok() {
    let temp = TempDir::new().unwrap();
    let sources = make_sources(temp.path(), &["only.txt"]);
    let mut app = make_test_app(sh_rule("Copy", "cat \"$@\" > \"$0\""), false);

    let id = send_files(&mut app, sources);
    pump_until(&mut app, |app| {
        matches!(phase_of(app, id), Some(JobPhase::Finished(_)))
    });

    let view = app.compress_view(id).unwrap();
    assert_eq!(view.phase, JobPhase::Finished(JobOutcome::Completed));
    assert!(view.pid.is_some());
    assert_eq!(view.job.output_name(), "only.txt.out");
    assert!(!app.should_quit());

    // Stop 버튼은 이제 OK
    app.execute_action(Action::StopJob);
    assert!(app.dialog.is_none());
    assert!(app.should_quit());
    assert!(temp.path().join("only.txt.out").is_file());
}

#[cfg(unix)]
#[test]
fn test_stop_flow_asks_and_removes_partial_output() {
    let temp = TempDir::new().unwrap();
    let sources = make_sources(temp.path(), &["big.iso"]);
    let mut app = make_test_app(sh_rule("Slow", ": > \"$0\"; exec sleep 30"), true);
    app.dispatch(AppEvent::ToggleSettings);

    let id = send_files(&mut app, sources);
    let output = app.compress_view(id).unwrap().job.output_path.clone();
    pump_until(&mut app, |app| {
        phase_of(app, id) == Some(JobPhase::Running) && output.exists()
    });

    // 취소하면 계속 실행
    app.dispatch(AppEvent::StopRequested { view: id });
    assert_eq!(phase_of(&app, id), Some(JobPhase::StopPending));
    assert!(matches!(app.dialog, Some(DialogKind::ConfirmStop { view, .. }) if view == id));
    app.answer_dialog(false);
    assert!(app.dialog.is_none());
    assert_eq!(phase_of(&app, id), Some(JobPhase::Running));

    // 확인하면 중지하고 뷰 제거
    app.dispatch(AppEvent::StopRequested { view: id });
    app.dispatch(AppEvent::StopConfirmed {
        view: id,
        confirmed: true,
    });
    assert!(app.compress_view(id).is_none());
    assert!(!output.exists());
    // 설정 뷰가 남아 있으므로 종료하지 않음
    assert!(!app.should_quit());

    // 늦게 도착한 알림은 무시된다
    std::thread::sleep(Duration::from_millis(200));
    app.pump_events();
    assert_eq!(app.views().len(), 1);
}

#[cfg(unix)]
#[test]
fn test_completion_closes_pending_stop_dialog() {
    let temp = TempDir::new().unwrap();
    let sources = make_sources(temp.path(), &["x.txt"]);
    let mut app = make_test_app(sh_rule("Short", "sleep 1; cat \"$@\" > \"$0\""), false);

    let id = send_files(&mut app, sources);
    app.dispatch(AppEvent::StopRequested { view: id });
    assert!(app.is_dialog_active());

    pump_until(&mut app, |app| {
        matches!(phase_of(app, id), Some(JobPhase::Finished(_)))
    });

    assert!(app.dialog.is_none());
    assert_eq!(
        phase_of(&app, id),
        Some(JobPhase::Finished(JobOutcome::Completed))
    );

    // 다이얼로그가 닫힌 뒤의 확인 응답은 무시
    app.dispatch(AppEvent::StopConfirmed {
        view: id,
        confirmed: true,
    });
    assert!(app.compress_view(id).is_some());
}

#[cfg(unix)]
#[test]
fn test_failed_job_keeps_view_with_reason() {
    let temp = TempDir::new().unwrap();
    let sources = make_sources(temp.path(), &["a.txt"]);
    let mut app = make_test_app(sh_rule("Broken", "exit 9"), true);

    let id = send_files(&mut app, sources);
    pump_until(&mut app, |app| {
        matches!(phase_of(app, id), Some(JobPhase::Finished(_)))
    });

    assert_eq!(
        phase_of(&app, id),
        Some(JobPhase::Finished(JobOutcome::Failed {
            reason: "tool exited with code 9".into()
        }))
    );
    assert!(app.notice().unwrap().contains("code 9"));
    assert!(!app.should_quit());
}

#[test]
fn test_spawn_failure_is_reported_as_failed() {
    let temp = TempDir::new().unwrap();
    let sources = make_sources(temp.path(), &["a.txt"]);
    let mut app = make_test_app(missing_tool_rule(), true);

    let id = send_files(&mut app, sources);
    pump_until(&mut app, |app| {
        matches!(phase_of(app, id), Some(JobPhase::Finished(_)))
    });

    match phase_of(&app, id) {
        Some(JobPhase::Finished(JobOutcome::Failed { reason })) => {
            assert!(reason.contains("archiver-tool"));
        }
        other => panic!("Expected failed job, got {:?}", other),
    }
    assert!(app.compress_view(id).unwrap().pid.is_none());
}

#[test]
fn test_empty_request_shows_settings_with_notice() {
    let mut app = make_test_app(missing_tool_rule(), true);

    app.dispatch(AppEvent::FilesReceived {
        sources: Vec::new(),
        dir: None,
    });

    assert!(app.settings_view().is_some());
    assert!(app.notice().unwrap().contains("Nothing to compress"));
    assert!(!app.should_quit());
}

#[cfg(unix)]
#[test]
fn test_quit_with_running_job_asks_first() {
    let temp = TempDir::new().unwrap();
    let sources = make_sources(temp.path(), &["a.txt"]);
    let mut app = make_test_app(sh_rule("Slow", ": > \"$0\"; exec sleep 30"), true);

    let id = send_files(&mut app, sources);
    let output = app.compress_view(id).unwrap().job.output_path.clone();
    pump_until(&mut app, |app| {
        phase_of(app, id) == Some(JobPhase::Running) && output.exists()
    });

    app.execute_action(Action::Quit);
    assert!(matches!(
        app.dialog,
        Some(DialogKind::ConfirmQuit { running: 1, .. })
    ));
    app.answer_dialog(false);
    assert!(!app.should_quit());
    assert_eq!(phase_of(&app, id), Some(JobPhase::Running));

    app.execute_action(Action::Quit);
    app.dialog_submit();
    assert!(app.should_quit());
    assert!(app.views().is_empty());
    assert!(!output.exists());
    let _ = fs::remove_file(app.settings_path());
}

#[test]
fn test_quit_without_jobs_is_immediate() {
    let mut app = make_test_app(missing_tool_rule(), true);
    app.dispatch(AppEvent::ToggleSettings);

    app.execute_action(Action::Quit);

    assert!(app.dialog.is_none());
    assert!(app.should_quit());
    let _ = fs::remove_file(app.settings_path());
}

#[cfg(unix)]
#[test]
fn test_settings_view_lists_installed_tools_and_preselects() {
    let rules = vec![
        missing_tool_rule(),
        sh_rule("First", "true"),
        sh_rule("Second", "true"),
    ];
    let mut app = App::new_for_test(rules.clone());
    app.settings.apply_rule(&rules[2]);

    app.dispatch(AppEvent::ToggleSettings);

    let view = app.settings_view().unwrap();
    assert_eq!(view.selectable(), &[1, 2]);
    assert_eq!(view.selected_rule(), Some(2));
    assert!(!view.apply_enabled);
}

#[cfg(unix)]
#[test]
fn test_accept_saves_rule_and_closes_when_idle() {
    let rules = vec![sh_rule("First", "true"), sh_rule("Second", "true")];
    let mut app = App::new_for_test(rules.clone());
    app.settings.apply_rule(&rules[0]);
    app.dispatch(AppEvent::ToggleSettings);

    // 변경 전에는 Accept 불가
    app.execute_action(Action::Accept);
    assert!(app.settings_view().is_some());

    app.execute_action(Action::SelectNext);
    assert_eq!(app.settings_view().unwrap().selected_rule(), Some(1));
    assert!(app.settings_view().unwrap().apply_enabled);

    app.execute_action(Action::Accept);

    assert!(app.settings().matches_rule(&rules[1]));
    assert!(app.should_quit());
    let saved = SettingsStore::new(app.settings_path().to_path_buf()).load();
    assert!(saved.matches_rule(&rules[1]));
    let _ = fs::remove_file(app.settings_path());
}

#[cfg(unix)]
#[test]
fn test_accept_with_running_job_keeps_settings_open() {
    let temp = TempDir::new().unwrap();
    let sources = make_sources(temp.path(), &["a.txt"]);
    let rules = vec![
        sh_rule("Slow", "exec sleep 30"),
        sh_rule("Other", "true"),
    ];
    let mut app = App::new_for_test(rules.clone());
    app.settings.apply_rule(&rules[0]);

    let id = send_files(&mut app, sources);
    app.dispatch(AppEvent::ToggleSettings);
    app.dispatch(AppEvent::RuleChanged { index: 1 });
    app.dispatch(AppEvent::Accept);

    assert!(app.settings_view().is_some());
    assert!(!app.settings_view().unwrap().apply_enabled);
    assert!(app.settings().matches_rule(&rules[1]));
    // 실행 중인 작업은 시작 시점의 규칙 그대로
    assert_eq!(app.compress_view(id).unwrap().job.rule, rules[0]);

    app.quit();
    let _ = fs::remove_file(app.settings_path());
}

#[test]
fn test_close_on_finish_toggle_enables_apply() {
    let mut app = make_test_app(missing_tool_rule(), true);
    app.dispatch(AppEvent::ToggleSettings);

    app.execute_action(Action::ToggleCloseOnFinish);

    assert!(!app.settings().close_on_finish);
    assert!(app.settings_view().unwrap().apply_enabled);
}

#[test]
fn test_hiding_last_view_quits() {
    let mut app = make_test_app(missing_tool_rule(), true);
    app.dispatch(AppEvent::ToggleSettings);
    assert!(!app.should_quit());

    app.execute_action(Action::ToggleSettings);

    assert!(app.should_quit());
    let _ = fs::remove_file(app.settings_path());
}

#[test]
fn test_focus_cycles_through_views() {
    let temp = TempDir::new().unwrap();
    let sources = make_sources(temp.path(), &["a.txt"]);
    let mut app = make_test_app(missing_tool_rule(), false);
    app.dispatch(AppEvent::ToggleSettings);
    send_files(&mut app, sources);
    assert_eq!(app.focus_index(), 1);

    app.execute_action(Action::FocusNext);
    assert_eq!(app.focus_index(), 0);
    assert!(matches!(app.focused_view(), Some(ArchiverView::Settings(_))));

    app.execute_action(Action::FocusNext);
    assert_eq!(app.focus_index(), 1);
}

#[test]
fn test_move_stack_stays_on_screen() {
    let mut app = make_test_app(missing_tool_rule(), true);
    app.layout.update(ratatui::layout::Rect::new(0, 0, 80, 24));
    app.settings.window_position = WindowPosition { x: 0, y: 23 };

    app.execute_action(Action::MoveStackLeft);
    app.execute_action(Action::MoveStackDown);
    app.execute_action(Action::MoveStackRight);

    assert_eq!(app.settings().window_position, WindowPosition { x: 1, y: 23 });
}

#[test]
fn test_rule_changed_ignores_unselectable() {
    let rules = vec![missing_tool_rule()];
    let mut app = App::new_for_test(rules);
    app.dispatch(AppEvent::ToggleSettings);

    app.dispatch(AppEvent::RuleChanged { index: 0 });

    let view = app.settings_view().unwrap();
    assert_eq!(view.selected_rule(), None);
    assert!(!view.apply_enabled);
}

#[test]
fn test_use_rule_checks_index() {
    let rules = vec![missing_tool_rule(), CompressionRule::default_zip()];
    let mut app = App::new_for_test(rules.clone());

    assert!(app.use_rule(1).is_ok());
    assert!(app.settings().matches_rule(&rules[1]));
    assert!(matches!(
        app.use_rule(5),
        Err(ArchiverError::RuleNotFound {
            index: 5,
            available: 2
        })
    ));
}

#[test]
fn test_enter_on_finished_view_closes_it() {
    let temp = TempDir::new().unwrap();
    let sources = make_sources(temp.path(), &["a.txt"]);
    let mut app = make_test_app(missing_tool_rule(), false);
    app.dispatch(AppEvent::ToggleSettings);

    let id = send_files(&mut app, sources);
    pump_until(&mut app, |app| {
        matches!(phase_of(app, id), Some(JobPhase::Finished(_)))
    });

    app.execute_action(Action::Accept);

    assert!(app.compress_view(id).is_none());
    assert_eq!(app.views().len(), 1);
    assert!(!app.should_quit());
}
