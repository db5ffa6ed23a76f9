mod app;
mod core;
mod logging;
mod models;
mod system;
mod ui;
mod utils;

use anyhow::Context;
use app::{App, ArchiverView};
use clap::Parser;
use crate::core::actions::{find_action, generate_command_bar_items};
use crate::core::events::AppEvent;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use models::{JobId, JobOutcome};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use system::{plan_job, JobObserver, ProcessRunner, RulesStore, SettingsStore};
use tracing::{error, info, warn};
use ui::{
    stack_view_areas, CommandBar, CompressPanel, Dialog, LayoutMode, SettingsPanel, StatusBar,
    ThemeManager, WarningScreen,
};
use utils::error::ArchiverError;

/// 화면 갱신 간격 (경과 시간 표시)
const TICK: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files to compress (none: open the settings view)
    files: Vec<PathBuf>,

    /// Directory the archive is created in (default: common parent of the files)
    #[arg(short = 'd', long = "dir")]
    dir: Option<PathBuf>,

    /// Rules file (default: $ARCHIVER_RULES_FILE or <config>/archiver/archiver.rules)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Settings file (default: $ARCHIVER_SETTINGS_FILE or <config>/archiver/settings.toml)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Use the rule at this index for this run
    #[arg(short = 'r', long = "rule")]
    rule: Option<usize>,

    /// Print the loaded rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Compress without the terminal UI and wait for the tool
    #[arg(long)]
    no_ui: bool,

    /// Log file for the interactive mode
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let headless = cli.no_ui || cli.list_rules;
    let _log_guard = logging::init_tracing(cli.log_file.clone(), headless)?;

    let rules_store = RulesStore::new(cli.rules.clone().unwrap_or_else(RulesStore::default_path));
    let settings_store =
        SettingsStore::new(cli.settings.clone().unwrap_or_else(SettingsStore::default_path));

    if cli.list_rules {
        list_rules(&rules_store);
        return Ok(ExitCode::SUCCESS);
    }

    let sources = resolve_sources(&cli.files)?;
    if cli.no_ui {
        return run_headless(&cli, sources, &rules_store, &settings_store);
    }

    let mut app = App::new(&rules_store, settings_store, ProcessRunner::new());
    if let Some(index) = cli.rule {
        app.use_rule(index)?;
    }
    if let Some(path) = ThemeManager::default_theme_path() {
        if let Err(err) = app.theme_manager.load_override(&path) {
            warn!(path = %path.display(), error = %err, "theme override ignored");
        }
    }

    if sources.is_empty() {
        app.dispatch(AppEvent::ToggleSettings);
    } else {
        app.dispatch(AppEvent::FilesReceived {
            sources,
            dir: cli.dir.clone(),
        });
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        // 남은 작업 정리
        app.quit();
        error!(error = %err, "terminal loop failed");
        return Err(err);
    }

    Ok(ExitCode::SUCCESS)
}

/// 실제 경로로 변환 (없는 파일은 오류)
fn resolve_sources(files: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    files
        .iter()
        .map(|file| {
            std::fs::canonicalize(file)
                .map_err(|_| ArchiverError::PathNotFound { path: file.clone() })
                .map_err(anyhow::Error::from)
        })
        .collect()
}

fn list_rules(rules_store: &RulesStore) {
    for (index, rule) in rules_store.load().iter().enumerate() {
        let status = if rule.tool_exists() { "" } else { "  (not installed)" };
        println!(
            "{:>2}  {:<40} {}{}",
            index,
            rule.label(),
            rule.executable.display(),
            status
        );
    }
}

/// 헤드리스 실행 알림 (로그로만)
struct LogObserver;

impl JobObserver for LogObserver {
    fn thread_started(&self, job: JobId, pid: u32) {
        info!(job, pid, "compression tool running");
    }

    fn job_finished(&self, job: JobId, outcome: JobOutcome, file_type: Option<&'static str>) {
        info!(job, ?outcome, file_type, "compression finished");
    }
}

fn run_headless(
    cli: &Cli,
    sources: Vec<PathBuf>,
    rules_store: &RulesStore,
    settings_store: &SettingsStore,
) -> anyhow::Result<ExitCode> {
    let settings = settings_store.load();
    let rule = match cli.rule {
        Some(index) => {
            let rules = rules_store.load();
            let available = rules.len();
            rules
                .into_iter()
                .nth(index)
                .ok_or(ArchiverError::RuleNotFound { index, available })?
        }
        None => settings.active_rule(),
    };
    if !rule.tool_exists() {
        return Err(ArchiverError::ToolNotFound {
            path: rule.executable,
        }
        .into());
    }

    let job = plan_job(1, sources, cli.dir.clone(), rule, Some(settings.priority))?;
    let output = job.output_path.clone();
    let handle = ProcessRunner::with_inherited_output()
        .start(&job, LogObserver)
        .context("starting compression")?;
    info!(pid = ?handle.pid(), output = %output.display(), "waiting for compression tool");

    let outcome = handle.wait();
    if outcome.is_success() {
        println!("{}", output.display());
        return Ok(ExitCode::SUCCESS);
    }
    let reason = match &outcome {
        JobOutcome::Failed { reason } => reason.as_str(),
        _ => outcome.title(),
    };
    eprintln!("archiver: {}: {}", output.display(), reason);
    Ok(ExitCode::FAILURE)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| {
            let size = f.area();

            // 레이아웃 업데이트
            app.layout.update(size);

            match app.layout.mode() {
                LayoutMode::TooSmall => {
                    let (width, height) = app.layout.terminal_size();
                    let warning = WarningScreen::new()
                        .current_size(width, height)
                        .running(app.running_count())
                        .theme(app.theme_manager.current());
                    f.render_widget(warning, app.layout.areas().warning);
                }
                LayoutMode::Normal => render_main_ui(f, app),
            }
        })?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if app.is_dialog_active() {
                        handle_dialog_keys(app, key.code);
                    } else if let Some(action) = find_action(key.modifiers, key.code) {
                        app.execute_action(action);
                    }
                }
            }
        }

        // 감시 스레드 알림
        app.pump_events();

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// 확인 다이얼로그 키 처리
fn handle_dialog_keys(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            app.dialog_toggle_button();
        }
        KeyCode::Enter => app.dialog_submit(),
        KeyCode::Char('y') => app.answer_dialog(true),
        KeyCode::Char('n') | KeyCode::Esc => app.answer_dialog(false),
        _ => {}
    }
}

/// 뷰 하나 렌더링
fn render_view(f: &mut ratatui::Frame<'_>, app: &App, view: &ArchiverView, focused: bool, area: Rect) {
    let theme = app.theme_manager.current();
    match view {
        ArchiverView::Settings(settings_view) => {
            let panel = SettingsPanel::new(app.rules(), settings_view.selectable())
                .selected(settings_view.selected_rule())
                .close_on_finish(app.settings().close_on_finish)
                .apply_enabled(settings_view.apply_enabled)
                .focused(focused)
                .theme(theme);
            f.render_widget(panel, area);
        }
        ArchiverView::Compress(compress) => {
            let output_name = compress.job.output_name();
            let panel = CompressPanel::new(&output_name, &compress.job.working_dir, &compress.phase)
                .pid(compress.pid)
                .started(compress.started_clock)
                .elapsed(compress.elapsed())
                .file_type(compress.file_type)
                .focused(focused)
                .theme(theme);
            f.render_widget(panel, area);
        }
    }
}

/// 메인 UI 렌더링
fn render_main_ui(f: &mut ratatui::Frame<'_>, app: &App) {
    let areas = app.layout.areas();
    let theme = app.theme_manager.current();

    let sizes: Vec<(u16, u16)> = app
        .views()
        .iter()
        .map(|view| view.preferred_size(app.rules()))
        .collect();
    let rects = stack_view_areas(areas.views, app.settings().window_position, &sizes);
    for (index, (view, rect)) in app.views().iter().zip(rects).enumerate() {
        if rect.height > 0 {
            render_view(f, app, view, index == app.focus_index(), rect);
        }
    }

    let rule_label = app.settings().active_rule().label();
    let status_bar = StatusBar::new()
        .running(app.running_count())
        .finished(app.finished_count())
        .rule_label(&rule_label)
        .notice(app.notice())
        .theme(theme);
    f.render_widget(status_bar, areas.status_bar);

    let apply_enabled = app
        .settings_view()
        .is_some_and(|view| view.apply_enabled);
    let commands = generate_command_bar_items(app.focused_view().map(ArchiverView::scope))
        .into_iter()
        .map(|item| {
            if item.label == "Accept" {
                item.enabled(apply_enabled)
            } else {
                item
            }
        })
        .collect();
    let command_bar = CommandBar::new().commands(commands).theme(theme);
    f.render_widget(command_bar, areas.command_bar);

    if let Some(ref dialog_kind) = app.dialog {
        let dialog = Dialog::new(dialog_kind).theme(theme);
        f.render_widget(dialog, f.area());
    }
}
