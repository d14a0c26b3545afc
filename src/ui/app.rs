//! Main TUI application state and logic

use crate::interpreter::DiagnosticKind;
use crate::io::Console;
use crate::runner::{run_with_config, stats, AbortReason, RunConfig, RunOutcome, RunResult};
use crate::samples::{self, Sample};
use crate::ui::panes::{self, source::LineMark};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tracing::debug;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Output,
    Diagnostics,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Diagnostics,
            FocusedPane::Diagnostics => FocusedPane::Source,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Diagnostics,
            FocusedPane::Output => FocusedPane::Source,
            FocusedPane::Diagnostics => FocusedPane::Output,
        }
    }
}

/// What the status bar badge shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    NotRun,
    Compiling,
    Succeeded,
    Failed,
}

/// The main application state
pub struct App {
    pub source_code: String,
    /// File name or sample title shown on the source pane
    pub source_name: String,
    /// Input fed to `scanf` on the next run
    pub stdin: String,
    pub config: RunConfig,

    pub result: Option<RunResult>,
    pub phase: RunPhase,

    pub focused_pane: FocusedPane,
    pub source_scroll: usize,
    pub output_scroll: usize,
    pub diagnostics_scroll: usize,

    /// Buffer being edited while in stdin input mode
    pub input_buffer: Option<String>,

    /// Position in the built-in sample list, when a sample is loaded
    pub sample_index: Option<usize>,

    pub should_quit: bool,
    pub status_message: String,

    /// Set by `r`; the run happens after the next draw so "编译中…" is seen
    run_requested: bool,
}

impl App {
    pub fn new(source_code: String, source_name: String, stdin: String, config: RunConfig) -> Self {
        App {
            source_code,
            source_name,
            stdin,
            config,
            result: None,
            phase: RunPhase::NotRun,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            output_scroll: 0,
            diagnostics_scroll: 0,
            input_buffer: None,
            sample_index: None,
            should_quit: false,
            status_message: String::from("就绪"),
            run_requested: false,
        }
    }

    /// Start with one of the built-in samples loaded
    pub fn with_sample(index: usize, config: RunConfig) -> Self {
        let mut app = App::new(String::new(), String::new(), String::new(), config);
        app.load_sample(index);
        app
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.run_requested {
                self.run_requested = false;
                self.execute_run();
                continue;
            }

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[1]);

        let marks = self.line_marks();
        panes::render_source_pane(
            frame,
            columns[0],
            &self.source_name,
            &self.source_code,
            &marks,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        let (console, trailer) = match &self.result {
            Some(result) => display_output(result),
            None => (None, String::new()),
        };
        panes::render_output_pane(
            frame,
            right_rows[0],
            console.as_ref(),
            &trailer,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        let diagnostics = self
            .result
            .as_ref()
            .map(|r| r.diagnostics.as_slice())
            .unwrap_or_default();
        panes::render_diagnostics_pane(
            frame,
            right_rows[1],
            diagnostics,
            self.focused_pane == FocusedPane::Diagnostics,
            &mut self.diagnostics_scroll,
        );

        panes::render_input_line(
            frame,
            main_chunks[1],
            &self.stdin,
            self.input_buffer.as_deref(),
        );

        panes::render_status_bar(
            frame,
            main_chunks[2],
            &self.status_message,
            self.phase,
            self.input_buffer.is_some(),
        );
    }

    /// Source lines that produced diagnostics in the last run
    pub fn line_marks(&self) -> Vec<(usize, LineMark)> {
        let Some(result) = &self.result else {
            return Vec::new();
        };
        result
            .diagnostics
            .iter()
            .filter_map(|d| {
                let mark = if d.kind == DiagnosticKind::Warning {
                    LineMark::Warning
                } else {
                    LineMark::Error
                };
                d.line.map(|line| (line, mark))
            })
            .collect()
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.input_buffer.is_some() {
            self.handle_input_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.request_run();
            }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                self.input_buffer = Some(self.stdin.clone());
                self.status_message = "编辑输入，多个值用逗号或空格分隔".to_string();
            }
            KeyCode::Char('n') => self.cycle_sample(true),
            KeyCode::Char('p') => self.cycle_sample(false),
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::PageUp => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(10);
            }
            KeyCode::PageDown => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(10);
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let Some(buffer) = self.input_buffer.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Enter => {
                self.stdin = std::mem::take(buffer);
                self.input_buffer = None;
                self.status_message = "输入已更新，按 r 运行".to_string();
            }
            KeyCode::Esc => {
                self.input_buffer = None;
                self.status_message = "已取消".to_string();
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Output => &mut self.output_scroll,
            FocusedPane::Diagnostics => &mut self.diagnostics_scroll,
        }
    }

    fn request_run(&mut self) {
        self.phase = RunPhase::Compiling;
        self.status_message = "编译中…".to_string();
        self.run_requested = true;
    }

    /// Run the current program and take in its result
    pub fn execute_run(&mut self) {
        debug!(source = %self.source_name, "running from the TUI");
        let result = run_with_config(&self.source_code, &self.stdin, &self.config);

        self.phase = if result.outcome.is_success() {
            RunPhase::Succeeded
        } else {
            RunPhase::Failed
        };
        self.status_message = match result.outcome {
            RunOutcome::Completed => format!("运行完成，返回值 {}", result.exit_code.unwrap_or(0)),
            RunOutcome::ScriptedFallback => "已模拟猜数字游戏".to_string(),
            RunOutcome::Aborted(AbortReason::Syntax) => "存在语法错误".to_string(),
            RunOutcome::Aborted(AbortReason::ResourceLimit) => "程序被终止".to_string(),
        };
        self.output_scroll = 0;
        self.diagnostics_scroll = 0;
        self.result = Some(result);
    }

    fn cycle_sample(&mut self, forward: bool) {
        let count = samples::all().len();
        let index = match (self.sample_index, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        };
        self.load_sample(index);
    }

    fn load_sample(&mut self, index: usize) {
        let Some(sample) = samples::all().get(index) else {
            return;
        };
        self.show_sample(sample);
        self.sample_index = Some(index);
    }

    fn show_sample(&mut self, sample: &Sample) {
        self.source_code = sample.source.to_string();
        self.source_name = format!("{} ({}.c)", sample.title, sample.name);
        self.stdin = sample.stdin.to_string();
        self.result = None;
        self.phase = RunPhase::NotRun;
        self.source_scroll = 0;
        self.output_scroll = 0;
        self.diagnostics_scroll = 0;
        self.status_message = format!("已加载示例: {}", sample.title);
    }
}

/// What the output pane shows for a finished run
fn display_output(result: &RunResult) -> (Option<Console>, String) {
    if result.outcome == RunOutcome::Aborted(AbortReason::Syntax) {
        let mut console = Console::new();
        console.note(&result.report(), 0);
        return (Some(console), String::new());
    }
    let trailer = stats::trailer(result.elapsed_ms, result.estimated_memory_bytes);
    (Some(result.console.clone()), trailer)
}
