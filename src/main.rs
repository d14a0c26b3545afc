// ctutor: compile & run student C programs in the terminal

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use ctutor::runner::{run_with_config, RunConfig};
use ctutor::samples;
use ctutor::ui::App;

/// Run a teaching subset of C without a C compiler
#[derive(Parser, Debug)]
#[command(name = "ctutor", version, about)]
struct Cli {
    /// C source file to run
    file: Option<PathBuf>,

    /// Input for scanf, values separated by commas or whitespace
    #[arg(long, default_value = "")]
    stdin: String,

    /// Print the run report and exit instead of opening the TUI
    #[arg(long)]
    plain: bool,

    /// Iterations one loop may run before the program is stopped
    #[arg(long, value_name = "N")]
    max_iterations: Option<usize>,

    /// Statements a run may execute
    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Maximum nesting of function calls
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Write logs here (the TUI otherwise logs nowhere)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Load a built-in sample program
    #[arg(long, value_name = "NAME", conflicts_with = "file")]
    sample: Option<String>,

    /// List the built-in samples and exit
    #[arg(long)]
    list_samples: bool,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        let defaults = RunConfig::default();
        RunConfig {
            max_loop_iterations: self.max_iterations.unwrap_or(defaults.max_loop_iterations),
            max_steps: self.max_steps.unwrap_or(defaults.max_steps),
            max_call_depth: self.max_depth.unwrap_or(defaults.max_call_depth),
        }
    }
}

fn init_logging(log_file: Option<&Path>, to_stderr: bool) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if to_stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list_samples {
        for sample in samples::all() {
            println!("{:<12} {}", sample.name, sample.title);
        }
        return ExitCode::SUCCESS;
    }

    if let Err(err) = init_logging(cli.log_file.as_deref(), cli.plain) {
        eprintln!("错误: 无法创建日志文件: {}", err);
        return ExitCode::FAILURE;
    }

    let config = cli.run_config();

    // Resolve what to run: a file, a named sample, or the default sample
    let (source, name, stdin) = if let Some(path) = &cli.file {
        match fs::read_to_string(path) {
            Ok(source) => (source, path.display().to_string(), cli.stdin.clone()),
            Err(err) => {
                eprintln!("错误: 无法读取文件 '{}': {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        let sample = match &cli.sample {
            Some(name) => match samples::find(name) {
                Some(sample) => sample,
                None => {
                    eprintln!("错误: 没有名为 '{}' 的示例 (使用 --list-samples 查看)", name);
                    return ExitCode::FAILURE;
                }
            },
            None => samples::default_sample(),
        };
        let stdin = if cli.stdin.is_empty() {
            sample.stdin.to_string()
        } else {
            cli.stdin.clone()
        };
        (sample.source.to_string(), format!("{}.c", sample.name), stdin)
    };

    if cli.plain {
        let result = run_with_config(&source, &stdin, &config);
        println!("{}", result.report());
        return if result.outcome.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        };
    }

    let mut app = match &cli.file {
        Some(_) => App::new(source, name, stdin, config),
        None => {
            let index = cli
                .sample
                .as_deref()
                .and_then(|wanted| samples::all().iter().position(|s| s.name == wanted))
                .unwrap_or(0);
            let mut app = App::with_sample(index, config);
            app.stdin = stdin;
            app
        }
    };

    match run_tui(&mut app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("错误: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_tui(app: &mut App) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
