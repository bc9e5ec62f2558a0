// algoreplay: step-through algorithm visualizer

use std::io;
use std::rc::Rc;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::task::LocalSet;

use algoreplay::cli::{self, Command};
use algoreplay::config::{default_config_path, load_config};
use algoreplay::errors::EngineError;
use algoreplay::exec::{self, Algorithm};
use algoreplay::snapshot::StepSequence;
use algoreplay::trace::Generator;
use algoreplay::ui::{App, RaceApp};

type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let config = load_config(&default_config_path());

    let command = match cli::parse_args(args.get(1..).unwrap_or_default(), &config.input) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("{}", cli::USAGE);
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let local = LocalSet::new();

    match command {
        Command::Trace(generator) => {
            let sequence = generator.generate().map_err(EngineError::from)?;
            log::info!("{}: {} steps", generator.name(), sequence.len());
            let title = generator.name().to_string();
            with_terminal(|terminal| scrub(terminal, title, sequence, &config))?;
        }
        Command::Sort { algorithm, values } => {
            let sequence = local
                .block_on(&runtime, exec::record(&algorithm, &values))
                .map_err(EngineError::from)?;
            log::info!("{}: {} steps", algorithm.name(), sequence.len());
            let title = algorithm.name().to_string();
            with_terminal(|terminal| scrub(terminal, title, sequence, &config))?;
        }
        Command::Race { algorithms, values } => {
            let algorithms: Vec<Rc<dyn Algorithm>> = algorithms
                .into_iter()
                .map(|a| Rc::new(a) as Rc<dyn Algorithm>)
                .collect();
            let mut app = RaceApp::new(algorithms, values, config.clone()).map_err(EngineError::from)?;
            with_terminal(|terminal| local.block_on(&runtime, app.run(terminal)))?;
            if let Some(report) = &app.report {
                for result in &report.results {
                    eprintln!(
                        "{:<16} {:?} comparisons={} swaps={}",
                        result.name, result.outcome, result.stats.comparisons, result.stats.swaps
                    );
                }
                eprintln!("Elapsed: {}s", report.elapsed_secs);
            }
        }
    }

    Ok(())
}

fn scrub(
    terminal: &mut AppTerminal,
    title: String,
    sequence: StepSequence,
    config: &algoreplay::config::AppConfig,
) -> io::Result<()> {
    App::new(title, sequence, config.playback.clone()).run(terminal)
}

/// Set up the terminal, run `body`, and restore the terminal even if it failed
fn with_terminal<F>(body: F) -> io::Result<()>
where
    F: FnOnce(&mut AppTerminal) -> io::Result<()>,
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // stderr shares the screen with the TUI
    let level = log::max_level();
    log::set_max_level(log::LevelFilter::Off);
    let res = body(&mut terminal);
    log::set_max_level(level);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        eprintln!("Error: {:?}", err);
    }
    res
}
