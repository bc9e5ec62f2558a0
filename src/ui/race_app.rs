//! Race view: live executors side by side

use crate::config::AppConfig;
use crate::errors::ValidationError;
use crate::exec::{Algorithm, RunState};
use crate::race::{RaceController, RaceReport, SeriesSampler};
use crate::ui::panes::{render_participant_pane, render_status_bar, Badge, StatusLine};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::JoinHandle;

const RACE_KEYS: &[(&str, &str)] = &[
    ("⎵", "pause"),
    ("+/-", "speed"),
    ("s", "stop"),
    ("r", "restart"),
    ("q", "quit"),
];

/// How often the screen is redrawn while the race runs
const FRAME: Duration = Duration::from_millis(50);

pub struct RaceApp {
    algorithms: Vec<Rc<dyn Algorithm>>,
    input: Vec<i64>,
    config: AppConfig,
    race: Rc<RaceController>,
    handle: Option<JoinHandle<RaceReport>>,
    pub report: Option<RaceReport>,
    speed: Duration,
    pub should_quit: bool,
    pub status_message: String,
}

impl RaceApp {
    pub fn new(
        algorithms: Vec<Rc<dyn Algorithm>>,
        input: Vec<i64>,
        config: AppConfig,
    ) -> Result<Self, ValidationError> {
        let speed = Duration::from_millis(config.race.speed_ms);
        let race = Rc::new(Self::build(&algorithms, &input, &config, speed)?);
        Ok(RaceApp {
            algorithms,
            input,
            config,
            race,
            handle: None,
            report: None,
            speed,
            should_quit: false,
            status_message: String::from("Racing..."),
        })
    }

    fn build(
        algorithms: &[Rc<dyn Algorithm>],
        input: &[i64],
        config: &AppConfig,
        speed: Duration,
    ) -> Result<RaceController, ValidationError> {
        Ok(RaceController::new(input.to_vec(), algorithms.to_vec(), speed)?
            .with_tick(Duration::from_millis(config.race.tick_ms))
            .with_sampler(SeriesSampler::new(config.race.sample_stride)))
    }

    pub fn race(&self) -> &RaceController {
        &self.race
    }

    /// Spawn the race onto the current `LocalSet`
    pub fn launch(&mut self) {
        let race = Rc::clone(&self.race);
        self.handle = Some(tokio::task::spawn_local(async move { race.run().await }));
    }

    /// Run the event loop; must be awaited inside a `LocalSet`
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        if self.handle.is_none() {
            self.launch();
        }

        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.collect_report().await;

            while event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            // yields so the participants get to run between frames
            tokio::time::sleep(FRAME).await;
        }

        self.race.stop();
        self.collect_report().await;
        Ok(())
    }

    /// Take the report once the race task has settled
    async fn collect_report(&mut self) {
        let finished = self.handle.as_ref().is_some_and(|h| h.is_finished())
            || (self.handle.is_some() && self.race.control().state() == RunState::Cancelled);
        if !finished {
            return;
        }
        let Some(handle) = self.handle.take() else {
            return;
        };
        match handle.await {
            Ok(report) => {
                self.status_message = match report.winner() {
                    Some(winner) => format!("{} wins", winner),
                    None => "No participant completed".to_string(),
                };
                self.report = Some(report);
            }
            Err(err) => {
                log::warn!("race task ended abnormally: {}", err);
                self.status_message = format!("Race aborted: {}", err);
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => match self.race.control().state() {
                RunState::Running => {
                    self.race.pause();
                    self.status_message = "Paused".to_string();
                }
                RunState::Paused => {
                    self.race.resume();
                    self.status_message = "Racing...".to_string();
                }
                RunState::Cancelled => {}
            },
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.race.stop();
                self.status_message = "Stopped".to_string();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.change_speed(false),
            KeyCode::Char('-') => self.change_speed(true),
            KeyCode::Char('r') | KeyCode::Char('R') => self.restart(),
            _ => {}
        }
    }

    /// A stopped race cannot resume, so restarting builds a fresh controller
    fn restart(&mut self) {
        self.race.stop();
        // the old task settles on its own once its participants see the cancel
        self.handle = None;
        match Self::build(&self.algorithms, &self.input, &self.config, self.speed) {
            Ok(race) => {
                self.race = Rc::new(race);
                self.report = None;
                self.launch();
                self.status_message = "Restarted".to_string();
            }
            Err(err) => self.status_message = err.to_string(),
        }
    }

    fn change_speed(&mut self, slower: bool) {
        let step = self.config.playback.speed_step_ms;
        let current = self.speed.as_millis() as u64;
        let requested = if slower {
            current.saturating_add(step)
        } else {
            current.saturating_sub(step)
        };
        self.speed = self.config.playback.clamp(requested);
        self.race.set_speed(self.speed);
        self.status_message = format!("Speed {}ms per unit", self.speed.as_millis());
    }

    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let participants = self.race.participants();
        for (participant, area) in participants.iter().zip(grid(main_chunks[0], participants.len())) {
            render_participant_pane(frame, area, participant);
        }

        let badge = match self.race.control().state() {
            RunState::Cancelled => Badge::Stopped,
            RunState::Paused => Badge::Paused,
            RunState::Running if self.race.is_running() => Badge::Playing,
            RunState::Running => Badge::End,
        };
        render_status_bar(
            frame,
            main_chunks[1],
            &StatusLine {
                position: format!("{}s {}ms", self.race.elapsed_secs(), self.speed.as_millis()),
                message: &self.status_message,
                keys: RACE_KEYS,
                badge,
            },
        );
    }
}

/// Two panes side by side, three or four in a 2x2 grid
fn grid(area: Rect, count: usize) -> Vec<Rect> {
    let halves = |area: Rect, direction: Direction| {
        Layout::default()
            .direction(direction)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area)
    };

    if count <= 2 {
        return halves(area, Direction::Horizontal).to_vec();
    }
    let rows = halves(area, Direction::Vertical);
    let mut cells = halves(rows[0], Direction::Horizontal).to_vec();
    cells.extend(halves(rows[1], Direction::Horizontal).iter().copied());
    cells
}
