//! Scrub view: plays back a precomputed step sequence

use crate::config::PlaybackConfig;
use crate::playback::{PlaybackState, Player};
use crate::snapshot::StepSequence;
use crate::ui::panes::{render_bars_pane, render_narrative_pane, render_status_bar, Badge, StatusLine};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

const SCRUB_KEYS: &[(&str, &str)] = &[
    ("⎵", "play"),
    ("←/→", "step"),
    ("+/-", "speed"),
    ("↵ / ⌫", "end/start"),
    ("r", "reset"),
    ("q", "quit"),
];

/// The scrub application state
pub struct App {
    title: String,
    /// Kept so `r` can reload after a reset
    sequence: StepSequence,
    pub player: Player,
    config: PlaybackConfig,
    pub should_quit: bool,
    pub status_message: String,
    /// Last time space was pressed (for debouncing)
    last_space_press: Instant,
}

impl App {
    pub fn new(title: impl Into<String>, sequence: StepSequence, config: PlaybackConfig) -> Self {
        let mut player = Player::new(config.speed());
        player.load(sequence.clone());
        App {
            title: title.into(),
            sequence,
            player,
            config,
            should_quit: false,
            status_message: String::from("Ready!"),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.player.tick(Instant::now())
                && self.player.state() == PlaybackState::Completed
            {
                self.status_message = "Playback complete".to_string();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
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
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_chunks[0]);

        let current = self.player.current();
        render_bars_pane(frame, columns[0], &self.title, current, true);
        render_narrative_pane(frame, columns[1], current, false);

        let position = match current {
            Some(snapshot) => format!(
                "Step {}/{} ({:.0}%) {}ms",
                snapshot.progress.current_step + 1,
                snapshot.progress.total_steps,
                self.player.progress_percent(),
                self.player.speed().as_millis()
            ),
            None => format!("Step -/{}", self.player.len()),
        };
        let badge = self.badge();
        render_status_bar(
            frame,
            main_chunks[1],
            &StatusLine {
                position,
                message: &self.status_message,
                keys: SCRUB_KEYS,
                badge,
            },
        );
    }

    fn badge(&self) -> Badge {
        let last = self.player.len() as isize - 1;
        match self.player.state() {
            PlaybackState::Running => Badge::Playing,
            _ if self.player.index() >= 0 && self.player.index() == last => Badge::End,
            _ if self.player.index() <= 0 => Badge::Start,
            PlaybackState::Paused => Badge::Paused,
            _ => Badge::None,
        }
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                // 200ms debounce against key repeat
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.toggle_play();
                }
            }
            KeyCode::Left => {
                self.player.pause();
                self.status_message = if self.player.step_backward() {
                    "Stepped backward".to_string()
                } else {
                    "Already at the first step".to_string()
                };
            }
            KeyCode::Right => {
                self.player.pause();
                self.status_message = if self.player.step_forward() {
                    "Stepped forward".to_string()
                } else {
                    "Already at the last step".to_string()
                };
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.change_speed(false),
            KeyCode::Char('-') => self.change_speed(true),
            KeyCode::Enter => {
                self.player.pause();
                self.player.jump_to_end();
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.player.pause();
                self.player.jump_to_start();
                self.status_message = "Jumped to start".to_string();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.player.reset();
                self.player.load(self.sequence.clone());
                self.status_message = "Reset".to_string();
            }
            _ => {}
        }
    }

    fn toggle_play(&mut self) {
        match self.player.state() {
            PlaybackState::Idle => {
                self.player.start();
                self.status_message = "Playing...".to_string();
            }
            PlaybackState::Running => {
                self.player.pause();
                self.status_message = "Paused".to_string();
            }
            PlaybackState::Paused => {
                self.player.resume();
                self.status_message = "Playing...".to_string();
            }
            PlaybackState::Completed => {
                self.status_message = "Playback complete, press r to replay".to_string();
            }
        }
    }

    /// `+` speeds up (shorter delay), `-` slows down
    fn change_speed(&mut self, slower: bool) {
        let current = self.player.speed().as_millis() as u64;
        let requested = if slower {
            current.saturating_add(self.config.speed_step_ms)
        } else {
            current.saturating_sub(self.config.speed_step_ms)
        };
        let speed = self.config.clamp(requested);
        self.player.set_speed(speed);
        self.status_message = format!("Speed {}ms per step", speed.as_millis());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{Generator, Kadane};
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        let sequence = Kadane::new(vec![2, -1, 3]).generate().unwrap();
        App::new("kadane", sequence, PlaybackConfig::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_arrow_keys_scrub() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.player.index(), 1);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.player.index(), 0);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.player.index(), 0);
    }

    #[test]
    fn test_speed_keys_clamped() {
        let mut app = app();
        for _ in 0..100 {
            press(&mut app, KeyCode::Char('+'));
        }
        assert_eq!(app.player.speed(), Duration::from_millis(10));
        for _ in 0..100 {
            press(&mut app, KeyCode::Char('-'));
        }
        assert_eq!(app.player.speed(), Duration::from_millis(2000));
    }

    #[test]
    fn test_space_starts_then_reset_reloads() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.player.state(), PlaybackState::Running);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.player.state(), PlaybackState::Idle);
        assert_eq!(app.player.index(), -1);
        assert!(!app.player.is_empty());
    }

    #[test]
    fn test_starts_at_configured_speed() {
        let sequence = Kadane::new(vec![1]).generate().unwrap();
        let config = PlaybackConfig {
            speed_ms: 5000,
            ..PlaybackConfig::default()
        };
        let app = App::new("kadane", sequence, config);
        assert_eq!(app.player.speed(), Duration::from_millis(2000));
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
