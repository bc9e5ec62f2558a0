// Cursor management over a precomputed step sequence

use crate::snapshot::{Snapshot, StepSequence};
use std::time::{Duration, Instant};

/// Scrub player state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Plays a [`StepSequence`] by moving an index over it.
///
/// The index is `-1` before anything is shown and otherwise always within
/// `0..len`. No algorithm work happens here.
#[derive(Debug)]
pub struct Player {
    sequence: Option<StepSequence>,
    index: isize,
    state: PlaybackState,
    speed: Duration,
    last_advance: Option<Instant>,
}

impl Player {
    pub fn new(speed: Duration) -> Self {
        Player {
            sequence: None,
            index: -1,
            state: PlaybackState::Idle,
            speed,
            last_advance: None,
        }
    }

    /// Install a new sequence, discarding any previous one
    pub fn load(&mut self, sequence: StepSequence) {
        self.sequence = Some(sequence);
        self.index = -1;
        self.state = PlaybackState::Idle;
        self.last_advance = None;
    }

    /// Idle -> Running; no-op in any other state or without a sequence
    pub fn start(&mut self) {
        if self.state != PlaybackState::Idle || self.len() == 0 {
            return;
        }
        self.state = PlaybackState::Running;
        self.last_advance = None;
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Running;
            self.last_advance = None;
        }
    }

    /// Back to Idle with no sequence
    pub fn reset(&mut self) {
        self.sequence = None;
        self.index = -1;
        self.state = PlaybackState::Idle;
        self.last_advance = None;
    }

    /// Applies from the next tick on
    pub fn set_speed(&mut self, speed: Duration) {
        self.speed = speed;
    }

    /// Advance if at least `speed` has passed since the last advance.
    ///
    /// The first tick after start or resume advances immediately. Returns
    /// whether the index moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }
        if let Some(last) = self.last_advance {
            if now.saturating_duration_since(last) < self.speed {
                return false;
            }
        }
        self.last_advance = Some(now);
        self.advance()
    }

    /// One clock step while Running; moves to Completed at the last index
    pub fn advance(&mut self) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }
        let last = self.len() as isize - 1;
        if self.index >= last {
            self.state = PlaybackState::Completed;
            return false;
        }
        self.index += 1;
        if self.index == last {
            self.state = PlaybackState::Completed;
        }
        true
    }

    /// Manual step; ignored at the last index
    pub fn step_forward(&mut self) -> bool {
        let last = self.len() as isize - 1;
        if self.index >= last {
            return false;
        }
        self.index += 1;
        true
    }

    /// Manual step; ignored at index 0 or -1
    pub fn step_backward(&mut self) -> bool {
        if self.index <= 0 {
            return false;
        }
        self.index -= 1;
        if self.state == PlaybackState::Completed {
            self.state = PlaybackState::Paused;
        }
        true
    }

    /// Jump to the first snapshot
    pub fn jump_to_start(&mut self) {
        if self.len() > 0 {
            self.index = 0;
            if self.state == PlaybackState::Completed {
                self.state = PlaybackState::Paused;
            }
        }
    }

    /// Jump to the last snapshot
    pub fn jump_to_end(&mut self) {
        if self.len() > 0 {
            self.index = self.len() as isize - 1;
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn speed(&self) -> Duration {
        self.speed
    }

    pub fn index(&self) -> isize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.sequence.as_ref().map_or(0, |s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sequence(&self) -> Option<&StepSequence> {
        self.sequence.as_ref()
    }

    /// Snapshot at the cursor, `None` before the first step
    pub fn current(&self) -> Option<&Snapshot> {
        let index = usize::try_from(self.index).ok()?;
        self.sequence.as_ref()?.get(index)
    }

    /// Position as a percentage; 0 for sequences of one snapshot or fewer
    pub fn progress_percent(&self) -> f64 {
        let len = self.len();
        if len <= 1 || self.index < 0 {
            return 0.0;
        }
        self.index as f64 / (len - 1) as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{Generator, Kadane};

    fn loaded(values: Vec<i64>) -> Player {
        let mut player = Player::new(Duration::from_millis(100));
        player.load(Kadane::new(values).generate().unwrap());
        player
    }

    #[test]
    fn test_start_requires_sequence() {
        let mut player = Player::new(Duration::from_millis(100));
        player.start();
        assert_eq!(player.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_tick_respects_speed() {
        let mut player = loaded(vec![1, 2, 3]);
        player.start();
        let t0 = Instant::now();
        assert!(player.tick(t0));
        assert_eq!(player.index(), 0);
        assert!(!player.tick(t0 + Duration::from_millis(50)));
        assert!(player.tick(t0 + Duration::from_millis(100)));
        assert_eq!(player.index(), 1);
    }

    #[test]
    fn test_speed_change_applies_to_next_tick() {
        let mut player = loaded(vec![1, 2, 3]);
        player.start();
        let t0 = Instant::now();
        player.tick(t0);
        player.set_speed(Duration::from_millis(10));
        assert!(player.tick(t0 + Duration::from_millis(10)));
    }

    #[test]
    fn test_runs_to_completed() {
        let mut player = loaded(vec![4, -1]);
        player.start();
        while player.advance() {}
        assert_eq!(player.state(), PlaybackState::Completed);
        assert_eq!(player.index() as usize, player.len() - 1);
        assert_eq!(player.progress_percent(), 100.0);
    }

    #[test]
    fn test_pause_blocks_ticks() {
        let mut player = loaded(vec![1, 2]);
        player.start();
        player.advance();
        player.pause();
        assert!(!player.advance());
        assert_eq!(player.index(), 0);
        player.resume();
        assert!(player.advance());
    }

    #[test]
    fn test_step_back_from_completed_pauses() {
        let mut player = loaded(vec![1, 2]);
        player.start();
        while player.advance() {}
        assert!(player.step_backward());
        assert_eq!(player.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_reset_clears() {
        let mut player = loaded(vec![1]);
        player.start();
        player.advance();
        player.reset();
        assert_eq!(player.index(), -1);
        assert!(player.sequence().is_none());
        assert_eq!(player.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_progress_zero_for_single_snapshot() {
        let mut player = Player::new(Duration::ZERO);
        player.load(Kadane::new(Vec::new()).generate().unwrap());
        player.step_forward();
        assert_eq!(player.index(), 0);
        assert_eq!(player.progress_percent(), 0.0);
    }
}
