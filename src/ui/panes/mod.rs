//! TUI pane rendering modules
//!
//! - [`bars`]: element values as bars coloured by status
//! - [`narrative`]: operation, explanation and variables of the shown step
//! - [`race`]: a participant's live bars and counters
//! - [`status`]: status bar with keybindings and playback state

pub mod bars;
pub mod narrative;
pub mod race;
pub mod status;

pub use bars::render_bars_pane;
pub use narrative::render_narrative_pane;
pub use race::render_participant_pane;
pub use status::{render_status_bar, Badge, StatusLine};
