//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`app`]**: scrub view over a precomputed [`StepSequence`], driven by a
//!   synchronous poll loop
//! - **[`race_app`]**: race view, an async loop that shares the `LocalSet`
//!   with the participants it draws
//! - **[`panes`]**: stateless render functions (bars, narrative, participant,
//!   status bar)
//! - **[`theme`]**: colour palette and status colours
//!
//! [`StepSequence`]: crate::snapshot::StepSequence

pub mod app;
pub mod panes;
pub mod race_app;
pub mod theme;

pub use app::App;
pub use race_app::RaceApp;
