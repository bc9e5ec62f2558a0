//! # Introduction
//!
//! algoreplay turns algorithms into step-by-step visual traces. Every step is
//! a [`snapshot::Snapshot`]: the elements being worked on, a status per
//! element, a short narrative and the event that produced it. Traces are
//! navigated forward and backward in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Two engines
//!
//! ```text
//! Generator ──────────────► StepSequence ──► Player ──► scrub view
//! Algorithm ──► Executor ──► sink ──► record() ─┘
//!                              └──► RaceController ──► race view
//! ```
//!
//! 1. [`trace`]: deterministic generators (matrix traversal, prefix sums,
//!    Kadane, segment tree, Kruskal, trie) that precompute a whole
//!    [`snapshot::StepSequence`].
//! 2. [`exec`]: live executors that run sorting algorithms on their own copy
//!    of the input, emitting snapshots as they go and honouring a shared
//!    pause/cancel [`exec::ControlHandle`].
//! 3. [`race`]: two to four executors interleaved on one thread with live
//!    statistics.
//! 4. [`playback`]: a cursor over a precomputed sequence.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! Supporting modules: [`config`] (YAML settings), [`input`] (argument
//! formats and seeded random arrays), [`cli`] and [`errors`].

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod input;
pub mod playback;
pub mod race;
pub mod snapshot;
pub mod trace;
pub mod ui;
