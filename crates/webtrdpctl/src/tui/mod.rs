//! TUI monitor
//!
//! - event_loop: terminal setup, key handling, task spawning
//! - render: drawing
//! - state: view state on top of the session

mod event_loop;
mod render;
mod state;

pub use event_loop::{run, TuiMessage};
