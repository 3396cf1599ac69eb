//! Application module: the controller state rendered by the TUI.
//!
//! `App` holds what the screen shows (song summary, play/pause control,
//! transient toast, open picker). The pick flow in `app::flow` drives it
//! together with the playback `Supervisor`.

mod flow;
mod model;

pub use flow::{NOT_SELECTED, PERMISSION_DENIED};
pub use model::*;

#[cfg(test)]
mod tests;
