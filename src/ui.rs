//! Ratatui front-end. `app` owns the state and key handling, `forms` and
//! `screens` hold the pieces of that state, and `terminal` drives the event
//! loop against a real terminal.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
