//! Ratatui front-end split across logical submodules. `app` owns the screen
//! and mode state machine, `forms` the input widgets, `helpers` the shared
//! layout math, and `terminal` the raw-mode event loop.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
