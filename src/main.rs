//! Binary entry point that glues the in-memory booking store to the TUI. The
//! pipeline is deliberately short: build an empty store, hand it to the app
//! state, and drive the Ratatui event loop until the user exits. Nothing is
//! persisted; the list lives only for the session.
use booking_entry_manager::{run_app, App, BookingStore};

/// Build the session store and launch the Ratatui event loop.
///
/// Returning a `Result` bubbles up fatal terminal-initialization problems to
/// the shell instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let store = BookingStore::new();
    let mut app = App::new(store);
    run_app(&mut app)
}
