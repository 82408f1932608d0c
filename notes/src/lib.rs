mod app;
pub mod commands;
pub mod context;
pub mod events;
pub mod input;
pub mod logging;
pub mod notifications;
pub mod router;

pub use app::App;
pub use context::AppContext;

// Always expose testing module (integration tests need it)
pub mod testing;
