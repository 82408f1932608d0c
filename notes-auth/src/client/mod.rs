mod auth_client;
mod auth_state;
mod config;
mod navigation;
mod session;
mod token_storage;

pub use auth_client::AuthClient;
pub use auth_state::{AuthState, Subscription};
pub use config::Settings;
pub use navigation::{Navigator, HOME_ROUTE, LOGIN_ROUTE};
pub use session::Session;
pub use token_storage::{TokenKind, TokenStore};
