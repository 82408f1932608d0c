// Types shared by the session components
pub mod common;

mod client;
mod error;

pub use client::{
    AuthClient, AuthState, Navigator, Session, Settings, Subscription, TokenKind, TokenStore,
    HOME_ROUTE, LOGIN_ROUTE,
};
pub use common::CurrentUser;
pub use error::AuthError;
