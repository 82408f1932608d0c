mod models;

pub use models::{CurrentUser, StoredSession};
