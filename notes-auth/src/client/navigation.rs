/// Login entry point; where a torn-down session lands.
pub const LOGIN_ROUTE: &str = "/auth/login";

/// Default landing area once signed in.
pub const HOME_ROUTE: &str = "/notes";

/// Moves the application to another route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}
