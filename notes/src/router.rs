use anyhow::{bail, Result};
use notes_api::endpoints::notes::NoteId;
use notes_auth::{Navigator, TokenStore, HOME_ROUTE, LOGIN_ROUTE};
use std::fmt::Display;
use std::sync::{Arc, Mutex};

const MAX_REDIRECTS: usize = 8;

/// Screens the application can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    NoteList,
    NewNote,
    NoteDetail(NoteId),
    EditNote(NoteId),
    PublicNote(String),
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Login => f.write_str("/auth/login"),
            Route::Register => f.write_str("/auth/register"),
            Route::NoteList => f.write_str("/notes"),
            Route::NewNote => f.write_str("/notes/new"),
            Route::NoteDetail(id) => write!(f, "/notes/{}", id),
            Route::EditNote(id) => write!(f, "/notes/{}/edit", id),
            Route::PublicNote(token) => write!(f, "/p/{}", token),
        }
    }
}

/// Which guard, if any, protects a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Area {
    Unauthenticated,
    Authenticated,
    Public,
}

enum Resolution {
    Render(Route, Area),
    Redirect(String),
}

fn resolve(path: &str) -> Resolution {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [] => Resolution::Redirect(HOME_ROUTE.to_string()),
        ["auth"] => Resolution::Redirect(LOGIN_ROUTE.to_string()),
        ["auth", "login"] => Resolution::Render(Route::Login, Area::Unauthenticated),
        ["auth", "register"] => Resolution::Render(Route::Register, Area::Unauthenticated),
        ["notes"] => Resolution::Render(Route::NoteList, Area::Authenticated),
        ["notes", "new"] => Resolution::Render(Route::NewNote, Area::Authenticated),
        ["notes", id] => match id.parse() {
            Ok(id) => Resolution::Render(Route::NoteDetail(id), Area::Authenticated),
            Err(_) => Resolution::Redirect(HOME_ROUTE.to_string()),
        },
        ["notes", id, "edit"] => match id.parse() {
            Ok(id) => Resolution::Render(Route::EditNote(id), Area::Authenticated),
            Err(_) => Resolution::Redirect(HOME_ROUTE.to_string()),
        },
        ["p", token] => Resolution::Render(Route::PublicNote(token.to_string()), Area::Public),
        _ => Resolution::Redirect(HOME_ROUTE.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(String),
}

/// Decides, at navigation time, whether a route may be entered.
pub trait Guard: Send + Sync {
    fn can_enter(&self, target: &str) -> Decision;
}

/// Lets only signed-in users through; everyone else goes to login.
pub struct AuthGuard {
    tokens: Arc<TokenStore>,
}

impl AuthGuard {
    pub fn new(tokens: Arc<TokenStore>) -> Self {
        Self { tokens }
    }
}

impl Guard for AuthGuard {
    fn can_enter(&self, target: &str) -> Decision {
        if self.tokens.is_authenticated() {
            Decision::Allow
        } else {
            tracing::debug!(path = target, "Not signed in, redirecting to login");
            Decision::Redirect(LOGIN_ROUTE.to_string())
        }
    }
}

/// Keeps signed-in users out of the login and register screens.
pub struct NoAuthGuard {
    tokens: Arc<TokenStore>,
}

impl NoAuthGuard {
    pub fn new(tokens: Arc<TokenStore>) -> Self {
        Self { tokens }
    }
}

impl Guard for NoAuthGuard {
    fn can_enter(&self, target: &str) -> Decision {
        if self.tokens.is_authenticated() {
            tracing::debug!(path = target, "Already signed in, redirecting home");
            Decision::Redirect(HOME_ROUTE.to_string())
        } else {
            Decision::Allow
        }
    }
}

/// Resolves paths to routes, consults the guards and records where the
/// application currently is.
pub struct Router {
    auth_guard: AuthGuard,
    no_auth_guard: NoAuthGuard,
    location: Mutex<Option<Route>>,
}

impl Router {
    pub fn new(tokens: Arc<TokenStore>) -> Self {
        Self {
            auth_guard: AuthGuard::new(tokens.clone()),
            no_auth_guard: NoAuthGuard::new(tokens),
            location: Mutex::new(None),
        }
    }

    pub fn current(&self) -> Option<Route> {
        self.location
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Navigate to `path`, following redirects, and commit the final route.
    pub fn go(&self, path: &str) -> Result<Route> {
        let mut target = path.to_string();

        for _ in 0..MAX_REDIRECTS {
            let (route, area) = match resolve(&target) {
                Resolution::Render(route, area) => (route, area),
                Resolution::Redirect(next) => {
                    target = next;
                    continue;
                }
            };

            let decision = match area {
                Area::Authenticated => self.auth_guard.can_enter(&target),
                Area::Unauthenticated => self.no_auth_guard.can_enter(&target),
                Area::Public => Decision::Allow,
            };

            match decision {
                Decision::Allow => {
                    tracing::debug!(requested = path, route = %route, "Navigated");
                    *self.location.lock().unwrap_or_else(|e| e.into_inner()) = Some(route.clone());
                    return Ok(route);
                }
                Decision::Redirect(next) => target = next,
            }
        }

        bail!("Too many redirects while navigating to {}", path)
    }
}

impl Navigator for Router {
    fn navigate(&self, path: &str) {
        if let Err(e) = self.go(path) {
            tracing::error!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router(signed_in: bool) -> (tempfile::TempDir, Arc<TokenStore>, Router) {
        let dir = tempfile::tempdir().unwrap();
        let tokens = Arc::new(TokenStore::open(dir.path(), "http://localhost:8080/api/v1").unwrap());
        if signed_in {
            tokens.set_session("a", "r", "u@x.com").unwrap();
        }
        let router = Router::new(tokens.clone());
        (dir, tokens, router)
    }

    #[test]
    fn test_signed_out_user_is_sent_to_login() {
        let (_dir, _, router) = router(false);

        assert_eq!(router.go("/notes").unwrap(), Route::Login);
        assert_eq!(router.go("/notes/4/edit").unwrap(), Route::Login);
        assert_eq!(router.go("/").unwrap(), Route::Login);
        assert_eq!(router.current(), Some(Route::Login));
    }

    #[test]
    fn test_signed_in_user_is_kept_out_of_login() {
        let (_dir, _, router) = router(true);

        assert_eq!(router.go("/auth/login").unwrap(), Route::NoteList);
        assert_eq!(router.go("/auth/register").unwrap(), Route::NoteList);
        assert_eq!(router.go("/notes/4").unwrap(), Route::NoteDetail(4));
    }

    #[test]
    fn test_public_links_need_no_session() {
        let (_dir, _, router) = router(false);
        assert_eq!(
            router.go("/p/abc123").unwrap(),
            Route::PublicNote("abc123".to_string())
        );
    }

    #[test]
    fn test_unknown_paths_fall_back_home() {
        let (_dir, _, router) = router(true);
        assert_eq!(router.go("/nowhere").unwrap(), Route::NoteList);
        assert_eq!(router.go("/notes/abc").unwrap(), Route::NoteList);
        assert_eq!(router.go("/notes/new?draft=1").unwrap(), Route::NewNote);
    }

    #[test]
    fn test_guards_follow_the_store() {
        let (_dir, tokens, router) = router(true);
        assert_eq!(router.auth_guard.can_enter("/notes"), Decision::Allow);

        tokens.clear().unwrap();
        assert_eq!(
            router.auth_guard.can_enter("/notes"),
            Decision::Redirect(LOGIN_ROUTE.to_string())
        );
        assert_eq!(router.no_auth_guard.can_enter("/auth/login"), Decision::Allow);
    }

    #[test]
    fn test_route_paths_round_trip() {
        let (_dir, _, router) = router(true);
        for route in [Route::NoteList, Route::NewNote, Route::NoteDetail(9), Route::EditNote(9)] {
            assert_eq!(router.go(&route.to_string()).unwrap(), route);
        }
    }
}
