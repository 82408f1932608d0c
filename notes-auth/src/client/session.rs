use crate::client::auth_state::{AuthState, Subscription};
use crate::client::navigation::{Navigator, LOGIN_ROUTE};
use crate::client::token_storage::TokenStore;
use crate::common::CurrentUser;
use crate::error::AuthError;
use notes_api::endpoints::auth::AuthPayload;
use notes_api::pipeline::{CredentialSource, SessionTeardown};
use std::sync::Arc;

/// Owns the session lifecycle: the durable tokens, the broadcast of who is
/// signed in, and the redirect that follows a sign-out.
pub struct Session {
    tokens: Arc<TokenStore>,
    state: Arc<AuthState>,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    pub fn new(tokens: Arc<TokenStore>, state: Arc<AuthState>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            tokens,
            state,
            navigator,
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.state.latest()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(Option<&CurrentUser>) + Send + Sync + 'static,
    ) -> Subscription {
        self.state.subscribe(listener)
    }

    /// Store the tokens of a successful exchange, then announce the user.
    pub fn establish(&self, payload: &AuthPayload) -> Result<(), AuthError> {
        self.tokens
            .set_session(&payload.access_token, &payload.refresh_token, &payload.email)?;
        self.state.publish(Some(CurrentUser::new(&payload.email)));

        tracing::info!(email = %payload.email, "Session established");
        Ok(())
    }

    /// Clear the tokens, announce the absence of a user, go to login.
    ///
    /// Listeners are notified even if the session file could not be removed;
    /// the storage error is returned afterwards.
    pub fn end(&self) -> Result<(), AuthError> {
        let cleared = self.tokens.clear();
        self.state.publish(None);
        self.navigator.navigate(LOGIN_ROUTE);

        tracing::info!("Session ended");
        cleared
    }
}

impl CredentialSource for Session {
    fn access_token(&self) -> Option<String> {
        self.tokens.access_token()
    }
}

impl SessionTeardown for Session {
    fn session_expired(&self) {
        tracing::warn!("Server rejected the session credential, signing out");
        if let Err(e) = self.end() {
            tracing::error!("Failed to clear expired session: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNavigator(Mutex<Vec<String>>);

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str) {
            self.0.lock().unwrap().push(path.to_string());
        }
    }

    fn new_session(dir: &std::path::Path) -> (Session, Arc<RecordingNavigator>) {
        let tokens = Arc::new(TokenStore::open(dir, "http://localhost:8080/api/v1").unwrap());
        let state = Arc::new(AuthState::new(&tokens));
        let navigator = Arc::new(RecordingNavigator::default());
        (Session::new(tokens, state, navigator.clone()), navigator)
    }

    fn payload() -> AuthPayload {
        AuthPayload {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            token_type: "Bearer".to_string(),
            email: "u@x.com".to_string(),
        }
    }

    #[test]
    fn test_establish_stores_then_publishes() {
        let dir = tempfile::tempdir().unwrap();
        let (session, _) = new_session(dir.path());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = session.subscribe(move |u| sink.lock().unwrap().push(u.cloned()));

        session.establish(&payload()).unwrap();

        assert!(session.is_authenticated());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some(CurrentUser::new("u@x.com"))]
        );
        assert_eq!(
            CredentialSource::access_token(&session),
            Some("a".to_string())
        );
    }

    #[test]
    fn test_teardown_clears_publishes_and_redirects() {
        let dir = tempfile::tempdir().unwrap();
        let (session, navigator) = new_session(dir.path());
        session.establish(&payload()).unwrap();

        session.session_expired();

        assert!(!session.is_authenticated());
        assert_eq!(session.current_user(), None);
        assert_eq!(*navigator.0.lock().unwrap(), vec![LOGIN_ROUTE.to_string()]);
    }

    #[test]
    fn test_end_clears_store_before_announcing_and_redirects_last() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = Arc::new(TokenStore::open(dir.path(), "http://localhost:8080/api/v1").unwrap());
        let state = Arc::new(AuthState::new(&tokens));
        let navigator = Arc::new(RecordingNavigator::default());
        let session = Session::new(tokens.clone(), state, navigator.clone());
        session.establish(&payload()).unwrap();

        // (user, store signed in, redirects so far) at each announcement
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (sink, store, nav) = (seen.clone(), tokens.clone(), navigator.clone());
        let _sub = session.subscribe(move |u| {
            let redirects = nav.0.lock().unwrap().len();
            sink.lock()
                .unwrap()
                .push((u.cloned(), store.is_authenticated(), redirects));
        });

        session.end().unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (Some(CurrentUser::new("u@x.com")), true, 0),
                (None, false, 0),
            ]
        );
        assert_eq!(*navigator.0.lock().unwrap(), vec![LOGIN_ROUTE.to_string()]);
    }

    #[test]
    fn test_repeated_teardown_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let (session, _) = new_session(dir.path());
        session.establish(&payload()).unwrap();

        session.session_expired();
        session.session_expired();

        assert!(!session.is_authenticated());
        assert_eq!(session.tokens().refresh_token(), None);
        assert_eq!(session.current_user(), None);
    }
}
