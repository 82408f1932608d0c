use crate::client::auth_state::Subscription;
use crate::client::session::Session;
use crate::common::CurrentUser;
use crate::error::AuthError;
use notes_api::endpoints::auth::AuthResponse;
use notes_api::{Client, Request, SecretString};
use std::sync::Arc;

/// Drives the auth exchanges and keeps the session in step with them.
pub struct AuthClient {
    api: Client,
    session: Arc<Session>,
}

impl AuthClient {
    pub fn new(api: Client, session: Arc<Session>) -> Self {
        Self { api, session }
    }

    pub async fn register(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<AuthResponse, AuthError> {
        let req = Request::auth().register(email, password);
        let resp = self.api.send(req).await?;
        self.handle_auth_response(&resp)?;
        Ok(resp)
    }

    pub async fn login(&self, email: &str, password: SecretString) -> Result<AuthResponse, AuthError> {
        let req = Request::auth().login(email, password);
        let resp = self.api.send(req).await?;
        self.handle_auth_response(&resp)?;
        Ok(resp)
    }

    /// Exchange the stored refresh token for a new session. Fails without
    /// contacting the server when no refresh token is stored.
    pub async fn refresh_token(&self) -> Result<AuthResponse, AuthError> {
        let refresh_token = self
            .session
            .tokens()
            .refresh_token()
            .ok_or(AuthError::NoSession)?;

        let req = Request::auth().refresh(refresh_token);
        let resp = self.api.send(req).await?;
        self.handle_auth_response(&resp)?;
        Ok(resp)
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.end()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.session.current_user()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(Option<&CurrentUser>) + Send + Sync + 'static,
    ) -> Subscription {
        self.session.subscribe(listener)
    }

    fn handle_auth_response(&self, resp: &AuthResponse) -> Result<(), AuthError> {
        match &resp.data {
            Some(payload) => self.session.establish(payload),
            None => {
                tracing::warn!(status = resp.status, "Auth response carried no tokens");
                Ok(())
            }
        }
    }
}
