use crate::notifications::Notifications;
use crate::router::Router;
use anyhow::Result;
use notes_api::pipeline::{AttachCredentials, ClassifyErrors, Pipeline, Transport};
use notes_api::Client;
use notes_auth::{AuthClient, AuthState, Session, TokenStore};
use std::path::Path;
use std::sync::Arc;

/// Every long-lived service of the application, wired once.
///
/// Request order through the pipeline is credential attachment first, then
/// error classification directly above the transport.
pub struct AppContext {
    pub tokens: Arc<TokenStore>,
    pub auth_state: Arc<AuthState>,
    pub router: Arc<Router>,
    pub notifications: Arc<Notifications>,
    pub session: Arc<Session>,
    pub api: Client,
    pub auth: AuthClient,
}

impl AppContext {
    pub fn new(storage_dir: &Path, api_url: &str, transport: impl Transport + 'static) -> Result<Self> {
        let tokens = Arc::new(TokenStore::open(storage_dir, api_url)?);
        let auth_state = Arc::new(AuthState::new(&tokens));
        let router = Arc::new(Router::new(tokens.clone()));
        let notifications = Arc::new(Notifications::new());
        let session = Arc::new(Session::new(
            tokens.clone(),
            auth_state.clone(),
            router.clone(),
        ));

        let pipeline = Pipeline::new(transport)
            .with(AttachCredentials::new(session.clone()))
            .with(ClassifyErrors::new(session.clone(), notifications.clone()));
        let api = Client::new(api_url, pipeline);
        let auth = AuthClient::new(api.clone(), session.clone());

        tracing::info!(
            api_url,
            session_file = %tokens.path().display(),
            signed_in = tokens.is_authenticated(),
            "Application context ready"
        );

        Ok(Self {
            tokens,
            auth_state,
            router,
            notifications,
            session,
            api,
            auth,
        })
    }
}
