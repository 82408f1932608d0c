use crate::commands::{execute_command, Flow};
use crate::context::AppContext;
use crate::input::parse_command;
use crate::notifications::Toast;
use crate::router::Route;
use notes_api::testing::ScriptedTransport;
use notes_api::DEFAULT_BASE_URL;
use std::path::Path;

/// Application wired to a scripted transport, for driving the shell from
/// tests without a server.
pub struct TestApp {
    pub transport: ScriptedTransport,
    pub ctx: AppContext,
    quit: bool,
}

impl TestApp {
    pub fn new(storage_dir: &Path) -> Self {
        let transport = ScriptedTransport::new();
        let ctx = AppContext::new(storage_dir, DEFAULT_BASE_URL, transport.clone())
            .expect("failed to build test context");

        Self {
            transport,
            ctx,
            quit: false,
        }
    }

    /// Start with a stored session, as if a previous run had signed in.
    pub fn signed_in(storage_dir: &Path, email: &str) -> Self {
        notes_auth::TokenStore::open(storage_dir, DEFAULT_BASE_URL)
            .and_then(|store| store.set_session("stored-access", "stored-refresh", email))
            .expect("failed to seed session");

        Self::new(storage_dir)
    }

    /// Run one shell line and return what it printed.
    pub async fn run(&mut self, line: &str) -> String {
        let mut out = Vec::new();

        match parse_command(line) {
            Ok(Some(command)) => {
                let flow = execute_command(command, &self.ctx, &mut out)
                    .await
                    .expect("command failed");
                self.quit = flow == Flow::Quit;
            }
            Ok(None) => {}
            Err(usage) => out.extend_from_slice(usage.as_bytes()),
        }

        String::from_utf8(out).expect("output is not UTF-8")
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.ctx.notifications.drain()
    }

    pub fn location(&self) -> Option<Route> {
        self.ctx.router.current()
    }

    pub fn is_signed_in(&self) -> bool {
        self.ctx.tokens.is_authenticated()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}
