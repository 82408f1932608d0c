use crate::commands::{execute_command, Flow};
use crate::context::AppContext;
use crate::input::parse_command;
use crate::logging;
use anyhow::Result;
use notes_api::pipeline::ReqwestTransport;
use notes_auth::{CurrentUser, Settings};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

pub struct App {
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub async fn run(self) -> Result<()> {
        let (log_path, _guard) = logging::init_logging()?;
        tracing::info!("Starting notes, logging to {}", log_path.display());

        let storage_dir = self
            .settings
            .storage_dir()
            .ok_or(anyhow::anyhow!("Could not determine storage directory"))?;
        let transport = ReqwestTransport::with_timeout(self.settings.request_timeout())?;
        let ctx = AppContext::new(&storage_dir, &self.settings.api_url, transport)?;

        let _auth_log = ctx.auth.subscribe(log_auth_transition);
        ctx.router.go("/")?;

        let mut out = std::io::stdout();
        writeln!(out, "Notes ({}). Type 'help' for commands.", self.settings.api_url)?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            write!(out, "{}", prompt(&ctx))?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match parse_command(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => {
                    if execute_command(command, &ctx, &mut out).await? == Flow::Quit {
                        break;
                    }
                }
                Err(usage) => writeln!(out, "{}", usage)?,
            }

            for toast in ctx.notifications.drain() {
                writeln!(out, "{}", toast)?;
            }
        }

        tracing::info!("Shutting down");
        Ok(())
    }
}

fn prompt(ctx: &AppContext) -> String {
    let user = ctx
        .auth
        .current_user()
        .map(|u| u.email)
        .unwrap_or_else(|| "guest".to_string());
    let location = ctx
        .router
        .current()
        .map(|route| route.to_string())
        .unwrap_or_default();

    format!("{} {}> ", user, location)
}

fn log_auth_transition(user: Option<&CurrentUser>) {
    match user {
        Some(user) => tracing::info!(email = %user.email, "Auth state: signed in"),
        None => tracing::info!("Auth state: signed out"),
    }
}
