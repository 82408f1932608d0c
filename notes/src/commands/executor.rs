use crate::context::AppContext;
use crate::events::{AppCommand, NoteChange};
use crate::input::HELP;
use crate::router::Route;
use anyhow::Result;
use notes_api::endpoints::notes::{Note, NotesResponse};
use notes_api::pipeline::Notifier;
use notes_api::{ApiError, Request};
use notes_auth::{AuthError, HOME_ROUTE};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Execute one command, writing its output to `out`.
///
/// Request failures never end the shell. HTTP failures were already turned
/// into a toast by the pipeline; anything else becomes one here.
pub async fn execute_command<W: Write>(
    command: AppCommand,
    ctx: &AppContext,
    out: &mut W,
) -> Result<Flow> {
    if matches!(command, AppCommand::Quit) {
        return Ok(Flow::Quit);
    }

    if let Err(e) = run(command, ctx, out).await {
        if notified_by_pipeline(&e) {
            tracing::debug!("Command failed: {:#}", e);
        } else {
            tracing::warn!("Command failed: {:#}", e);
            ctx.notifications.error("Error", &format!("{:#}", e));
        }
    }

    Ok(Flow::Continue)
}

fn notified_by_pipeline(err: &anyhow::Error) -> bool {
    let api = match err.downcast_ref::<AuthError>() {
        Some(AuthError::Api(e)) => Some(e),
        _ => err.downcast_ref::<ApiError>(),
    };
    matches!(api, Some(ApiError::Http(_)))
}

/// Navigate to `route`. False when a guard sent us elsewhere.
fn enter<W: Write>(ctx: &AppContext, route: Route, out: &mut W) -> Result<bool> {
    let landed = ctx.router.go(&route.to_string())?;
    if landed != route {
        writeln!(out, "Redirected to {}", landed)?;
        return Ok(false);
    }
    Ok(true)
}

async fn run<W: Write>(command: AppCommand, ctx: &AppContext, out: &mut W) -> Result<()> {
    match command {
        AppCommand::Register { email, password } => {
            if !enter(ctx, Route::Register, out)? {
                return Ok(());
            }
            ctx.auth.register(&email, password).await?;
            ctx.notifications
                .success("Welcome", "Registration successful!");
            ctx.router.go(HOME_ROUTE)?;
            writeln!(out, "Signed in as {}", email)?;
        }

        AppCommand::Login { email, password } => {
            if !enter(ctx, Route::Login, out)? {
                return Ok(());
            }
            ctx.auth.login(&email, password).await?;
            ctx.notifications.success("Welcome", "Login successful!");
            ctx.router.go(HOME_ROUTE)?;
            writeln!(out, "Signed in as {}", email)?;
        }

        AppCommand::Logout => {
            ctx.auth.logout()?;
            ctx.notifications.info("Signed out", "You have been logged out.");
        }

        AppCommand::Refresh => {
            ctx.auth.refresh_token().await?;
            writeln!(out, "Session refreshed")?;
        }

        AppCommand::WhoAmI => match ctx.auth.current_user() {
            Some(user) => writeln!(out, "{}", user.email)?,
            None => writeln!(out, "Not signed in")?,
        },

        AppCommand::Go(path) => {
            let route = ctx.router.go(&path)?;
            writeln!(out, "At {}", route)?;
        }

        AppCommand::ListNotes { query } => {
            if !enter(ctx, Route::NoteList, out)? {
                return Ok(());
            }
            let mut req = Request::notes().search();
            if let Some(query) = query {
                req = req.query(query);
            }
            let resp = ctx.api.send(req).await?;
            print_notes(&resp, out)?;
        }

        AppCommand::ListShared { query } => {
            if !enter(ctx, Route::NoteList, out)? {
                return Ok(());
            }
            let mut req = Request::notes().shared();
            if let Some(query) = query {
                req = req.query(query);
            }
            let resp = ctx.api.send(req).await?;
            print_notes(&resp, out)?;
        }

        AppCommand::ShowNote(id) => {
            if !enter(ctx, Route::NoteDetail(id), out)? {
                return Ok(());
            }
            match ctx.api.send(Request::notes().get(id)).await {
                Ok(resp) => match resp.data {
                    Some(note) => print_note(&note, out)?,
                    None => writeln!(out, "Note {} has no content", id)?,
                },
                Err(e) => {
                    // The pipeline already reported the cause
                    tracing::debug!(id, "Failed to load note: {}", e);
                    ctx.notifications.error("Error", "Failed to load note");
                    ctx.router.go(HOME_ROUTE)?;
                }
            }
        }

        AppCommand::CreateNote {
            title,
            content_md,
            tags,
        } => {
            if !enter(ctx, Route::NewNote, out)? {
                return Ok(());
            }
            let resp = ctx
                .api
                .send(Request::notes().create(title, content_md).tags(tags))
                .await?;
            if let Some(note) = resp.data {
                ctx.notifications.success("Saved", "Note created");
                ctx.router.go(&Route::NoteDetail(note.id).to_string())?;
                writeln!(out, "Created note #{}", note.id)?;
            }
        }

        AppCommand::EditNote { id, change } => {
            if !enter(ctx, Route::EditNote(id), out)? {
                return Ok(());
            }
            let req = Request::notes().update(id);
            let req = match change {
                NoteChange::Title(title) => req.title(title),
                NoteChange::Content(content) => req.content_md(content),
                NoteChange::Visibility(visibility) => req.visibility(visibility),
                NoteChange::Tags(tags) => req.tags(tags),
            };
            ctx.api.send(req).await?;
            ctx.notifications.success("Saved", "Note updated");
            ctx.router.go(&Route::NoteDetail(id).to_string())?;
        }

        AppCommand::DeleteNote(id) => {
            if !enter(ctx, Route::NoteDetail(id), out)? {
                return Ok(());
            }
            ctx.api.send(Request::notes().delete(id)).await?;
            ctx.notifications.success("Deleted", "Note deleted");
            ctx.router.go(HOME_ROUTE)?;
        }

        AppCommand::Share { note_id, email } => {
            if !enter(ctx, Route::NoteDetail(note_id), out)? {
                return Ok(());
            }
            let resp = ctx
                .api
                .send(Request::shares().with_user(note_id, email.as_str()))
                .await?;
            if let Some(share) = resp.data {
                writeln!(out, "Shared with {} (share #{})", share.shared_with_email, share.id)?;
            }
        }

        AppCommand::ListShares(note_id) => {
            if !enter(ctx, Route::NoteDetail(note_id), out)? {
                return Ok(());
            }
            let resp = ctx.api.send(Request::shares().list(note_id)).await?;
            let shares = resp.data.unwrap_or_default();
            if shares.is_empty() {
                writeln!(out, "Not shared with anyone")?;
            }
            for share in shares {
                writeln!(out, "#{} {} {:?}", share.id, share.shared_with_email, share.permission)?;
            }
        }

        AppCommand::Unshare(share_id) => {
            if !enter(ctx, Route::NoteList, out)? {
                return Ok(());
            }
            ctx.api.send(Request::shares().remove(share_id)).await?;
            ctx.notifications.success("Removed", "Share removed");
        }

        AppCommand::Publish(note_id) => {
            if !enter(ctx, Route::NoteDetail(note_id), out)? {
                return Ok(());
            }
            let resp = ctx.api.send(Request::public_links().create(note_id)).await?;
            if let Some(link) = resp.data {
                writeln!(out, "{}", link.public_url)?;
            }
        }

        AppCommand::ListLinks(note_id) => {
            if !enter(ctx, Route::NoteDetail(note_id), out)? {
                return Ok(());
            }
            let resp = ctx.api.send(Request::public_links().list(note_id)).await?;
            let links = resp.data.unwrap_or_default();
            if links.is_empty() {
                writeln!(out, "No public links")?;
            }
            for link in links {
                match link.expires_at {
                    Some(expires_at) => writeln!(
                        out,
                        "#{} {} (expires {})",
                        link.id, link.public_url, expires_at
                    )?,
                    None => writeln!(out, "#{} {}", link.id, link.public_url)?,
                }
            }
        }

        AppCommand::Unlink(link_id) => {
            if !enter(ctx, Route::NoteList, out)? {
                return Ok(());
            }
            ctx.api.send(Request::public_links().delete(link_id)).await?;
            ctx.notifications.success("Removed", "Public link deleted");
        }

        AppCommand::ViewPublic(token) => {
            ctx.router.go(&Route::PublicNote(token.clone()).to_string())?;
            let resp = ctx.api.send(Request::public_links().resolve(token)).await?;
            if let Some(note) = resp.data {
                print_note(&note, out)?;
            }
        }

        AppCommand::Help => writeln!(out, "{}", HELP)?,

        AppCommand::Quit => {}
    }

    Ok(())
}

fn print_notes<W: Write>(resp: &NotesResponse, out: &mut W) -> Result<()> {
    let notes = resp.data.as_deref().unwrap_or_default();
    if notes.is_empty() {
        writeln!(out, "No notes")?;
    }
    for note in notes {
        write!(out, "#{} {} [{}]", note.id, note.title, note.visibility)?;
        if !note.tags.is_empty() {
            write!(out, " {}", note.tags.join(", "))?;
        }
        writeln!(out)?;
    }
    if let Some(page) = resp.metadata {
        write!(
            out,
            "Page {}/{} ({} notes)",
            page.number + 1,
            page.total_pages.max(1),
            page.total_elements
        )?;
        if page.has_next() {
            write!(out, ", more available")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn print_note<W: Write>(note: &Note, out: &mut W) -> Result<()> {
    writeln!(out, "# {}", note.title)?;
    writeln!(
        out,
        "{} | {} | updated {}",
        note.owner_email,
        note.visibility,
        note.updated_at.format("%Y-%m-%d %H:%M")
    )?;
    if !note.tags.is_empty() {
        writeln!(out, "tags: {}", note.tags.join(", "))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", note.content_md)?;
    Ok(())
}
