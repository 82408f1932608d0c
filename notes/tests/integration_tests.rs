use notes::router::Route;
use notes::testing::TestApp;
use notes_api::pipeline::{NOT_FOUND, SESSION_EXPIRED};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn auth_body(email: &str) -> serde_json::Value {
    json!({
        "status": 200,
        "data": {
            "accessToken": "fresh-access",
            "refreshToken": "fresh-refresh",
            "tokenType": "Bearer",
            "email": email
        },
        "message": "Login successful"
    })
}

fn note_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "contentMd": "# Heading\nbody",
        "visibility": "PRIVATE",
        "ownerEmail": "u@x.com",
        "tags": ["rust"],
        "createdAt": "2024-05-01T10:00:00",
        "updatedAt": "2024-05-02T11:30:00"
    })
}

fn toast_messages(app: &TestApp) -> Vec<String> {
    app.toasts().into_iter().map(|t| t.message).collect()
}

#[tokio::test]
async fn test_signed_out_user_cannot_reach_notes() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = TestApp::new(dir.path());

    let output = app.run("notes").await;

    assert_eq!(output.trim(), "Redirected to /auth/login");
    assert_eq!(app.location(), Some(Route::Login));
    assert!(app.transport.requests().is_empty());
}

#[tokio::test]
async fn test_signed_in_user_skips_login() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = TestApp::signed_in(dir.path(), "u@x.com");

    let output = app.run("login other@x.com secret").await;

    assert_eq!(output.trim(), "Redirected to /notes");
    assert_eq!(app.location(), Some(Route::NoteList));
    assert!(app.transport.requests().is_empty());
}

#[tokio::test]
async fn test_login_then_list_notes_with_credential() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = TestApp::new(dir.path());
    app.transport.push_json(200, auth_body("u@x.com"));
    app.transport.push_json(
        200,
        json!({
            "status": 200,
            "data": [note_json(1, "First"), note_json(2, "Second")],
            "metadata": {"size": 10, "totalElements": 2, "totalPages": 1, "number": 0}
        }),
    );

    let output = app.run("login u@x.com password123").await;
    assert!(output.contains("Signed in as u@x.com"));
    assert!(app.is_signed_in());
    assert_eq!(app.location(), Some(Route::NoteList));
    assert_eq!(toast_messages(&app), vec!["Login successful!"]);

    let output = app.run("notes").await;
    assert!(output.contains("#1 First [PRIVATE] rust"));
    assert!(output.contains("#2 Second"));
    assert!(output.contains("Page 1/1 (2 notes)"));

    let sent = app.transport.requests();
    assert!(sent[0].headers.get("authorization").is_none());
    assert_eq!(
        sent[1].headers.get("authorization").unwrap().to_str().unwrap(),
        "Bearer fresh-access"
    );
}

#[tokio::test]
async fn test_rejected_credential_signs_out_and_redirects() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = TestApp::signed_in(dir.path(), "u@x.com");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _subscription = app
        .ctx
        .auth
        .subscribe(move |user| sink.lock().unwrap().push(user.cloned()));
    app.transport.push_json(401, json!({"status": 401, "message": "Token expired"}));

    app.run("notes").await;

    assert!(!app.is_signed_in());
    assert_eq!(app.location(), Some(Route::Login));
    assert_eq!(app.ctx.tokens.refresh_token(), None);
    assert_eq!(app.ctx.tokens.user_email(), None);
    // One toast: the pipeline's, not a second one from the shell
    assert_eq!(toast_messages(&app), vec![SESSION_EXPIRED]);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![Some(notes_auth::CurrentUser::new("u@x.com")), None]
    );

    // Still signed out: the next attempt is stopped by the guard
    let output = app.run("notes").await;
    assert_eq!(output.trim(), "Redirected to /auth/login");
    assert_eq!(app.transport.requests().len(), 1);
}

#[tokio::test]
async fn test_public_note_is_fetched_without_credential() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = TestApp::signed_in(dir.path(), "u@x.com");
    app.transport
        .push_json(200, json!({"status": 200, "data": note_json(9, "Shared recipe")}));

    let output = app.run("public tok123").await;

    assert!(output.contains("# Shared recipe"));
    assert_eq!(app.location(), Some(Route::PublicNote("tok123".to_string())));
    let sent = app.transport.requests();
    assert!(sent[0].url.ends_with("/p/tok123"));
    assert!(sent[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_missing_note_goes_back_to_list() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = TestApp::signed_in(dir.path(), "u@x.com");
    app.transport.push_json(404, json!({"status": 404}));

    let output = app.run("show 42").await;

    assert!(output.is_empty());
    assert_eq!(app.location(), Some(Route::NoteList));
    assert_eq!(toast_messages(&app), vec![NOT_FOUND, "Failed to load note"]);
    assert!(app.is_signed_in());
}

#[tokio::test]
async fn test_create_note_opens_it() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = TestApp::signed_in(dir.path(), "u@x.com");
    app.transport
        .push_json(201, json!({"status": 201, "data": note_json(7, "Groceries")}));

    let output = app.run("new Groceries | - milk | home, errands").await;

    assert!(output.contains("Created note #7"));
    assert_eq!(app.location(), Some(Route::NoteDetail(7)));
    let sent = app.transport.requests();
    assert_eq!(
        sent[0].body,
        Some(json!({"title": "Groceries", "contentMd": "- milk", "tags": ["home", "errands"]}))
    );
}

#[tokio::test]
async fn test_network_failure_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = TestApp::signed_in(dir.path(), "u@x.com");
    app.transport.push_network_error("connection refused");

    app.run("shares 3").await;

    assert_eq!(toast_messages(&app), vec!["Error: connection refused"]);
    assert!(app.is_signed_in());
}

#[tokio::test]
async fn test_server_message_on_failed_share() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = TestApp::signed_in(dir.path(), "u@x.com");
    app.transport.push_json(
        400,
        json!({"status": 400, "message": "Cannot share a note with yourself"}),
    );

    app.run("share 3 u@x.com").await;

    assert_eq!(toast_messages(&app), vec!["Cannot share a note with yourself"]);
}

#[tokio::test]
async fn test_refresh_without_session_is_local() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = TestApp::new(dir.path());

    app.run("refresh").await;

    assert!(app.transport.requests().is_empty());
    let toasts = app.toasts();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].message.contains("No session"));
}

#[tokio::test]
async fn test_logout_and_quit() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = TestApp::signed_in(dir.path(), "u@x.com");

    app.run("logout").await;
    assert!(!app.is_signed_in());
    assert_eq!(app.location(), Some(Route::Login));
    assert_eq!(app.run("whoami").await.trim(), "Not signed in");

    app.run("quit").await;
    assert!(app.should_quit());
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut app = TestApp::new(dir.path());
        app.transport.push_json(200, auth_body("u@x.com"));
        app.run("login u@x.com password123").await;
    }

    let mut app = TestApp::new(dir.path());
    assert!(app.is_signed_in());
    assert_eq!(app.run("whoami").await.trim(), "u@x.com");
}

#[tokio::test]
async fn test_usage_errors_are_printed() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = TestApp::new(dir.path());

    assert!(app.run("show").await.starts_with("Usage: show <id>"));
    assert!(app.run("bogus").await.contains("Unknown command"));
}
