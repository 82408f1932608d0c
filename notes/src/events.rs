use notes_api::endpoints::notes::{NoteId, Visibility};
use notes_api::endpoints::public_links::PublicLinkId;
use notes_api::endpoints::shares::ShareId;
use secrecy::SecretString;

/// A single field change for `edit`.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteChange {
    Title(String),
    Content(String),
    Visibility(Visibility),
    Tags(Vec<String>),
}

/// Commands produced by the shell's line parser.
#[derive(Debug)]
pub enum AppCommand {
    // Session
    Register {
        email: String,
        password: SecretString,
    },
    Login {
        email: String,
        password: SecretString,
    },
    Logout,
    Refresh,
    WhoAmI,

    // Navigation
    Go(String),

    // Notes
    ListNotes {
        query: Option<String>,
    },
    ListShared {
        query: Option<String>,
    },
    ShowNote(NoteId),
    CreateNote {
        title: String,
        content_md: String,
        tags: Vec<String>,
    },
    EditNote {
        id: NoteId,
        change: NoteChange,
    },
    DeleteNote(NoteId),

    // Sharing
    Share {
        note_id: NoteId,
        email: String,
    },
    ListShares(NoteId),
    Unshare(ShareId),
    Publish(NoteId),
    ListLinks(NoteId),
    Unlink(PublicLinkId),
    ViewPublic(String),

    Help,
    Quit,
}
