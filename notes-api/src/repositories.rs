use crate::endpoints::{
    auth::{Credentials, Login, Refresh, Register},
    notes::{CreateNote, DeleteNote, GetNote, ListSharedNotes, NoteId, SearchNotes, UpdateNote},
    public_links::{CreatePublicLink, DeletePublicLink, GetPublicNote, ListPublicLinks, PublicLinkId},
    shares::{ListShares, RemoveShare, ShareId, ShareWithUser},
};
use secrecy::SecretString;

pub struct AuthRepository;

impl AuthRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn register(&self, email: impl Into<String>, password: SecretString) -> Register {
        Register::new(Credentials::new(email, password))
    }

    pub fn login(&self, email: impl Into<String>, password: SecretString) -> Login {
        Login::new(Credentials::new(email, password))
    }

    pub fn refresh(&self, refresh_token: impl Into<String>) -> Refresh {
        Refresh::new(refresh_token)
    }
}

pub struct NoteRepository;

impl NoteRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn search(&self) -> SearchNotes {
        SearchNotes::new()
    }

    pub fn shared(&self) -> ListSharedNotes {
        ListSharedNotes::new()
    }

    pub fn get(&self, id: NoteId) -> GetNote {
        GetNote::new(id)
    }

    pub fn create(&self, title: impl Into<String>, content_md: impl Into<String>) -> CreateNote {
        CreateNote::new(title, content_md)
    }

    pub fn update(&self, id: NoteId) -> UpdateNote {
        UpdateNote::new(id)
    }

    pub fn delete(&self, id: NoteId) -> DeleteNote {
        DeleteNote::new(id)
    }
}

pub struct ShareRepository;

impl ShareRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn with_user(&self, note_id: NoteId, email: impl Into<String>) -> ShareWithUser {
        ShareWithUser::new(note_id, email)
    }

    pub fn list(&self, note_id: NoteId) -> ListShares {
        ListShares::new(note_id)
    }

    pub fn remove(&self, share_id: ShareId) -> RemoveShare {
        RemoveShare::new(share_id)
    }
}

pub struct PublicLinkRepository;

impl PublicLinkRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn create(&self, note_id: NoteId) -> CreatePublicLink {
        CreatePublicLink::new(note_id)
    }

    pub fn list(&self, note_id: NoteId) -> ListPublicLinks {
        ListPublicLinks::new(note_id)
    }

    pub fn delete(&self, link_id: PublicLinkId) -> DeletePublicLink {
        DeletePublicLink::new(link_id)
    }

    pub fn resolve(&self, url_token: impl Into<String>) -> GetPublicNote {
        GetPublicNote::new(url_token)
    }
}
