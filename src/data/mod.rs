pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::DataServiceError;
pub use models::{Credentials, CurrentSession, NewNote, Note, NoteChanges, Session, User};
pub use repository::{IdentityProvider, NotesRepository};
pub use service::DataService;
