//! Notes page application state: snapshots, actions, per-session stores
//! and the controller that talks to the collaborators.

pub mod controller;
pub mod state;
pub mod store;

pub use controller::NotesClient;
pub use state::{Action, Change, DialogKind, ListStatus, NotesState};
pub use store::{Store, ViewKey, ViewRegistry};
