// handlers/public/mod.rs - Handlers that need no session
//
// `/login` is public-only: the gate sends signed-in users home.
// `/health` and `/static/*` bypass the gate.
pub mod assets;
pub mod health;
pub mod login;

pub use assets::stylesheet;
pub use health::health;
pub use login::{login_page, login_submit};
