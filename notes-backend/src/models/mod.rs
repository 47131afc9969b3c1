mod note;
mod session;
mod user;

pub use note::{LEGACY_NOTE_TITLE, NewNote, Note};
pub use session::Session;
pub use user::User;
