pub mod note;
pub mod sqlite;

pub use note::{NewNote, NoteFields, NoteRecord, DEFAULT_TITLE, FALLBACK_TITLE, FALLBACK_TRANSCRIPT, PROCESSING};
pub use sqlite::NoteStore;
