//! Server-rendered HTML.
//!
//! [`pages`] builds complete documents, [`fragments`] builds the pieces htmx swaps
//! into them. Everything here is a pure function of model values; user-supplied
//! text always goes through [`html_escape`].

mod fragments;
pub mod messages;
mod pages;

pub use fragments::{login_form, note_article, notes_column};
pub use pages::{index_page, notes_page};

/// Escape text for use in HTML element content and quoted attributes.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
