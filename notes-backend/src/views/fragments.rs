use crate::models::Note;

use super::html_escape;

pub const NOTES_COLUMN_ID: &str = "notes-column";
pub const ADD_NOTE_ID: &str = "add-note";

/// Login/signup form, optionally with an error message above the buttons.
/// Login and signup swap the whole form with their answer on failure.
pub fn login_form(error: Option<&str>) -> String {
    let error_html = match error {
        Some(message) => format!(
            r#"<p class="help is-danger" role="alert">{}</p>"#,
            html_escape(message)
        ),
        None => String::new(),
    };

    format!(
        r#"<form id="login-form" class="box" hx-post="/login" hx-target="this" hx-swap="outerHTML">
    <div class="field">
        <label class="label" for="username">Имя пользователя</label>
        <div class="control">
            <input class="input" type="text" id="username" name="username" autocomplete="username" required>
        </div>
    </div>
    <div class="field">
        <label class="label" for="password">Пароль</label>
        <div class="control">
            <input class="input" type="password" id="password" name="password" autocomplete="current-password" required>
        </div>
    </div>
    {error_html}
    <div class="field is-grouped">
        <div class="control">
            <button class="button is-link" type="submit">Войти</button>
        </div>
        <div class="control">
            <button class="button is-light" type="button" hx-post="/signup" hx-include="closest form" hx-target="closest form" hx-swap="outerHTML">Зарегистрироваться</button>
        </div>
    </div>
</form>"#
    )
}

/// One note, escaped. An unreadable timestamp is shown as stored.
pub fn note_article(note: &Note) -> String {
    let created = match note.display_date() {
        Ok(date) => date,
        Err(e) => {
            log::warn!("[VIEWS] Note {}: {}", note.id, e);
            note.created_at.clone()
        }
    };

    format!(
        r#"<article class="message" id="note-{id}">
    <div class="message-header">
        <p>{title}</p>
        <time class="is-size-7">{created}</time>
    </div>
    <div class="message-body">{content}</div>
</article>"#,
        id = note.id,
        title = html_escape(&note.title),
        created = html_escape(&created),
        content = html_escape(&note.content),
    )
}

/// Input row for a new note. Submitted notes are inserted right before it.
pub fn add_note_control() -> String {
    format!(
        r##"<div id="{ADD_NOTE_ID}" class="box">
    <div class="field">
        <div class="control">
            <input class="input" type="text" name="title" placeholder="Заголовок">
        </div>
    </div>
    <div class="field">
        <div class="control">
            <textarea class="textarea" name="content" rows="3" placeholder="Новая заметка"></textarea>
        </div>
    </div>
    <div class="control">
        <button class="button is-info" hx-post="/add-note" hx-include="closest #{ADD_NOTE_ID}" hx-target="#{ADD_NOTE_ID}" hx-swap="beforebegin">
            Отправить
        </button>
    </div>
</div>"##
    )
}

/// The notes column: every note followed by the add-note control.
/// The filter endpoint swaps this element as a whole.
pub fn notes_column(notes: &[Note]) -> String {
    let mut html = format!(r#"<div id="{NOTES_COLUMN_ID}" class="column is-half scrollable-column">"#);
    for note in notes {
        html.push_str(&note_article(note));
        html.push('\n');
    }
    html.push_str(&add_note_control());
    html.push_str("</div>");
    html
}
