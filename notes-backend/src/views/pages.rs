use crate::models::Note;

use super::fragments::{NOTES_COLUMN_ID, login_form, notes_column};

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.12";
const BULMA_HREF: &str = "https://cdn.jsdelivr.net/npm/bulma@0.9.4/css/bulma.min.css";

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <link rel="stylesheet" href="{BULMA_HREF}">
    <link rel="stylesheet" href="/static/styles.css">
    <script src="{HTMX_SRC}"></script>
</head>
<body>
{body}
</body>
</html>"#
    )
}

/// Landing page with the login/signup form
pub fn index_page() -> String {
    let body = format!(
        r#"<section class="section">
    <div class="container">
        <div class="columns is-centered">
            <div class="column is-one-third">
                <h1 class="title">Заметки</h1>
                {form}
            </div>
        </div>
    </div>
</section>"#,
        form = login_form(None)
    );
    layout("Заметки", &body)
}

/// The logged-in page: filter box, logout button and the notes column
pub fn notes_page(notes: &[Note]) -> String {
    let body = format!(
        r##"<section class="section">
    <div class="container">
        <nav class="level">
            <div class="level-left">
                <div class="level-item">
                    <h1 class="title">Мои заметки</h1>
                </div>
            </div>
            <div class="level-right">
                <div class="level-item">
                    <input class="input" type="search" name="filter-text" placeholder="Поиск"
                        hx-post="/filter-notes" hx-trigger="keyup changed delay:300ms, search"
                        hx-target="#{NOTES_COLUMN_ID}" hx-swap="outerHTML">
                </div>
                <div class="level-item">
                    <button class="button is-light" hx-post="/logout">Выйти</button>
                </div>
            </div>
        </nav>
        <div class="columns">
            {column}
        </div>
    </div>
</section>"##,
        column = notes_column(notes)
    );
    layout("Мои заметки", &body)
}
