//! User-facing texts shown by the login form.

pub const INVALID_CREDENTIALS: &str = "Пользователь с введёнными логином или паролем не найден";
pub const USERNAME_TAKEN: &str = "Пользователь с таким именем уже существует";
pub const EMPTY_CREDENTIALS: &str = "Заполните имя пользователя и пароль";
pub const SERVER_ERROR: &str =
    "Произошла ошибка сервера при проверке пользователя, попробуйте позже";
