//! Table operations - each module contains `impl Database` blocks for one table.

mod auth_sessions;
mod notes;
mod users;
