mod command;
mod event;
pub mod notify;
pub mod social;

pub use command::*;
pub use event::*;

#[derive(Clone)]
pub struct State {
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}
