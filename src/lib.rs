pub mod app;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod errors;
pub mod event_store;
pub mod handlers;
pub mod history;
pub mod locale;
pub mod migrate;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod timezone;
pub mod transfer;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use event_store::EventStore;
pub use state::AppState;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
