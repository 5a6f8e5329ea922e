use crate::errors::AppError;
use crate::event_store::EventStore;
use crate::locale::DisplayLocale;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<EventStore>>,
    pub locale: DisplayLocale,
    pub default_user: String,
}

impl AppState {
    pub fn new(store: EventStore, locale: DisplayLocale, default_user: impl Into<String>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            locale,
            default_user: default_user.into(),
        }
    }

    /// Runs `f` against the locked store on the blocking pool, since every
    /// store call may touch the filesystem.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut EventStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&mut store.blocking_lock()))
            .await
            .map_err(AppError::internal)
    }
}
