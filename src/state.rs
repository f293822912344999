use std::sync::Arc;

use crate::config::Config;
use crate::db::DbPool;

/// Shared across requests. Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
}
