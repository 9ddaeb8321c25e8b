use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: Store,
    pub config: Config,
}
