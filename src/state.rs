use crate::config::Config;
use crate::db::DbPool;
use crate::mail::Mailer;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
    pub mailer: Arc<dyn Mailer>,
}
