use crate::{config::Config, services::ChatService, websocket::SessionRegistry};
use deadpool_postgres::Pool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool,
    pub registry: SessionRegistry,
    pub chat: Arc<ChatService>,
    pub config: Arc<Config>,
}
