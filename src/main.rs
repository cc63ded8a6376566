use actix_web::{web, App, HttpServer};
use chat_relay_service::{
    config, db, error, logging, routes,
    services::{ChatService, PgMessageStore, PgUserStore, TokenVerifier},
    state::AppState,
    websocket::SessionRegistry,
};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<(), error::AppError> {
    logging::init_tracing();
    let cfg = Arc::new(config::Config::from_env()?);

    let db = db::init_pool(&cfg.database_url).await?;

    let registry = SessionRegistry::new();
    let verifier = TokenVerifier::new(&cfg.jwt_secret);
    let chat = Arc::new(ChatService::new(
        registry.clone(),
        verifier,
        Arc::new(PgUserStore::new(db.clone())),
        Arc::new(PgMessageStore::new(db.clone())),
    ));

    let state = AppState {
        db,
        registry,
        chat,
        config: cfg.clone(),
    };

    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    tracing::info!(%bind_addr, "starting chat-relay-service");

    HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .service(routes::welcome::index)
            .service(routes::wsroute::ws_handler)
            .route("/health", web::get().to(|| async { "OK" }))
    })
    .bind(&bind_addr)
    .map_err(|e| error::AppError::StartServer(format!("bind: {e}")))?
    .run()
    .await
    .map_err(|e| error::AppError::StartServer(format!("run server: {e}")))
}
