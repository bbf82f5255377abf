use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;
use tripay_tools::TripayApi;
use warung_engine::{AdminApi, InventoryApi, ReconciliationApi, SqliteDatabase};

use crate::{
    config::{CheckoutUrls, ServerConfig},
    errors::ServerError,
    integrations::TelegramApi,
    middleware::CallbackSignatureFactory,
    routes::{health, telegram_update, tripay_callback},
};

pub const CALLBACK_SIGNATURE_HEADER: &str = "X-Callback-Signature";

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if let Some(admin) = &config.seed_admin {
        AdminApi::new(db.clone()).add_admin(admin).await?;
        info!("👑️ Seed administrator [{admin}] is registered");
    }
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let telegram = TelegramApi::new(&config.telegram).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let tripay = TripayApi::new(config.tripay.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let urls = CheckoutUrls::from_config(&config);
    let srv = HttpServer::new(move || {
        let reconciliation_api = ReconciliationApi::new(db.clone());
        let inventory_api = InventoryApi::new(db.clone());
        let admin_api = AdminApi::new(db.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("warung::access_log"))
            .app_data(web::Data::new(reconciliation_api))
            .app_data(web::Data::new(inventory_api))
            .app_data(web::Data::new(admin_api))
            .app_data(web::Data::new(telegram.clone()))
            .app_data(web::Data::new(tripay.clone()))
            .app_data(web::Data::new(urls.clone()));
        // The signature check wraps only the gateway callback; Telegram authenticates by keeping
        // the webhook path secret.
        let callback_scope = web::scope("/tripay-callback")
            .wrap(CallbackSignatureFactory::new(CALLBACK_SIGNATURE_HEADER, config.tripay.private_key.clone()))
            .route("", web::post().to(tripay_callback::<SqliteDatabase>));
        app.service(health)
            .service(callback_scope)
            .route("/telegram-update", web::post().to(telegram_update::<SqliteDatabase>))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
