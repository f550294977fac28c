use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer};

use actix_session::config::{PersistentSession, TtlExtensionPolicy};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;

use sqlx::mysql::MySqlPoolOptions;

use market_server::config::Config;
use market_server::db::MySqlStore;
use market_server::routes::{self, AppState};
use market_server::Error;

#[actix_web::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()?;

    let db_pool = MySqlPoolOptions::new()
        .connect(&config.database_url)
        .await?;

    let app_state = AppState {
        store: Arc::new(MySqlStore::new(db_pool)),
    };
    let secret_key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;

    log::info!("Listening on {}:{}", config.ip, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(Logger::new("%a \"%r\" %s %T"))
            .configure(routes::configure)
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(cookie_secure)
                    .session_lifecycle(
                        PersistentSession::default()
                            .session_ttl_extension_policy(TtlExtensionPolicy::OnEveryRequest),
                    )
                    .build(),
            )
            .default_service(web::route().to(|| async { HttpResponse::NotFound().finish() }))
    })
    .bind((config.ip.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
