use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use mongodb::Client;
use tracing_subscriber::EnvFilter;

use crate::auth::AuthSecret;
use crate::config::{Config, StoreBackend};
use crate::mongo::MongoExpenseStore;
use crate::store::{ExpenseStore, MemoryExpenseStore};

mod auth;
mod breakdown;
mod config;
mod error;
mod filter;
mod mongo;
mod routes;
mod schemas;
mod store;

fn cors(allowed_origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(3600);
    match allowed_origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors,
    }
}

async fn open_store(backend: &StoreBackend) -> anyhow::Result<Arc<dyn ExpenseStore>> {
    Ok(match backend {
        StoreBackend::Mongo { uri, database } => {
            let client = Client::with_uri_str(uri)
                .await
                .context("failed to connect to MongoDB")?;
            tracing::info!(%database, "using MongoDB expense store");
            Arc::new(MongoExpenseStore::new(&client, database))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory expense store, data is lost on shutdown");
            Arc::new(MemoryExpenseStore::default())
        }
    })
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // `expense-tracker token <user>` prints an Authorization value for that user
    let args: Vec<String> = std::env::args().collect();
    if let [_, command, user] = args.as_slice() {
        if command == "token" {
            println!("{}", auth::issue_token(user, &Config::auth_secret()?));
            return Ok(());
        }
    }

    let config = Config::from_env()?;
    let store = web::Data::from(open_store(&config.store).await?);
    let secret = web::Data::new(AuthSecret::new(config.auth_secret.clone()));
    let allowed_origin = config.cors_allowed_origin.clone();

    tracing::info!(address = %config.bind_address, port = config.port, "starting server");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(allowed_origin.as_deref()))
            .app_data(store.clone())
            .app_data(secret.clone())
            .configure(routes::configure)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}
