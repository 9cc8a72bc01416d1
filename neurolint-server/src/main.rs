#![deny(missing_docs)]
//! NeuroLint server executable.
//!
//! Serves the in-memory analysis engine over HTTP for the CLI and the web UI.

mod openapi;
mod routes;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;

#[allow(unused_imports)]
use std::str::FromStr;

#[cfg(not(test))]
use crate::routes::{AppState, analyze, fix, json_config, layers, openapi_json, status};

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = neurolint_core::config::from_env();
    log::info!(
        "starting NeuroLint server ({:?}, demo features {})",
        config.environment,
        if config.features.demo { "on" } else { "off" }
    );

    let state = web::Data::new(AppState::default());

    let origins = std::env::var("NEUROLINT_UI_ORIGINS")
        .unwrap_or_else(|_| "http://127.0.0.1:3000,http://localhost:3000".to_string());
    let allowed_origins: Vec<String> = origins
        .split(',')
        .map(|value| value.trim())
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect();

    let listen_addr = std::env::var("NEUROLINT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let listen_port =
        u16::from_str(&std::env::var("NEUROLINT_PORT").unwrap_or_else(|_| "3000".to_string()))
            .map_err(|err| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("NEUROLINT_PORT must be a u16 number: {err}"),
                )
            })?;

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .allowed_header("X-Client-ID")
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .app_data(json_config())
                .service(analyze)
                .service(fix)
                .service(status)
                .service(layers)
                .service(openapi_json)
        })
        .bind((listen_addr, listen_port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
