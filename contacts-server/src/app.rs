//! Router assembly: routes, CORS policy and request tracing.

use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderValue, Method};
use contacts::io::config::{ContactsConfig, CorsConfig};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

/// Build the full application. Photos are served from the directory the
/// service's photo store writes to.
pub fn build_app(state: AppState, config: &ContactsConfig) -> Result<Router> {
    let cors = cors_layer(&config.cors)?;
    let photo_dir = state.service.photos().directory().to_path_buf();

    Ok(
        routes::contacts_router(&photo_dir, config.photos.max_upload_bytes)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(state),
    )
}

/// Single-origin CORS policy from config. Requests from other origins get no
/// `Access-Control-Allow-Origin` header.
pub fn cors_layer(cfg: &CorsConfig) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(&cfg.allowed_origin)
        .with_context(|| format!("invalid cors origin {:?}", cfg.allowed_origin))?;
    let methods = cfg
        .allowed_methods
        .iter()
        .map(|m| {
            Method::from_bytes(m.as_bytes()).with_context(|| format!("invalid cors method {m:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods(methods)
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cfg.allow_credentials)
        .max_age(Duration::from_secs(cfg.max_age_secs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cors_config_builds() {
        cors_layer(&CorsConfig::default()).expect("cors layer");
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let cfg = CorsConfig {
            allowed_origin: "http://bad\norigin".to_string(),
            ..CorsConfig::default()
        };
        assert!(cors_layer(&cfg).is_err());
    }
}
