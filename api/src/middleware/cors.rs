//! CORS configuration for browser clients.
//!
//! Development allows any origin. Production only allows the origins listed
//! in `ALLOWED_ORIGINS` (comma separated).

use std::env;

use actix_cors::Cors;
use actix_web::http::{header, Method};

use ak_shared::config::Environment;

pub fn create_cors(environment: Environment) -> Cors {
    let max_age = env::var("CORS_MAX_AGE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(3600);

    let cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(max_age);

    if !environment.is_production() {
        return cors.allow_any_origin();
    }

    allowed_origins(env::var("ALLOWED_ORIGINS").ok().as_deref())
        .into_iter()
        .fold(cors, |cors, origin| {
            log::info!("Adding allowed origin: {}", origin);
            cors.allowed_origin(&origin)
        })
}

fn allowed_origins(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
