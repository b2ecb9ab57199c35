use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use sqlx::PgPool;
use tracing::{error, info};

use crate::db::Backends;
use crate::models::{Country, Entity};

// ---

pub fn router() -> Router<Backends> {
    // ---
    Router::new().route("/master/countries", get(countries))
}

async fn countries(State(backends): State<Backends>) -> impl IntoResponse {
    // ---
    info!("GET /master/countries");

    let result = match backends.for_read(Country::KIND) {
        Ok(pool) => fetch_countries(pool).await.map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(countries) => (StatusCode::OK, Json(countries)).into_response(),
        Err(e) => {
            error!("Failed to fetch countries: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json("Failed to fetch countries")).into_response()
        }
    }
}

async fn fetch_countries(pool: &PgPool) -> Result<Vec<Country>, sqlx::Error> {
    // ---
    sqlx::query_as::<_, Country>("SELECT id, code, name FROM countries ORDER BY name")
        .fetch_all(pool)
        .await
}
