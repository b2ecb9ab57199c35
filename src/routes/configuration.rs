use axum::{
    extract::Path, extract::State, http::StatusCode, response::IntoResponse, routing::get, Json,
    Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{error, info};

use crate::db::Backends;
use crate::models::{ConfigurationVariable, Entity};

// ---

pub fn router() -> Router<Backends> {
    // ---
    Router::new().route(
        "/{tenant}/core/configuration-variables/{id}",
        get(handler),
    )
}

/// Effective value of one configuration variable.
#[derive(Debug, Serialize)]
struct ConfigurationValue {
    id: i32,
    name: String,
    value: f64,
}

async fn handler(
    Path((tenant, id)): Path<(String, i32)>,
    State(backends): State<Backends>,
) -> impl IntoResponse {
    // ---
    info!("GET /{}/core/configuration-variables/{}", tenant, id);

    let pool = match backends.for_read(ConfigurationVariable::KIND) {
        Ok(pool) => pool,
        Err(e) => {
            error!("No backend for configuration variables: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, Json("No backend for tenant"))
                .into_response();
        }
    };

    match fetch_configuration_variable(pool, id).await {
        Ok(Some(var)) => {
            let body = ConfigurationValue {
                id: var.id,
                value: var.effective_value(),
                name: var.name,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, Json("Configuration variable not found")).into_response(),
        Err(e) => {
            error!("Failed to fetch configuration variable {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json("Failed to fetch configuration variable"),
            )
                .into_response()
        }
    }
}

async fn fetch_configuration_variable(
    pool: &PgPool,
    id: i32,
) -> Result<Option<ConfigurationVariable>, sqlx::Error> {
    // ---
    sqlx::query_as::<_, ConfigurationVariable>(
        r#"
        SELECT id, name, value, is_percent, updated_at
        FROM configuration_variables
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
