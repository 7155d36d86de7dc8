/// Health check handlers
use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;

/// GET /api/v1/health
pub async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "chirp-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "chirp-api"
        })),
    }
}

/// GET /api/v1/health/ready
pub async fn readiness_check(pool: web::Data<PgPool>) -> HttpResponse {
    let pg_ok = sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await.is_ok();

    let response = serde_json::json!({
        "ready": pg_ok,
        "checks": {
            "postgresql": if pg_ok { "healthy" } else { "unhealthy" }
        },
        "timestamp": Utc::now().to_rfc3339(),
    });

    if pg_ok {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// GET /api/v1/health/live
pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
