use actix_web::http::header::ContentType;
use actix_web::HttpResponse;

pub async fn health_check() -> HttpResponse {
    tracing::debug!("Health check endpoint called");
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("OK")
}
