use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    status: &'static str,
    service: &'static str,
    message: &'static str,
}

pub async fn root() -> web::Json<ServiceStatus> {
    web::Json(ServiceStatus {
        status: "ok",
        service: "Realife backend",
        message: "Backend is running",
    })
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().finish()
}
