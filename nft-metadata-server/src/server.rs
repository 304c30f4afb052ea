use crate::{configure_router, AppRouter, ServiceContext, Settings};
use actix_web::{middleware::Condition, App, HttpServer};
use blockscout_service_launcher::{launcher::ConfigSettings, tracing::init_logs};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub async fn run(settings: Settings) -> Result<(), anyhow::Error> {
    init_logs(Settings::SERVICE_NAME, &settings.tracing, &settings.jaeger)?;

    let context = ServiceContext::new(&settings)?;
    let router = Arc::new(AppRouter::new(&context, &settings.server));
    let cors_settings = settings.server.cors.clone();
    let cors_enabled = cors_settings.enabled;
    let addr = settings.server.addr;

    tracing::info!(
        %addr,
        contract = %settings.chain.contract_address,
        pinning_enabled = settings.pinning.enabled,
        "starting http server"
    );
    HttpServer::new(move || {
        let cors = cors_settings.clone().build();
        App::new()
            .wrap(Condition::new(cors_enabled, cors))
            .wrap(TracingLogger::default())
            .configure(configure_router(&*router))
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
