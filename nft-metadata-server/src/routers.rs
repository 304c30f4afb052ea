use crate::{
    handlers::{metadata, status, upload},
    ServerSettings, ServiceContext,
};
use actix_web::{error, web, HttpResponse, ResponseError};
use std::sync::Arc;

pub trait Router {
    fn register_routes(&self, service_config: &mut web::ServiceConfig);
}

impl<T: Router> Router for Option<T> {
    fn register_routes(&self, service_config: &mut web::ServiceConfig) {
        if let Some(router) = self {
            router.register_routes(service_config)
        }
    }
}

pub fn configure_router(router: &impl Router) -> impl FnOnce(&mut web::ServiceConfig) + '_ {
    |service_config| router.register_routes(service_config)
}

pub struct MetadataRouter {
    resolver: web::Data<nft_metadata_logic::MetadataResolver>,
    cache: web::Data<metadata::CachePolicy>,
}

impl MetadataRouter {
    pub fn new(context: &ServiceContext) -> Self {
        Self {
            resolver: web::Data::from(context.resolver.clone()),
            cache: web::Data::new(metadata::CachePolicy {
                max_age: context.metadata.cache_max_age,
            }),
        }
    }
}

impl Router for MetadataRouter {
    fn register_routes(&self, service_config: &mut web::ServiceConfig) {
        service_config
            .app_data(self.resolver.clone())
            .app_data(self.cache.clone())
            .route("/metadata/{token_id}", web::get().to(metadata::metadata));
    }
}

pub struct PinningRouter {
    state: web::Data<upload::PinningState>,
}

impl PinningRouter {
    pub fn new(
        client: Arc<nft_metadata_logic::PinningClient>,
        context: &ServiceContext,
        max_upload_size: usize,
    ) -> Self {
        Self {
            state: web::Data::new(upload::PinningState {
                client,
                fetcher: context.fetcher.clone(),
                max_upload_size,
            }),
        }
    }
}

impl Router for PinningRouter {
    fn register_routes(&self, service_config: &mut web::ServiceConfig) {
        service_config.app_data(self.state.clone()).service(
            web::scope("/upload")
                .route("/file", web::post().to(upload::upload_file))
                .route("/json", web::post().to(upload::upload_json)),
        );
    }
}

pub struct AppRouter {
    metadata: MetadataRouter,
    pinning: Option<PinningRouter>,
    max_body_size: usize,
}

impl AppRouter {
    pub fn new(context: &ServiceContext, settings: &ServerSettings) -> Self {
        let pinning = context
            .pinning
            .clone()
            .map(|client| PinningRouter::new(client, context, settings.max_body_size));
        Self {
            metadata: MetadataRouter::new(context),
            pinning,
            max_body_size: settings.max_body_size,
        }
    }
}

impl Router for AppRouter {
    fn register_routes(&self, service_config: &mut web::ServiceConfig) {
        let json_config = web::JsonConfig::default()
            .limit(self.max_body_size)
            .error_handler(|err, _req| {
                let response = HttpResponse::build(err.status_code())
                    .json(serde_json::json!({ "error": err.to_string() }));
                error::InternalError::from_response(err, response).into()
            });
        service_config
            .app_data(json_config)
            .route("/", web::get().to(status::root))
            .route("/health", web::get().to(status::health));
        self.metadata.register_routes(service_config);
        self.pinning.register_routes(service_config);
    }
}
