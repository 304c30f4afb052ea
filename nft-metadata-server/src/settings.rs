use blockscout_service_launcher::{
    launcher::{ConfigSettings, CorsSettings},
    tracing::{JaegerSettings, TracingSettings},
};
use nft_metadata_logic::{ChainSettings, GatewaySettings, MetadataSettings, PinningSettings};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, str::FromStr};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub chain: ChainSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub pinning: PinningSettings,
    #[serde(default)]
    pub metadata: MetadataSettings,
    #[serde(default)]
    pub tracing: TracingSettings,
    #[serde(default)]
    pub jaeger: JaegerSettings,
}

impl ConfigSettings for Settings {
    const SERVICE_NAME: &'static str = "NFT_METADATA";

    fn validate(&self) -> anyhow::Result<()> {
        if self.pinning.enabled && self.pinning.jwt.trim().is_empty() {
            anyhow::bail!("pinning.jwt must be set when pinning is enabled");
        }
        if self.metadata.cache_max_age == 0 {
            anyhow::bail!("metadata.cache_max_age must be positive");
        }
        Ok(())
    }
}

impl Settings {
    pub fn default(chain: ChainSettings) -> Self {
        Self {
            chain,
            server: Default::default(),
            gateway: Default::default(),
            pinning: Default::default(),
            metadata: Default::default(),
            tracing: Default::default(),
            jaeger: Default::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    /// Limit for JSON bodies and uploaded files, in bytes.
    pub max_body_size: usize,
    pub cors: CorsSettings,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from_str("0.0.0.0:3000").expect("should be valid addr"),
            max_body_size: 10 * 1024 * 1024,
            cors: CorsSettings {
                enabled: true,
                allowed_origin: "*".to_string(),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nft_metadata_logic::Address;

    fn settings() -> Settings {
        Settings::default(ChainSettings::new(
            "http://127.0.0.1:8545".parse().unwrap(),
            Address::repeat_byte(1),
        ))
    }

    #[test]
    fn default_settings_are_valid() {
        settings().validate().unwrap();
    }

    #[test]
    fn pinning_requires_jwt() {
        let mut settings = settings();
        settings.pinning.enabled = true;
        assert!(settings.validate().is_err());

        settings.pinning.jwt = "jwt".into();
        settings.validate().unwrap();
    }

    #[actix_web::test]
    async fn default_cors_allows_any_origin() {
        use actix_web::{http::header, test, web, App, HttpResponse};

        let cors = ServerSettings::default().cors;
        assert!(cors.enabled);
        let app = test::init_service(
            App::new()
                .wrap(cors.build())
                .route("/health", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let request = test::TestRequest::get()
            .uri("/health")
            .insert_header((header::ORIGIN, "https://marketplace.example"))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[test]
    fn cache_max_age_must_be_positive() {
        let mut settings = settings();
        settings.metadata.cache_max_age = 0;
        assert!(settings.validate().is_err());
    }
}
