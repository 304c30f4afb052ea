use blockscout_service_launcher::launcher::ConfigSettings;
use nft_metadata_server::{run, Settings};

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    let settings = Settings::build()?;
    run(settings).await
}
