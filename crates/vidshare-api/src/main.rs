use vidshare_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let app = vidshare_api::setup::initialize_app(config.clone()).await?;

    vidshare_api::setup::server::start_server(&config, app.router).await?;

    if let Some(cleanup) = app.cleanup_service {
        cleanup.shutdown().await;
    }

    Ok(())
}
