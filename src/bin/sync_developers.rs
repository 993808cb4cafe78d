use devprofile_backend::{
    bootstrap::{self, LogTarget},
    services::developer_service::DeveloperService,
    sync,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let ctx = bootstrap::start(LogTarget::Stderr).await?;
    let service = DeveloperService::new(ctx.pool.clone(), ctx.media());

    let path = sync::default_source_path();
    tracing::info!("Syncing developers from {}", path.display());

    let outcome = match sync::load(&path).await {
        Ok(document) => {
            let mut stdout = std::io::stdout().lock();
            sync::run(&service, document, &mut stdout).await
        }
        Err(e) => Err(e),
    };

    ctx.shutdown().await;
    outcome?;
    Ok(())
}
