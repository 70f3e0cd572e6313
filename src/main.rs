use proposal_pilot::utils::{logger, validation::Validate};
use proposal_pilot::{
    create_app, AppState, EnvCredentials, GenerationGateway, MemoryStore, OpenAiProvider,
    ServerConfig, TokenIssuer,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting proposal-pilot API");
    if config.verbose {
        tracing::debug!("Server config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if std::env::var(proposal_pilot::adapters::credentials::OPENAI_API_KEY_VAR).is_err() {
        // 不影響啟動；產生提案的請求會個別失敗
        tracing::warn!("OPENAI_API_KEY is not set; proposal generation will be unavailable");
    }

    let provider = OpenAiProvider::new(
        &config.openai_base_url,
        &config.openai_model,
        config.provider_timeout(),
    )?;
    let gateway = GenerationGateway::new(Arc::new(provider), Arc::new(EnvCredentials::default()));
    let tokens = TokenIssuer::new(config.jwt_secret()?, config.jwt_expires_in_days);
    let state = AppState::with_store(Arc::new(MemoryStore::new()), tokens, gateway);

    let app = create_app(state, &config);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("✅ Server is running on {}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
