use std::sync::Arc;

use reg_assist::config::ServerConfig;
use reg_assist::llm::create_provider;
use reg_assist::registration::{
    chat_routes, spawn_sweep_task, ChatRouteState, RegistrationManager, SessionStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export GROQ_API_KEY=gsk_...");
        std::process::exit(1);
    });

    eprintln!("📝 Reg Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);
    eprintln!("   Chat API: http://0.0.0.0:{}/api/chat", config.port);
    eprintln!(
        "   Session TTL: {}s\n",
        config.session_idle_timeout.as_secs()
    );

    let llm = create_provider(&config.llm)?;
    let store = Arc::new(SessionStore::new(config.session_idle_timeout));
    let _sweep_handle = spawn_sweep_task(Arc::clone(&store), config.sweep_interval);

    let manager = Arc::new(RegistrationManager::new(llm, store));
    let app = chat_routes(ChatRouteState { manager });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Registration server started");
    axum::serve(listener, app).await?;

    Ok(())
}
