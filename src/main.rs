use brandscope::infrastructure::bootstrap;
use brandscope::infrastructure::config::AppConfig;
use brandscope::interfaces::http;
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .try_init();

    let config = AppConfig::load().expect("Failed to load configuration");
    let state = bootstrap::build_state(&config)
        .await
        .expect("Failed to initialize backend");

    let server = http::start_server(state, &config.server.host, config.server.port)?;
    info!(host = %config.server.host, port = config.server.port, "brandscope backend listening");

    server.await
}
