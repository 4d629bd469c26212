use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use connect_server::ServerConfig;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "connect_server=debug,connect_service=info,tower_http=debug".into()),
        )
        .with(fmt::layer())
        .init();

    let result = match ServerConfig::from_env() {
        Ok(config) => connect_server::run(config).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "BCET Connect failed");
            ExitCode::FAILURE
        }
    }
}
