use tracing_subscriber::EnvFilter;

use cluster_health_alert::app_context::AppContext;
use cluster_health_alert::config::load_config;
use cluster_health_alert::jobs::start_background_jobs;

fn init_json_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    init_json_logging();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(error) => {
            log::error!("Configuration error: {}", error);
            return;
        }
    };

    let app_context = match AppContext::new(config) {
        Ok(app_context) => app_context,
        Err(error) => {
            log::error!("Startup failed: {}", error);
            return;
        }
    };

    log::info!(
        "Cluster health alert is starting... alert_type={} interval_secs={} state_store_enabled={}",
        app_context.evaluator.definition().alert_type(),
        app_context.config.monitor.interval_secs,
        app_context.config.state_store.enabled
    );

    if let Err(error) = start_background_jobs(app_context) {
        log::error!("Failed to start monitor job: {}", error);
        return;
    }

    if let Err(error) = tokio::signal::ctrl_c().await {
        log::error!("shutdown signal listener failed: {}", error);
    }
    log::info!("Cluster health alert is shutting down");
}
