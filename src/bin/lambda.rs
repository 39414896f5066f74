//! AWS Lambda entry point for reddit-digest
//!
//! Deploy with `cargo lambda build --release --features lambda` and attach
//! a scheduled trigger. Each invocation sends one digest.

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use reddit_digest::{
    models::{Config, Credentials},
    pipeline::{self, Outcome},
};
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CONFIG_ENV: &str = "DIGEST_CONFIG";
const DEFAULT_CONFIG: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("reddit-digest Lambda starting...");
    lambda_runtime::run(service_fn(handler)).await
}

/// Errors are returned so the scheduler records the invocation as failed.
async fn handler(event: LambdaEvent<Value>) -> Result<Value, LambdaError> {
    info!("Received event: {:?}", event.payload);

    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG.to_string());

    let result = async {
        let credentials = Credentials::from_env()?;
        let config = Config::load_or_default(&config_path)?;
        pipeline::run(&config, &credentials, false).await
    }
    .await;

    match result {
        Ok(Outcome::Sent(summary)) => {
            info!(
                posts = summary.posts,
                communities = summary.communities,
                skipped = summary.skipped,
                "Digest sent"
            );
            Ok(serde_json::json!({
                "status": "success",
                "posts": summary.posts,
                "communities": summary.communities,
            }))
        }
        Ok(Outcome::Preview(_)) => Ok(serde_json::json!({ "status": "preview" })),
        Err(e) => {
            error!("Digest run failed: {}", e);
            Err(e.into())
        }
    }
}
