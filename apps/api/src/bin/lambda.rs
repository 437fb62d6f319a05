use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

use resume_bot::config::{Config, Surface};
use resume_bot::function::handle_event;
use resume_bot::secrets::{load_credentials, AwsSecretStore};
use resume_bot::{build_state, logging};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut config = Config::from_env(Surface::Function)?;

    logging::init(&config);

    // Resolve credentials once per cold start
    let store = AwsSecretStore::from_env().await;
    config.credentials =
        load_credentials(&store, config.credentials.clone(), |key| std::env::var(key).ok()).await;
    info!("Credentials available: {:?}", config.credentials);

    let state = build_state(&config);
    let state = &state;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        info!("Lambda invoked - Request: {}", event.context.request_id);
        Ok::<_, Error>(handle_event(state, event.payload).await)
    }))
    .await
}
