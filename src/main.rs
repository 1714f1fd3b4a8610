use lambda_http::{run, service_fn, Body, Error, Request, Response};
use std::time::Duration;
use tracing::info;
use weightlog_webhook::config::AppConfig;
use weightlog_webhook::messaging::LineClient;
use weightlog_webhook::sheets::SheetsClient;
use weightlog_webhook::webhook;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .init();

    // Configuration is built and validated once at cold start and passed
    // into the gateways; nothing reads the environment per request.
    let config = AppConfig::from_env()?;
    config.validate()?;
    let home_tz = config.home_offset()?;
    info!("{}", config.summary());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let sheets = SheetsClient::new(client.clone(), config.sheets.clone());
    let messaging = LineClient::new(client, config.line.clone());
    let sheets_ref = &sheets;
    let messaging_ref = &messaging;

    info!("Webhook handler initialized, starting runtime");

    run(service_fn(move |request: Request| async move {
        let body = match request.body() {
            Body::Text(text) => text.as_str(),
            Body::Binary(bytes) => std::str::from_utf8(bytes).unwrap_or(""),
            Body::Empty => "",
        };

        let status = webhook::handle(body, home_tz, sheets_ref, messaging_ref).await;
        let body = if status == 200 { "OK" } else { "" };

        Ok::<_, Error>(
            Response::builder()
                .status(status)
                .body(Body::Text(body.to_string()))?,
        )
    }))
    .await
}
