use chrono::Local;
use clap::Parser;
use fee_checkout::application::verifier::PaymentVerifier;
use fee_checkout::config::Config;
use fee_checkout::domain::params::NavigationParams;
use fee_checkout::domain::ports::{NotifierRef, PaymentGatewayRef, PaymentRecordBackendRef};
use fee_checkout::infrastructure::backend::HttpPaymentBackend;
use fee_checkout::infrastructure::stripe::StripeGateway;
use fee_checkout::interfaces::console::ConsoleNotifier;
use fee_checkout::interfaces::view::render;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Return URL (or query string) the gateway redirected to after checkout
    return_url: String,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gateway publishable key
    #[arg(long, env = "FEE_CHECKOUT_PUBLISHABLE_KEY", hide_env_values = true)]
    publishable_key: Option<String>,

    /// Gateway API base URL
    #[arg(long, env = "FEE_CHECKOUT_GATEWAY_URL")]
    gateway_url: Option<String>,

    /// Backend API base URL
    #[arg(long, env = "FEE_CHECKOUT_BACKEND_URL")]
    backend_url: Option<String>,

    /// Bearer token for the backend API
    #[arg(long, env = "FEE_CHECKOUT_BACKEND_TOKEN", hide_env_values = true)]
    backend_token: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Print the rendered view as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn into_config(self) -> Result<(Config, String, bool)> {
        let mut config = match &self.config {
            Some(path) => Config::load(path).into_diagnostic()?,
            None => Config::default(),
        };

        if let Some(key) = self.publishable_key {
            config.gateway.publishable_key = key;
        }
        if let Some(url) = self.gateway_url {
            config.gateway.api_base = url;
        }
        if let Some(url) = self.backend_url {
            config.backend.base_url = url;
        }
        if let Some(token) = self.backend_token {
            config.backend.auth_token = Some(token);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }

        Ok((config, self.return_url, self.json))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, return_url, json) = Cli::parse().into_config()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    config.validate().into_diagnostic()?;

    let gateway: PaymentGatewayRef = Arc::new(StripeGateway::new(&config.gateway).into_diagnostic()?);
    let backend: PaymentRecordBackendRef =
        Arc::new(HttpPaymentBackend::new(&config.backend).into_diagnostic()?);
    let notifier: NotifierRef = if json {
        Arc::new(ConsoleNotifier::stderr())
    } else {
        Arc::new(ConsoleNotifier::stdout())
    };

    let verifier = PaymentVerifier::new(gateway, backend, notifier)
        .with_processing_poll(config.processing_poll.policy());

    let params = NavigationParams::from_return_url(&return_url);
    debug!(
        has_secret = params.client_secret().is_some(),
        has_record = params.payment_record_id().is_some(),
        "Parsed return URL"
    );

    let verification = verifier.verify(&params).await;
    let view = render(
        verification.state(),
        Local::now().date_naive(),
        &config.dashboard_route,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&view).into_diagnostic()?);
    } else {
        print!("{view}");
    }

    let (state, reconciliation) = verification.settle().await;
    info!(phase = ?state.phase(), ?reconciliation, "Verification finished");

    Ok(())
}
