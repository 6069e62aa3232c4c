use clap::Parser;
use miette::{IntoDiagnostic, Result};
use push_provisioning::bootstrap::Services;
use push_provisioning::config::{Cli, Command};
use push_provisioning::domain::provisioning::ProvisioningRequest;
use push_provisioning::interfaces::http::router;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `provision` and `merchants` keep stdout clean JSON.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.service.log_level))
        .into_diagnostic()?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let catalog = cli.service.load_catalog().into_diagnostic()?;
    let services = Services::in_memory(catalog, cli.service.gateway_timeout());

    match cli.command {
        Command::Serve { bind } => {
            let listener = TcpListener::bind(&bind).await.into_diagnostic()?;
            info!(%bind, "push provisioning service listening");
            axum::serve(listener, router(services.state.clone()))
                .await
                .into_diagnostic()?;
        }
        Command::Provision {
            merchant_app_ids,
            card_identifier,
        } => {
            let request = ProvisioningRequest::new(
                merchant_app_ids.into_iter().map(i64::from),
                &card_identifier,
            );
            let response = services
                .state
                .orchestrator
                .provision(request)
                .await
                .into_diagnostic()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&response).into_diagnostic()?
            );
        }
        Command::Merchants => {
            let directory = services.state.orchestrator.merchants();
            println!(
                "{}",
                serde_json::to_string_pretty(&directory).into_diagnostic()?
            );
        }
    }

    services.shutdown().await;
    Ok(())
}
