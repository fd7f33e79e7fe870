/// CertPortal - certificate verification portal
///
/// Resolves credentials by token id, content identifier, wallet address or
/// transaction hash against the certificate contract, the backend API and
/// the storage gateway.
use certportal::{config::PortalConfig, context::AppContext, error::PortalResult, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> PortalResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "certportal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    print_banner();

    let config = PortalConfig::from_env()?;
    let ctx = AppContext::new(config)?;

    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
   ______          __  ____             __        __
  / ____/__  _____/ /_/ __ \____  _____/ /_____ _/ /
 / /   / _ \/ ___/ __/ /_/ / __ \/ ___/ __/ __ `/ /
/ /___/  __/ /  / /_/ ____/ /_/ / /  / /_/ /_/ / /
\____/\___/_/   \__/_/    \____/_/   \__/\__,_/_/

        Certificate Verification Portal v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
