use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use session_service::{SaveHandlerFactory, SaveHandlerType, SessionConfig, collect_garbage};

mod requests;

use crate::requests::{Client, Page, handle_request};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,session_service=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SessionConfig::from_env();
    // Without explicit configuration keep sessions in process memory
    let factory = match std::env::var("SESSION_SAVE_HANDLER_TYPE") {
        Ok(_) => SaveHandlerFactory::from_env(config.max_lifetime).await?,
        Err(_) => {
            SaveHandlerFactory::connect(
                SaveHandlerType::Memory,
                None,
                "sessions",
                config.max_lifetime,
            )
            .await?
        }
    };

    let mut client = Client::new("127.0.0.1", "demo-session/0.1");

    for page in [Page::SignIn, Page::Profile, Page::SignOut] {
        handle_request(&factory, &config, &mut client, page).await?;
    }

    let mut maintenance = factory.create();
    if let Some(purged) = collect_garbage(&mut *maintenance, config.max_lifetime).await {
        tracing::info!(purged, "Maintenance done");
    }

    Ok(())
}
