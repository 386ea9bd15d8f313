mod actor_framework;
mod api;
mod app_system;
mod clients;
mod domain;
mod order_actor;
mod security;
mod user_actor;

#[cfg(test)]
mod mock_framework;

use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};

use crate::app_system::{setup_tracing, Cli, Command, Config, OrderSystem};
use crate::domain::{NewUser, ObjectId, Role};
use crate::security::TokenKeys;

#[tokio::main]
async fn main() -> Result<(), String> {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    setup_tracing(cli.config.log_format);

    match cli.command {
        Command::Serve { seed_admin } => serve(cli.config, seed_admin).await,
        Command::IssueToken { user_id, ttl_secs } => {
            let user_id = ObjectId::parse_str(&user_id).map_err(|e| e.to_string())?;
            let keys = TokenKeys::from_secret(
                cli.config.jwt_secret.as_bytes(),
                cli.config.jwt_issuer,
                cli.config.jwt_audience,
            );
            let token = keys.issue(user_id, Duration::from_secs(ttl_secs)).map_err(|e| e.to_string())?;
            println!("{token}");
            Ok(())
        }
    }
}

async fn serve(config: Config, seed_admin: Option<String>) -> Result<(), String> {
    let system = OrderSystem::new(&config);

    if let Some(email) = seed_admin {
        let admin = NewUser {
            first_name: "Admin".into(),
            last_name: String::new(),
            email,
            phone: String::new(),
            address: String::new(),
            image: None,
        };
        match system.user_client.register(admin, Role::Admin).await {
            Ok(user) => info!(user_id = %user.id, email = %user.email, "Seeded admin account"),
            Err(e) => warn!(error = %e, "Admin seeding failed"),
        }
    }

    let app = api::router(api::AppState::from_system(&system), config.request_timeout());
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| format!("Failed to bind {}: {e}", config.bind))?;
    info!(addr = %config.bind, "Listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await;
    if let Err(e) = &served {
        error!(error = %e, "Server error");
    }

    system.shutdown().await?;
    served.map_err(|e| e.to_string())
}
