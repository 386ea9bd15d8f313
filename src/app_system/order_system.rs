use tracing::{error, info};

use crate::actor_framework::CollectionActor;
use crate::clients::{OrderClient, UserClient};
use crate::domain::{Order, User};
use crate::security::{RoleGuard, TokenKeys};
use super::config::Config;

/// The main application system that owns the collections.
///
/// Responsible for starting the collection actors, wiring clients to them,
/// and shutting them down.
pub struct OrderSystem {
    pub order_client: OrderClient,
    pub user_client: UserClient,
    pub guard: RoleGuard,
    pub keys: TokenKeys,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    pub fn new(config: &Config) -> Self {
        info!("Starting order system");

        let (user_actor, user_collection) =
            CollectionActor::<User>::new("users", config.channel_capacity, config.store_timeout());
        let user_client = UserClient::new(user_collection);
        let user_handle = tokio::spawn(user_actor.run());

        let (order_actor, order_collection) =
            CollectionActor::<Order>::new("orders", config.channel_capacity, config.store_timeout());
        let order_client = OrderClient::new(order_collection);
        let order_handle = tokio::spawn(order_actor.run());

        let keys = TokenKeys::from_secret(
            config.jwt_secret.as_bytes(),
            config.jwt_issuer.clone(),
            config.jwt_audience.clone(),
        );

        Self {
            guard: RoleGuard::new(user_client.clone()),
            order_client,
            user_client,
            keys,
            handles: vec![user_handle, order_handle],
        }
    }

    /// Drops every client so the collection channels close, then waits for
    /// the actors. Clones handed out elsewhere must be dropped first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        drop(self.order_client);
        drop(self.guard);
        drop(self.user_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
