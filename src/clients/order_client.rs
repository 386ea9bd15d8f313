use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::CollectionClient;
use crate::domain::{NewOrder, ObjectId, Order, OrderReplace, OrderStatus};
use crate::order_actor::{OrderError, OrderFilter, OrderPatch};

/// Client for the orders collection and the order lifecycle built on it.
#[derive(Clone)]
pub struct OrderClient {
    inner: CollectionClient<Order>,
}

crate::impl_basic_client!(OrderClient, Order, OrderError, order);

impl OrderClient {
    /// Creates an order, deriving its code and initial status.
    #[instrument(skip(self, input), fields(user_id = %input.user_id, payment_method = ?input.payment_method))]
    pub async fn create_order(&self, input: NewOrder) -> Result<Order, OrderError> {
        let order = Order::create(ObjectId::new(), input, Utc::now());
        if order.status.is_none() {
            warn!("Unrecognised payment method, order created without status");
        }

        debug!("Sending request");
        self.inner.insert_one(order.clone()).await?;
        info!(order_id = %order.id, order_code = %order.order_code, "Order created successfully");
        Ok(order)
    }

    /// Overwrites every mutable field of the order and returns the stored result.
    #[instrument(skip(self, id, body), fields(order_id = %id))]
    pub async fn replace_order(&self, id: ObjectId, body: OrderReplace) -> Result<Order, OrderError> {
        debug!("Sending request");
        let patch = OrderPatch::Replace { body, at: Utc::now() };
        self.update_existing(id, patch).await
    }

    #[instrument(skip(self, id, url), fields(order_id = %id))]
    pub async fn set_payment_proof(&self, id: ObjectId, url: String) -> Result<Order, OrderError> {
        debug!("Sending request");
        let patch = OrderPatch::PaymentProof { url, at: Utc::now() };
        self.update_existing(id, patch).await
    }

    #[instrument(skip(self, id), fields(order_id = %id))]
    pub async fn delete_order(&self, id: ObjectId) -> Result<(), OrderError> {
        debug!("Sending request");
        let outcome = self.inner.delete_one(id).await?;
        if outcome.deleted == 0 {
            return Err(OrderError::NotFound(id));
        }
        info!("Order deleted");
        Ok(())
    }

    /// Moves the order one step along the fulfillment chain.
    ///
    /// The write only lands while the stored status still equals the one read,
    /// so of several concurrent calls from the same status exactly one wins;
    /// the others get [`OrderError::AlreadyAdvanced`].
    #[instrument(skip(self, id), fields(order_id = %id))]
    pub async fn advance_order(&self, id: ObjectId) -> Result<OrderStatus, OrderError> {
        let order = self.inner.find_one(id).await?.ok_or(OrderError::NotFound(id))?;

        let Some(current) = order.status else {
            return Err(OrderError::TransitionUnavailable(None));
        };
        let Some(next) = current.next() else {
            debug!(status = %current, "No transition out of current status");
            return Err(OrderError::TransitionUnavailable(Some(current)));
        };

        let outcome = self
            .inner
            .update_one(id, Some(OrderFilter::StatusIs(current)), OrderPatch::Status { status: next, at: Utc::now() })
            .await?;

        if outcome.matched == 0 {
            return match self.inner.find_one(id).await? {
                Some(_) => {
                    warn!(from = %current, "Lost advance race");
                    Err(OrderError::AlreadyAdvanced(current))
                }
                None => Err(OrderError::NotFound(id)),
            };
        }

        info!(from = %current, to = %next, "Order advanced");
        Ok(next)
    }

    async fn update_existing(&self, id: ObjectId, patch: OrderPatch) -> Result<Order, OrderError> {
        let outcome = self.inner.update_one(id, None, patch).await?;
        if outcome.matched == 0 {
            return Err(OrderError::NotFound(id));
        }
        // Deleted between the two calls.
        self.inner.find_one(id).await?.ok_or(OrderError::NotFound(id))
    }
}
