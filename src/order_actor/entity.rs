use crate::actor_framework::Document;
use crate::domain::{ObjectId, Order};
use super::dtos::{OrderFilter, OrderPatch};

impl Document for Order {
    type Id = ObjectId;
    type Filter = OrderFilter;
    type Patch = OrderPatch;

    fn id(&self) -> &ObjectId {
        &self.id
    }

    /// Order codes are unique across the collection.
    fn unique_key(&self) -> Option<String> {
        Some(self.order_code.clone())
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        match filter {
            OrderFilter::StatusIs(expected) => self.status == Some(*expected),
        }
    }

    /// Applies the patch and refreshes `updated_at`.
    ///
    /// # Patches
    /// - `Replace`: overwrites every mutable field, see [`Order::replace_with`]
    /// - `Status`: sets the status only
    /// - `PaymentProof`: sets the proof URL only, status untouched
    fn apply(&mut self, patch: OrderPatch) {
        match patch {
            OrderPatch::Replace { body, at } => self.replace_with(body, at),
            OrderPatch::Status { status, at } => {
                self.status = Some(status);
                self.updated_at = at;
            }
            OrderPatch::PaymentProof { url, at } => {
                self.payment_proof = Some(url);
                self.updated_at = at;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::new_order;
    use crate::domain::OrderStatus;
    use chrono::Utc;

    #[test]
    fn test_status_filter_matches_only_current_status() {
        let order = Order::create(ObjectId::new(), new_order(ObjectId::new(), "transfer"), Utc::now());

        assert!(order.matches(&OrderFilter::StatusIs(OrderStatus::BelumBayar)));
        assert!(!order.matches(&OrderFilter::StatusIs(OrderStatus::SudahBayar)));
    }

    #[test]
    fn test_unset_status_never_matches() {
        let order = Order::create(ObjectId::new(), new_order(ObjectId::new(), "qris"), Utc::now());
        assert!(!order.matches(&OrderFilter::StatusIs(OrderStatus::BelumBayar)));
    }

    #[test]
    fn test_payment_proof_patch_leaves_status() {
        let mut order = Order::create(ObjectId::new(), new_order(ObjectId::new(), "transfer"), Utc::now());
        let at = order.created_at + chrono::Duration::seconds(30);
        order.apply(OrderPatch::PaymentProof { url: "https://cdn.example.com/proof.jpg".into(), at });

        assert_eq!(order.payment_proof.as_deref(), Some("https://cdn.example.com/proof.jpg"));
        assert_eq!(order.status, Some(OrderStatus::BelumBayar));
        assert_eq!(order.updated_at, at);
    }
}
