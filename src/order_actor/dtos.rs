use chrono::{DateTime, Utc};

use crate::domain::{OrderReplace, OrderStatus};

/// Filters understood by the orders collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    /// Matches only while the stored status equals the given one.
    StatusIs(OrderStatus),
}

/// Field-set updates understood by the orders collection.
#[derive(Debug, Clone)]
pub enum OrderPatch {
    Replace {
        body: OrderReplace,
        at: DateTime<Utc>,
    },
    Status {
        status: OrderStatus,
        at: DateTime<Utc>,
    },
    PaymentProof {
        url: String,
        at: DateTime<Utc>,
    },
}
