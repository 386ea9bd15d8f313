use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::object_id::ObjectId;
use super::status::OrderStatus;

/// How the customer pays. Unrecognised values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    Transfer,
    Cod,
    Other(String),
}

impl PaymentMethod {
    /// Status an order starts in. `None` for unrecognised methods.
    pub fn initial_status(&self) -> Option<OrderStatus> {
        match self {
            PaymentMethod::Transfer => Some(OrderStatus::BelumBayar),
            PaymentMethod::Cod => Some(OrderStatus::MenungguKonfirmasi),
            PaymentMethod::Other(_) => None,
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "transfer" => PaymentMethod::Transfer,
            "COD" => PaymentMethod::Cod,
            _ => PaymentMethod::Other(raw),
        }
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Transfer => "transfer".to_string(),
            PaymentMethod::Cod => "COD".to_string(),
            PaymentMethod::Other(raw) => raw,
        }
    }
}

/// One purchase of a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub product_id: ObjectId,
    pub fullname: String,
    pub phone: String,
    pub address: String,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub amount: u32,
    pub price: f64,
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_proof: Option<String>,
    pub order_code: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub user_id: ObjectId,
    pub product_id: ObjectId,
    pub fullname: String,
    pub phone: String,
    pub address: String,
    pub product_name: String,
    #[serde(default)]
    pub variant: Option<String>,
    pub amount: u32,
    pub price: f64,
    pub total_price: f64,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_proof: Option<String>,
}

/// Full replacement body. Every mutable field is overwritten; omitted optional
/// fields are cleared.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderReplace {
    pub product_id: ObjectId,
    pub fullname: String,
    pub phone: String,
    pub address: String,
    pub product_name: String,
    #[serde(default)]
    pub variant: Option<String>,
    pub amount: u32,
    pub price: f64,
    pub total_price: f64,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub payment_proof: Option<String>,
}

/// Display reference `ORD-<user hex>-<unix nanos>`.
///
/// Deterministic in its inputs. Two orders of the same user created in the
/// same nanosecond collide, so uniqueness is only probabilistic; the orders
/// collection rejects a collision instead of overwriting.
pub fn order_code(user_id: &ObjectId, at: DateTime<Utc>) -> String {
    let nanos = i128::from(at.timestamp()) * 1_000_000_000 + i128::from(at.timestamp_subsec_nanos());
    format!("ORD-{}-{}", user_id.to_hex(), nanos)
}

impl Order {
    /// Builds a fresh order, deriving its code and initial status.
    ///
    /// `total_price` is taken as submitted and never recomputed.
    pub fn create(id: ObjectId, input: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            order_code: order_code(&input.user_id, now),
            status: input.payment_method.initial_status(),
            user_id: input.user_id,
            product_id: input.product_id,
            fullname: input.fullname,
            phone: input.phone,
            address: input.address,
            product_name: input.product_name,
            variant: input.variant,
            amount: input.amount,
            price: input.price,
            total_price: input.total_price,
            payment_method: input.payment_method,
            payment_proof: input.payment_proof,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the mutable fields. `id`, `user_id`, `order_code`,
    /// `payment_method` and `created_at` are kept.
    pub fn replace_with(&mut self, body: OrderReplace, now: DateTime<Utc>) {
        self.product_id = body.product_id;
        self.fullname = body.fullname;
        self.phone = body.phone;
        self.address = body.address;
        self.product_name = body.product_name;
        self.variant = body.variant;
        self.amount = body.amount;
        self.price = body.price;
        self.total_price = body.total_price;
        self.status = body.status;
        self.payment_proof = body.payment_proof;
        self.updated_at = now;
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::new_order;
    use super::*;
    use chrono::{Duration, TimeZone};

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap() + Duration::nanoseconds(123_456_789)
    }

    #[test]
    fn test_initial_status_follows_payment_method() {
        let user = ObjectId::from_bytes([1; 12]);
        let transfer = Order::create(ObjectId::new(), new_order(user, "transfer"), instant());
        let cod = Order::create(ObjectId::new(), new_order(user, "COD"), instant());
        let other = Order::create(ObjectId::new(), new_order(user, "cash"), instant());

        assert_eq!(transfer.status, Some(OrderStatus::BelumBayar));
        assert_eq!(cod.status, Some(OrderStatus::MenungguKonfirmasi));
        assert_eq!(other.status, None);
        assert_eq!(other.payment_method, PaymentMethod::Other("cash".into()));
    }

    #[test]
    fn test_order_code_is_deterministic_per_user_and_instant() {
        let user = ObjectId::from_bytes([0x0a; 12]);
        let at = instant();

        assert_eq!(order_code(&user, at), order_code(&user, at));
        assert_eq!(
            order_code(&user, at),
            format!("ORD-0a0a0a0a0a0a0a0a0a0a0a0a-{}", at.timestamp_nanos_opt().unwrap())
        );
        assert_ne!(order_code(&user, at), order_code(&user, at + Duration::nanoseconds(1)));
    }

    #[test]
    fn test_create_keeps_caller_total_and_stamps_times() {
        let mut input = new_order(ObjectId::from_bytes([2; 12]), "COD");
        input.total_price = 1.0;
        let order = Order::create(ObjectId::new(), input, instant());

        assert_eq!(order.amount, 2);
        assert_eq!(order.price, 50_000.0);
        assert_eq!(order.total_price, 1.0);
        assert_eq!(order.created_at, instant());
        assert_eq!(order.updated_at, instant());
    }

    #[test]
    fn test_replace_preserves_identity_fields_and_clears_omitted() {
        let mut order = Order::create(ObjectId::new(), new_order(ObjectId::from_bytes([3; 12]), "transfer"), instant());
        let before = order.clone();
        let body: OrderReplace = serde_json::from_value(serde_json::json!({
            "product_id": "090909090909090909090909",
            "fullname": "Budi",
            "phone": "0800",
            "address": "Jl. Sudirman 1",
            "product_name": "Ember",
            "amount": 1,
            "price": 10.0,
            "total_price": 10.0,
            "status": "Dikirim"
        }))
        .unwrap();
        let later = instant() + Duration::seconds(5);
        order.replace_with(body, later);

        assert_eq!(order.order_code, before.order_code);
        assert_eq!(order.user_id, before.user_id);
        assert_eq!(order.created_at, before.created_at);
        assert_eq!(order.payment_method, PaymentMethod::Transfer);
        assert_eq!(order.status, Some(OrderStatus::Dikirim));
        assert_eq!(order.variant, None);
        assert_eq!(order.updated_at, later);
    }

    #[test]
    fn test_wire_field_names() {
        let order = Order::create(ObjectId::new(), new_order(ObjectId::from_bytes([4; 12]), "COD"), instant());
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["status"], "Menunggu Konfirmasi");
        assert_eq!(json["payment_method"], "COD");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("payment_proof").is_none());
    }
}
