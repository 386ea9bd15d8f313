use std::fmt;

use serde::{Deserialize, Serialize};

/// Fulfillment stage of an order.
///
/// The wire names are the Indonesian labels stored by existing clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Awaiting payment. Initial state for bank transfer orders.
    #[serde(rename = "Belum Bayar")]
    BelumBayar,
    /// Paid.
    #[serde(rename = "Sudah Bayar")]
    SudahBayar,
    /// Processing.
    #[serde(rename = "Diproses")]
    Diproses,
    /// Packed.
    #[serde(rename = "Dikemas")]
    Dikemas,
    /// Shipped.
    #[serde(rename = "Dikirim")]
    Dikirim,
    /// Done. Terminal.
    #[serde(rename = "Selesai")]
    Selesai,
    /// Awaiting confirmation. Initial state for cash-on-delivery orders;
    /// not part of the fulfillment chain.
    #[serde(rename = "Menunggu Konfirmasi")]
    MenungguKonfirmasi,
}

/// The forward chain. Each status advances only to the one after it.
pub const FULFILLMENT_CHAIN: [OrderStatus; 6] = [
    OrderStatus::BelumBayar,
    OrderStatus::SudahBayar,
    OrderStatus::Diproses,
    OrderStatus::Dikemas,
    OrderStatus::Dikirim,
    OrderStatus::Selesai,
];

impl OrderStatus {
    /// Next status in the chain, or `None` for `Selesai` and for statuses
    /// outside the chain.
    pub fn next(self) -> Option<OrderStatus> {
        let position = FULFILLMENT_CHAIN.iter().position(|status| *status == self)?;
        FULFILLMENT_CHAIN.get(position + 1).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::BelumBayar => "Belum Bayar",
            OrderStatus::SudahBayar => "Sudah Bayar",
            OrderStatus::Diproses => "Diproses",
            OrderStatus::Dikemas => "Dikemas",
            OrderStatus::Dikirim => "Dikirim",
            OrderStatus::Selesai => "Selesai",
            OrderStatus::MenungguKonfirmasi => "Menunggu Konfirmasi",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
