// core/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

wire_enum! {
  pub enum OrderStatus {
    Pending => "pending",
    Completed => "completed",
    Failed => "failed",
  }
}

/// A purchased line. `price` is the unit price copied at purchase time, never re-read from the
/// live product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub price: Decimal,
  pub product_name: Option<String>,
  pub download_url: Option<String>,
}

impl OrderItem {
  pub fn line_total(&self) -> Decimal {
    self.price * Decimal::from(self.quantity)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub total_amount: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub items: Vec<OrderItem>,
}

impl Order {
  pub fn is_completed(&self) -> bool {
    self.status == OrderStatus::Completed
  }

  /// Sum of `quantity * price` over the items.
  pub fn items_total(&self) -> Decimal {
    self.items.iter().map(OrderItem::line_total).sum()
  }

  /// Difference between the stored total and the item sum, if any.
  ///
  /// The stored `total_amount` stays authoritative; callers only report the mismatch.
  pub fn total_discrepancy(&self) -> Option<Decimal> {
    let diff = self.total_amount - self.items_total();
    (!diff.is_zero()).then_some(diff)
  }

  pub fn short_id(&self) -> String {
    short_id(&self.id)
  }
}

/// Admin listing row: an order joined with the customer's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
  pub id: Uuid,
  pub user_id: Uuid,
  pub total_amount: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub customer_name: Option<String>,
  pub customer_email: Option<String>,
}

impl OrderSummary {
  pub fn customer_label(&self) -> &str {
    self
      .customer_name
      .as_deref()
      .filter(|name| !name.is_empty())
      .or(self.customer_email.as_deref())
      .unwrap_or("Unknown Customer")
  }

  pub fn short_id(&self) -> String {
    short_id(&self.id)
  }
}

// Last eight characters of the hyphenated id, as shown on order cards.
fn short_id(id: &Uuid) -> String {
  let full = id.hyphenated().to_string();
  full[full.len() - 8..].to_string()
}
