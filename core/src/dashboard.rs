// core/src/dashboard.rs

//! The signed-in user's dashboard: stat cards, recent orders and profile.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Order, OrderStatus, Profile};
use crate::store::Store;

/// How many orders the dashboard lists.
pub const RECENT_ORDER_LIMIT: usize = 5;

/// Stat cards. Spend and product counts only consider completed orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
  pub total_orders: usize,
  pub total_products: usize,
  pub total_spent: Decimal,
  pub member_since: Option<String>,
}

impl DashboardStats {
  pub fn from_orders(orders: &[Order]) -> Self {
    let completed = || orders.iter().filter(|o| o.status == OrderStatus::Completed);
    Self {
      total_orders: orders.len(),
      total_products: completed().map(|o| o.items.len()).sum(),
      total_spent: completed().map(|o| o.total_amount).sum(),
      member_since: None,
    }
  }
}

/// Month and year of an account's creation, e.g. `Oct 2025`.
pub fn member_since_label(created_at: DateTime<Utc>) -> String {
  created_at.format("%b %Y").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentOrderItem {
  pub product_name: String,
  pub quantity: i32,
  pub price: Decimal,
  /// Only offered once the order is completed.
  pub download_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentOrder {
  pub id: Uuid,
  pub short_id: String,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub total_amount: Decimal,
  pub items: Vec<RecentOrderItem>,
}

impl From<&Order> for RecentOrder {
  fn from(order: &Order) -> Self {
    let downloadable = order.is_completed();
    Self {
      id: order.id,
      short_id: order.short_id(),
      status: order.status,
      created_at: order.created_at,
      total_amount: order.total_amount,
      items: order
        .items
        .iter()
        .map(|item| RecentOrderItem {
          product_name: item.product_name.clone().unwrap_or_default(),
          quantity: item.quantity,
          price: item.price,
          download_url: item.download_url.clone().filter(|_| downloadable),
        })
        .collect(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallToAction {
  pub label: &'static str,
  pub href: &'static str,
}

pub const BROWSE_PRODUCTS: CallToAction = CallToAction {
  label: "Browse Products",
  href: "/products",
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OrderHistory {
  Empty { message: &'static str, call_to_action: CallToAction },
  Recent { orders: Vec<RecentOrder> },
}

impl OrderHistory {
  pub fn from_orders(orders: &[Order]) -> Self {
    if orders.is_empty() {
      return OrderHistory::Empty {
        message: "No orders yet",
        call_to_action: BROWSE_PRODUCTS,
      };
    }
    OrderHistory::Recent {
      orders: orders.iter().take(RECENT_ORDER_LIMIT).map(RecentOrder::from).collect(),
    }
  }

  pub fn is_empty(&self) -> bool {
    matches!(self, OrderHistory::Empty { .. })
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
  pub greeting_name: String,
  pub email: String,
  pub profile: Option<Profile>,
  pub stats: DashboardStats,
  pub history: OrderHistory,
}

// Profile name when set, otherwise the local part of the email.
fn greeting_name(profile: Option<&Profile>, email: &str) -> String {
  profile
    .and_then(|p| p.full_name.as_deref())
    .filter(|name| !name.trim().is_empty())
    .map(str::to_string)
    .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string())
}

/// Builds a user's dashboard from a fresh read of their account, profile and orders.
///
/// A missing profile and an empty order list are normal states. Stored order totals are used
/// as-is; a total that disagrees with its items is reported in the log only.
#[instrument(name = "dashboard::load", skip(store), err(Display))]
pub async fn load_dashboard(store: &dyn Store, user_id: Uuid) -> Result<Dashboard> {
  let account = store
    .fetch_account(user_id)
    .await?
    .ok_or_else(|| Error::not_found(format!("Account {} not found.", user_id)))?;
  let profile = store.fetch_profile(user_id).await?;
  let orders = store.list_orders_for_user(user_id).await?;

  for order in &orders {
    if let Some(diff) = order.total_discrepancy() {
      warn!(order_id = %order.id, %diff, "Stored order total does not match its items.");
    }
  }

  let mut stats = DashboardStats::from_orders(&orders);
  stats.member_since = Some(member_since_label(account.created_at));

  info!(
    orders = stats.total_orders,
    products = stats.total_products,
    "Dashboard assembled."
  );

  Ok(Dashboard {
    greeting_name: greeting_name(profile.as_ref(), &account.email),
    email: profile
      .as_ref()
      .and_then(|p| p.email.clone())
      .unwrap_or_else(|| account.email.clone()),
    profile,
    stats,
    history: OrderHistory::from_orders(&orders),
  })
}

/// Applies a user's own profile edit, creating the profile row if it is missing.
#[instrument(name = "dashboard::update_profile", skip(store, update), err(Display))]
pub async fn update_profile(
  store: &dyn Store,
  user_id: Uuid,
  update: crate::models::ProfileUpdate,
) -> Result<Profile> {
  let mut profile = match store.fetch_profile(user_id).await? {
    Some(profile) => profile,
    None => {
      let account = store
        .fetch_account(user_id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Account {} not found.", user_id)))?;
      Profile::blank(user_id, &account.email, account.created_at)
    }
  };
  profile.apply(update);
  store.upsert_profile(profile.clone()).await?;
  info!("Profile updated.");
  Ok(profile)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn member_since_uses_short_month_and_year() {
    let ts = Utc.with_ymd_and_hms(2025, 10, 3, 12, 0, 0).unwrap();
    assert_eq!(member_since_label(ts), "Oct 2025");
  }

  #[test]
  fn greeting_prefers_full_name() {
    let mut profile = Profile::blank(Uuid::new_v4(), "ada@example.com", Utc::now());
    assert_eq!(greeting_name(Some(&profile), "ada@example.com"), "ada");
    profile.full_name = Some("Ada Lovelace".to_string());
    assert_eq!(greeting_name(Some(&profile), "ada@example.com"), "Ada Lovelace");
    assert_eq!(greeting_name(None, "grace@example.com"), "grace");
  }
}
