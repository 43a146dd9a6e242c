// app/src/db/rows.rs

//! Row shapes as they come out of Postgres. Enumerations are text columns and are parsed into
//! the core types here; an unknown value is reported as a store failure.

use chrono::{DateTime, Utc};
use launchcraft::models::{Account, Order, OrderItem, OrderSummary, Product, Profile};
use launchcraft::{Error, Result};
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

fn decode<T: FromStr<Err = Error>>(column: &'static str, raw: &str) -> Result<T> {
  raw.parse().map_err(|_| {
    Error::store(
      "decode_row",
      anyhow::anyhow!("column '{}' holds unknown value '{}'", column, raw),
    )
  })
}

pub const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.short_description, p.price, p.cover_image_url, \
   p.preview_url, p.download_url, p.category_id, c.name AS category_name, p.product_type, p.stage, \
   p.market_type, p.market_scope, p.features, p.tech_stack, p.status, p.created_at";

#[derive(Debug, FromRow)]
pub struct ProductRow {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub short_description: String,
  pub price: Decimal,
  pub cover_image_url: Option<String>,
  pub preview_url: Option<String>,
  pub download_url: Option<String>,
  pub category_id: Option<Uuid>,
  pub category_name: Option<String>,
  pub product_type: String,
  pub stage: String,
  pub market_type: String,
  pub market_scope: String,
  pub features: Vec<String>,
  pub tech_stack: Vec<String>,
  pub status: String,
  pub created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
  type Error = Error;

  fn try_from(row: ProductRow) -> Result<Self> {
    Ok(Product {
      product_type: decode("product_type", &row.product_type)?,
      stage: decode("stage", &row.stage)?,
      market_type: decode("market_type", &row.market_type)?,
      market_scope: decode("market_scope", &row.market_scope)?,
      status: decode("status", &row.status)?,
      id: row.id,
      name: row.name,
      description: row.description,
      short_description: row.short_description,
      price: row.price,
      cover_image_url: row.cover_image_url,
      preview_url: row.preview_url,
      download_url: row.download_url,
      category_id: row.category_id,
      category_name: row.category_name,
      features: row.features,
      tech_stack: row.tech_stack,
      created_at: row.created_at,
    })
  }
}

#[derive(Debug, FromRow)]
pub struct AccountRow {
  pub id: Uuid,
  pub email: String,
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
  fn from(row: AccountRow) -> Self {
    Account {
      id: row.id,
      email: row.email,
      password_hash: row.password_hash,
      created_at: row.created_at,
    }
  }
}

#[derive(Debug, FromRow)]
pub struct ProfileRow {
  pub user_id: Uuid,
  pub full_name: Option<String>,
  pub email: Option<String>,
  pub company: Option<String>,
  pub role: Option<String>,
  pub bio: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
  fn from(row: ProfileRow) -> Self {
    Profile {
      user_id: row.user_id,
      full_name: row.full_name,
      email: row.email,
      company: row.company,
      role: row.role,
      bio: row.bio,
      created_at: row.created_at,
    }
  }
}

#[derive(Debug, FromRow)]
pub struct OrderRow {
  pub id: Uuid,
  pub user_id: Uuid,
  pub total_amount: Decimal,
  pub status: String,
  pub created_at: DateTime<Utc>,
}

impl OrderRow {
  pub fn into_order(self, items: Vec<OrderItem>) -> Result<Order> {
    Ok(Order {
      status: decode("status", &self.status)?,
      id: self.id,
      user_id: self.user_id,
      total_amount: self.total_amount,
      created_at: self.created_at,
      items,
    })
  }
}

#[derive(Debug, FromRow)]
pub struct OrderItemRow {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub price: Decimal,
  pub product_name: Option<String>,
  pub download_url: Option<String>,
}

impl From<OrderItemRow> for OrderItem {
  fn from(row: OrderItemRow) -> Self {
    OrderItem {
      id: row.id,
      order_id: row.order_id,
      product_id: row.product_id,
      quantity: row.quantity,
      price: row.price,
      product_name: row.product_name,
      download_url: row.download_url,
    }
  }
}

#[derive(Debug, FromRow)]
pub struct OrderSummaryRow {
  pub id: Uuid,
  pub user_id: Uuid,
  pub total_amount: Decimal,
  pub status: String,
  pub created_at: DateTime<Utc>,
  pub customer_name: Option<String>,
  pub customer_email: Option<String>,
}

impl TryFrom<OrderSummaryRow> for OrderSummary {
  type Error = Error;

  fn try_from(row: OrderSummaryRow) -> Result<Self> {
    Ok(OrderSummary {
      status: decode("status", &row.status)?,
      id: row.id,
      user_id: row.user_id,
      total_amount: row.total_amount,
      created_at: row.created_at,
      customer_name: row.customer_name,
      customer_email: row.customer_email,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use launchcraft::models::{ProductStatus, Stage};

  fn row(stage: &str) -> ProductRow {
    ProductRow {
      id: Uuid::new_v4(),
      name: "TextN".to_string(),
      description: String::new(),
      short_description: String::new(),
      price: Decimal::new(2999, 2),
      cover_image_url: None,
      preview_url: None,
      download_url: None,
      category_id: None,
      category_name: None,
      product_type: "ai".to_string(),
      stage: stage.to_string(),
      market_type: "b2c".to_string(),
      market_scope: "global".to_string(),
      features: Vec::new(),
      tech_stack: Vec::new(),
      status: "inactive".to_string(),
      created_at: Utc::now(),
    }
  }

  #[test]
  fn text_columns_parse_into_enums() {
    let product = Product::try_from(row("pre_revenue")).unwrap();
    assert_eq!(product.stage, Stage::PreRevenue);
    assert_eq!(product.status, ProductStatus::Inactive);
  }

  #[test]
  fn unknown_text_is_a_store_failure() {
    let err = Product::try_from(row("unicorn")).unwrap_err();
    assert!(matches!(err, Error::Store { operation: "decode_row", .. }));
  }
}
