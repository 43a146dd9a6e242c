// core/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

wire_enum! {
  pub enum ProductType {
    Saas => "saas",
    Mobile => "mobile",
    Web => "web",
    Ai => "ai",
    Fintech => "fintech",
  }
}

wire_enum! {
  pub enum Stage {
    Idea => "idea",
    Mvp => "mvp",
    PreRevenue => "pre_revenue",
    Revenue => "revenue",
    Growth => "growth",
  }
}

wire_enum! {
  pub enum MarketType {
    B2b => "b2b",
    B2c => "b2c",
    B2b2c => "b2b2c",
  }
}

wire_enum! {
  pub enum MarketScope {
    Local => "local",
    National => "national",
    Global => "global",
  }
}

wire_enum! {
  /// Soft-delete flag. Products are never removed, only deactivated.
  pub enum ProductStatus {
    Active => "active",
    Inactive => "inactive",
  }
}

impl ProductStatus {
  pub fn toggled(self) -> Self {
    match self {
      ProductStatus::Active => ProductStatus::Inactive,
      ProductStatus::Inactive => ProductStatus::Active,
    }
  }
}

impl Stage {
  /// Badge text, e.g. `PRE REVENUE`.
  pub fn label(&self) -> String {
    self.as_str().replace('_', " ").to_uppercase()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id: Uuid,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub short_description: String,
  pub price: Decimal,
  pub cover_image_url: Option<String>,
  pub preview_url: Option<String>,
  pub download_url: Option<String>,
  pub category_id: Option<Uuid>,
  // Embedded from the categories relation; absent when the category row is gone.
  pub category_name: Option<String>,
  pub product_type: ProductType,
  pub stage: Stage,
  pub market_type: MarketType,
  pub market_scope: MarketScope,
  pub features: Vec<String>,
  pub tech_stack: Vec<String>,
  pub status: ProductStatus,
  pub created_at: DateTime<Utc>,
}

/// The first few features of a product plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeaturePreview<'a> {
  pub shown: &'a [String],
  pub remaining: usize,
}

impl Product {
  pub const FEATURE_PREVIEW_LEN: usize = 3;
  pub const STACK_PREVIEW_LEN: usize = 4;

  pub fn is_active(&self) -> bool {
    self.status == ProductStatus::Active
  }

  pub fn feature_preview(&self) -> FeaturePreview<'_> {
    let cut = self.features.len().min(Self::FEATURE_PREVIEW_LEN);
    FeaturePreview {
      shown: &self.features[..cut],
      remaining: self.features.len() - cut,
    }
  }

  pub fn stack_preview(&self) -> &[String] {
    let cut = self.tech_stack.len().min(Self::STACK_PREVIEW_LEN);
    &self.tech_stack[..cut]
  }
}

/// Read filter passed to the store. `status: None` returns every product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductQuery {
  pub status: Option<ProductStatus>,
}

impl ProductQuery {
  pub fn active() -> Self {
    Self {
      status: Some(ProductStatus::Active),
    }
  }

  pub fn any_status() -> Self {
    Self::default()
  }
}

/// Payload for creating a catalog entry from the admin panel.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub short_description: String,
  pub price: Decimal,
  pub cover_image_url: Option<String>,
  pub preview_url: Option<String>,
  pub download_url: Option<String>,
  pub category_id: Option<Uuid>,
  pub product_type: ProductType,
  pub stage: Stage,
  pub market_type: MarketType,
  pub market_scope: MarketScope,
  #[serde(default)]
  pub features: Vec<String>,
  #[serde(default)]
  pub tech_stack: Vec<String>,
  pub status: Option<ProductStatus>,
}

impl NewProduct {
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::validation("Product name is required."));
    }
    if self.price.is_sign_negative() {
      return Err(Error::validation("Product price cannot be negative."));
    }
    Ok(())
  }
}
