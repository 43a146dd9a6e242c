// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use chrono::{Duration, Utc};
use launchcraft::models::{
  Account, Category, MarketScope, MarketType, NewProduct, Order, OrderItem, OrderStatus, Product, ProductStatus,
  ProductType, Profile, Stage,
};
use launchcraft::{MemoryStore, Store};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

// --- Product fixtures ---

pub fn product(name: &str, description: &str) -> Product {
  Product {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: description.to_string(),
    short_description: String::new(),
    price: Decimal::new(4900, 2),
    cover_image_url: None,
    preview_url: None,
    download_url: None,
    category_id: None,
    category_name: None,
    product_type: ProductType::Saas,
    stage: Stage::Mvp,
    market_type: MarketType::B2b,
    market_scope: MarketScope::Global,
    features: Vec::new(),
    tech_stack: Vec::new(),
    status: ProductStatus::Active,
    created_at: Utc::now(),
  }
}

pub fn in_category(mut product: Product, category: &Category) -> Product {
  product.category_id = Some(category.id);
  product.category_name = Some(category.name.clone());
  product
}

pub fn category(name: &str) -> Category {
  Category {
    id: Uuid::new_v4(),
    name: name.to_string(),
  }
}

pub fn new_product(name: &str, category_id: Option<Uuid>) -> NewProduct {
  NewProduct {
    name: name.to_string(),
    description: format!("{} long description", name),
    short_description: format!("{} in one line", name),
    price: Decimal::new(2999, 2),
    cover_image_url: None,
    preview_url: None,
    download_url: Some(format!("https://downloads.example.com/{}", name.to_lowercase())),
    category_id,
    product_type: ProductType::Ai,
    stage: Stage::Revenue,
    market_type: MarketType::B2c,
    market_scope: MarketScope::National,
    features: vec!["Search".to_string()],
    tech_stack: vec!["Rust".to_string()],
    status: None,
  }
}

/// A product mix covering every selector, in fetch order (newest first).
pub fn mixed_catalog() -> Vec<Product> {
  let ai = category("AI");
  let gaming = category("Gaming");
  let mut out = Vec::new();

  let mut textn = in_category(product("TextN", "Summarise any document with AI"), &ai);
  textn.product_type = ProductType::Ai;
  textn.stage = Stage::Revenue;
  out.push(textn);

  let mut friv = in_category(product("Friv", "Casual browser games portal"), &gaming);
  friv.product_type = ProductType::Web;
  friv.market_type = MarketType::B2c;
  out.push(friv);

  let mut ledger = product("LedgerLite", "Bookkeeping for small shops, powered by textn OCR");
  ledger.product_type = ProductType::Fintech;
  ledger.stage = Stage::PreRevenue;
  ledger.market_scope = MarketScope::Local;
  out.push(ledger);

  let mut pocket = in_category(product("PocketCoach", "Mobile habit tracker"), &ai);
  pocket.product_type = ProductType::Mobile;
  pocket.stage = Stage::Growth;
  pocket.market_type = MarketType::B2b2c;
  pocket.market_scope = MarketScope::National;
  out.push(pocket);

  let mut base = now_minus(out.len() as i64);
  for p in out.iter_mut() {
    p.created_at = base;
    base = base - Duration::minutes(1);
  }
  out
}

fn now_minus(minutes: i64) -> chrono::DateTime<Utc> {
  Utc::now() - Duration::minutes(minutes)
}

// --- Order fixtures ---

pub fn order(user_id: Uuid, status: OrderStatus, total_cents: i64, item_count: usize) -> Order {
  let order_id = Uuid::new_v4();
  let unit = if item_count == 0 {
    Decimal::ZERO
  } else {
    Decimal::new(total_cents, 2) / Decimal::from(item_count as i64)
  };
  Order {
    id: order_id,
    user_id,
    total_amount: Decimal::new(total_cents, 2),
    status,
    created_at: Utc::now(),
    items: (0..item_count)
      .map(|_| OrderItem {
        id: Uuid::new_v4(),
        order_id,
        product_id: Uuid::new_v4(),
        quantity: 1,
        price: unit,
        product_name: None,
        download_url: None,
      })
      .collect(),
  }
}

// --- Store fixtures ---

pub fn memory_store() -> Arc<MemoryStore> {
  Arc::new(MemoryStore::new())
}

/// Creates an account plus its profile.
pub async fn member(store: &MemoryStore, email: &str, full_name: Option<&str>) -> Account {
  let account = store.create_account(email, "not-a-real-hash").await.unwrap();
  let mut profile = Profile::blank(account.id, email, account.created_at);
  profile.full_name = full_name.map(str::to_string);
  store.upsert_profile(profile).await.unwrap();
  account
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
