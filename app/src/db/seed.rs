// app/src/db/seed.rs

//! Demo catalog for fresh installations. Seeding is idempotent: existing categories and
//! products (matched by name) are left alone.

use launchcraft::models::{MarketScope, MarketType, NewProduct, ProductQuery, ProductType, Stage};
use launchcraft::{Result, Store};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument};

const CATEGORIES: [&str; 4] = ["AI", "Fintech", "Gaming", "Productivity"];

struct DemoProduct {
  name: &'static str,
  short: &'static str,
  description: &'static str,
  cents: i64,
  category: &'static str,
  product_type: ProductType,
  stage: Stage,
  market_type: MarketType,
  market_scope: MarketScope,
  features: &'static [&'static str],
  stack: &'static [&'static str],
}

const PRODUCTS: [DemoProduct; 4] = [
  DemoProduct {
    name: "TextN",
    short: "AI writing assistant for founders",
    description: "Drafts investor updates, landing copy and support replies from short prompts.",
    cents: 2999,
    category: "AI",
    product_type: ProductType::Ai,
    stage: Stage::Revenue,
    market_type: MarketType::B2c,
    market_scope: MarketScope::Global,
    features: &["Prompt library", "Tone control", "Team workspaces", "Export to docs"],
    stack: &["React", "Node.js", "PostgreSQL", "OpenAI", "Stripe"],
  },
  DemoProduct {
    name: "Friv",
    short: "Casual browser games portal",
    description: "A ready-to-launch games portal with ad slots and a lightweight admin.",
    cents: 4900,
    category: "Gaming",
    product_type: ProductType::Web,
    stage: Stage::Growth,
    market_type: MarketType::B2c,
    market_scope: MarketScope::Global,
    features: &["Game catalog", "Ad placements", "Leaderboards"],
    stack: &["Next.js", "Redis", "PostgreSQL"],
  },
  DemoProduct {
    name: "LedgerLite",
    short: "Bookkeeping for small shops",
    description: "Invoices, expenses and a monthly close checklist for local businesses.",
    cents: 7900,
    category: "Fintech",
    product_type: ProductType::Fintech,
    stage: Stage::PreRevenue,
    market_type: MarketType::B2b,
    market_scope: MarketScope::Local,
    features: &["Invoicing", "Expense capture", "Bank import", "Tax export", "Multi-currency"],
    stack: &["Vue", "Go", "PostgreSQL", "Plaid"],
  },
  DemoProduct {
    name: "LaunchBoard",
    short: "MVP launch checklist and tracker",
    description: "Plan an MVP launch week with task templates and a public roadmap page.",
    cents: 1900,
    category: "Productivity",
    product_type: ProductType::Saas,
    stage: Stage::Mvp,
    market_type: MarketType::B2b2c,
    market_scope: MarketScope::National,
    features: &["Launch templates", "Roadmap page"],
    stack: &["Svelte", "Supabase"],
  },
];

/// Inserts the demo categories and products that are not present yet.
/// Returns how many products were added.
#[instrument(name = "db::seed", skip(store), err(Display))]
pub async fn seed_demo_catalog(store: &dyn Store) -> Result<usize> {
  let mut categories: HashMap<String, uuid::Uuid> = store
    .list_categories()
    .await?
    .into_iter()
    .map(|c| (c.name, c.id))
    .collect();
  for name in CATEGORIES {
    if !categories.contains_key(name) {
      let created = store.insert_category(name).await?;
      categories.insert(created.name, created.id);
    }
  }

  let existing: HashSet<String> = store
    .list_products(ProductQuery::any_status())
    .await?
    .into_iter()
    .map(|p| p.name)
    .collect();

  let mut added = 0;
  for demo in PRODUCTS.iter().filter(|d| !existing.contains(d.name)) {
    store
      .insert_product(NewProduct {
        name: demo.name.to_string(),
        description: demo.description.to_string(),
        short_description: demo.short.to_string(),
        price: Decimal::new(demo.cents, 2),
        cover_image_url: None,
        preview_url: None,
        download_url: Some(format!("https://downloads.launchcraft.dev/{}.zip", demo.name.to_lowercase())),
        category_id: categories.get(demo.category).copied(),
        product_type: demo.product_type,
        stage: demo.stage,
        market_type: demo.market_type,
        market_scope: demo.market_scope,
        features: demo.features.iter().map(|s| s.to_string()).collect(),
        tech_stack: demo.stack.iter().map(|s| s.to_string()).collect(),
        status: None,
      })
      .await?;
    added += 1;
  }

  info!(added, "Demo catalog seeded.");
  Ok(added)
}
