// core/src/store/memory.rs

//! In-process [`Store`] used by tests and by the server's `memory` backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::cmp::Reverse;
use tracing::{debug, warn};
use uuid::Uuid;

use super::Store;
use crate::error::{Error, Result};
use crate::models::{
  Account, AdminUser, Category, NewProduct, Order, OrderStatus, OrderSummary, Product, ProductQuery, ProductStatus,
  Profile, UserRole,
};

#[derive(Default)]
struct Tables {
  categories: Vec<Category>,
  products: Vec<Product>,
  accounts: Vec<Account>,
  profiles: Vec<Profile>,
  roles: Vec<UserRole>,
  orders: Vec<Order>,
}

#[derive(Default)]
struct Faults {
  reads: bool,
  writes: bool,
}

#[derive(Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
  faults: RwLock<Faults>,
}

// Newest first; rows inserted later win ties.
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
  let mut out: Vec<T> = rows.iter().rev().cloned().collect();
  out.sort_by_key(|row| Reverse(created_at(row)));
  out
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Makes every subsequent read fail until switched off.
  pub fn set_fail_reads(&self, fail: bool) {
    self.faults.write().reads = fail;
  }

  /// Makes every subsequent write fail until switched off.
  pub fn set_fail_writes(&self, fail: bool) {
    self.faults.write().writes = fail;
  }

  /// Stores an order as-is. Checkout is not part of the storefront, so orders only enter the
  /// store through seeding.
  pub fn insert_order(&self, order: Order) {
    self.tables.write().orders.push(order);
  }

  fn check_read(&self, operation: &'static str) -> Result<()> {
    if self.faults.read().reads {
      warn!(operation, "Simulated read failure.");
      return Err(Error::store(operation, anyhow::anyhow!("simulated read failure")));
    }
    Ok(())
  }

  fn check_write(&self, operation: &'static str) -> Result<()> {
    if self.faults.read().writes {
      warn!(operation, "Simulated write failure.");
      return Err(Error::store(operation, anyhow::anyhow!("simulated write failure")));
    }
    Ok(())
  }
}

impl Tables {
  fn with_category_name(&self, mut product: Product) -> Product {
    product.category_name = product
      .category_id
      .and_then(|id| self.categories.iter().find(|c| c.id == id))
      .map(|c| c.name.clone());
    product
  }

  fn with_product_refs(&self, mut order: Order) -> Order {
    for item in &mut order.items {
      if let Some(product) = self.products.iter().find(|p| p.id == item.product_id) {
        item.product_name = Some(product.name.clone());
        item.download_url = product.download_url.clone();
      }
    }
    order
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>> {
    self.check_read("list_products")?;
    let tables = self.tables.read();
    let matching: Vec<Product> = tables
      .products
      .iter()
      .filter(|p| query.status.map_or(true, |status| p.status == status))
      .cloned()
      .collect();
    Ok(
      newest_first(&matching, |p| p.created_at)
        .into_iter()
        .map(|p| tables.with_category_name(p))
        .collect(),
    )
  }

  async fn fetch_product(&self, product_id: Uuid) -> Result<Option<Product>> {
    self.check_read("fetch_product")?;
    let tables = self.tables.read();
    Ok(
      tables
        .products
        .iter()
        .find(|p| p.id == product_id)
        .cloned()
        .map(|p| tables.with_category_name(p)),
    )
  }

  async fn list_categories(&self) -> Result<Vec<Category>> {
    self.check_read("list_categories")?;
    let mut categories = self.tables.read().categories.clone();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(categories)
  }

  async fn insert_category(&self, name: &str) -> Result<Category> {
    self.check_write("insert_category")?;
    let category = Category {
      id: Uuid::new_v4(),
      name: name.to_string(),
    };
    self.tables.write().categories.push(category.clone());
    debug!(category_id = %category.id, "Category inserted.");
    Ok(category)
  }

  async fn insert_product(&self, product: NewProduct) -> Result<Product> {
    self.check_write("insert_product")?;
    let mut tables = self.tables.write();
    let row = Product {
      id: Uuid::new_v4(),
      name: product.name,
      description: product.description,
      short_description: product.short_description,
      price: product.price,
      cover_image_url: product.cover_image_url,
      preview_url: product.preview_url,
      download_url: product.download_url,
      category_id: product.category_id,
      category_name: None,
      product_type: product.product_type,
      stage: product.stage,
      market_type: product.market_type,
      market_scope: product.market_scope,
      features: product.features,
      tech_stack: product.tech_stack,
      status: product.status.unwrap_or(ProductStatus::Active),
      created_at: Utc::now(),
    };
    tables.products.push(row.clone());
    debug!(product_id = %row.id, "Product inserted.");
    Ok(tables.with_category_name(row))
  }

  async fn update_product_status(&self, product_id: Uuid, status: ProductStatus) -> Result<()> {
    self.check_write("update_product_status")?;
    let mut tables = self.tables.write();
    let product = tables
      .products
      .iter_mut()
      .find(|p| p.id == product_id)
      .ok_or_else(|| Error::not_found(format!("Product with ID {} not found.", product_id)))?;
    product.status = status;
    Ok(())
  }

  async fn create_account(&self, email: &str, password_hash: &str) -> Result<Account> {
    self.check_write("create_account")?;
    let mut tables = self.tables.write();
    if tables.accounts.iter().any(|a| a.email.eq_ignore_ascii_case(email)) {
      return Err(Error::validation("An account with this email already exists."));
    }
    let account = Account {
      id: Uuid::new_v4(),
      email: email.to_string(),
      password_hash: password_hash.to_string(),
      created_at: Utc::now(),
    };
    tables.accounts.push(account.clone());
    Ok(account)
  }

  async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
    self.check_read("find_account_by_email")?;
    Ok(
      self
        .tables
        .read()
        .accounts
        .iter()
        .find(|a| a.email.eq_ignore_ascii_case(email))
        .cloned(),
    )
  }

  async fn fetch_account(&self, user_id: Uuid) -> Result<Option<Account>> {
    self.check_read("fetch_account")?;
    Ok(self.tables.read().accounts.iter().find(|a| a.id == user_id).cloned())
  }

  async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    self.check_read("fetch_profile")?;
    Ok(self.tables.read().profiles.iter().find(|p| p.user_id == user_id).cloned())
  }

  async fn upsert_profile(&self, profile: Profile) -> Result<()> {
    self.check_write("upsert_profile")?;
    let mut tables = self.tables.write();
    match tables.profiles.iter_mut().find(|p| p.user_id == profile.user_id) {
      Some(existing) => *existing = profile,
      None => tables.profiles.push(profile),
    }
    Ok(())
  }

  async fn list_profiles(&self) -> Result<Vec<AdminUser>> {
    self.check_read("list_profiles")?;
    let tables = self.tables.read();
    Ok(
      newest_first(&tables.profiles, |p| p.created_at)
        .into_iter()
        .map(|profile| {
          let roles = tables
            .roles
            .iter()
            .filter(|r| r.user_id == profile.user_id)
            .map(|r| r.role.clone())
            .collect();
          AdminUser { profile, roles }
        })
        .collect(),
    )
  }

  async fn list_roles(&self, user_id: Uuid) -> Result<Vec<UserRole>> {
    self.check_read("list_roles")?;
    Ok(
      self
        .tables
        .read()
        .roles
        .iter()
        .filter(|r| r.user_id == user_id)
        .cloned()
        .collect(),
    )
  }

  async fn insert_role(&self, user_id: Uuid, role: &str) -> Result<()> {
    self.check_write("insert_role")?;
    let mut tables = self.tables.write();
    if !tables.accounts.iter().any(|a| a.id == user_id) {
      return Err(Error::not_found(format!("User with ID {} not found.", user_id)));
    }
    if tables.roles.iter().any(|r| r.user_id == user_id && r.role == role) {
      debug!(%user_id, role, "Role row already present.");
      return Ok(());
    }
    tables.roles.push(UserRole {
      user_id,
      role: role.to_string(),
    });
    Ok(())
  }

  async fn delete_role(&self, user_id: Uuid, role: &str) -> Result<()> {
    self.check_write("delete_role")?;
    self
      .tables
      .write()
      .roles
      .retain(|r| !(r.user_id == user_id && r.role == role));
    Ok(())
  }

  async fn list_orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    self.check_read("list_orders_for_user")?;
    let tables = self.tables.read();
    let owned: Vec<Order> = tables.orders.iter().filter(|o| o.user_id == user_id).cloned().collect();
    Ok(
      newest_first(&owned, |o| o.created_at)
        .into_iter()
        .map(|o| tables.with_product_refs(o))
        .collect(),
    )
  }

  async fn list_orders(&self) -> Result<Vec<OrderSummary>> {
    self.check_read("list_orders")?;
    let tables = self.tables.read();
    Ok(
      newest_first(&tables.orders, |o| o.created_at)
        .into_iter()
        .map(|order| {
          let profile = tables.profiles.iter().find(|p| p.user_id == order.user_id);
          OrderSummary {
            id: order.id,
            user_id: order.user_id,
            total_amount: order.total_amount,
            status: order.status,
            created_at: order.created_at,
            customer_name: profile.and_then(|p| p.full_name.clone()),
            customer_email: profile.and_then(|p| p.email.clone()),
          }
        })
        .collect(),
    )
  }

  async fn update_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<()> {
    self.check_write("update_order_status")?;
    let mut tables = self.tables.write();
    let order = tables
      .orders
      .iter_mut()
      .find(|o| o.id == order_id)
      .ok_or_else(|| Error::not_found(format!("Order with ID {} not found.", order_id)))?;
    order.status = status;
    Ok(())
  }
}
