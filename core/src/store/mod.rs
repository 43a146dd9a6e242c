// core/src/store/mod.rs

//! The persistence boundary.
//!
//! Every read and write the storefront performs goes through [`Store`]. Implementations decide
//! how rows are kept; callers rely only on the ordering and idempotency rules documented on each
//! method. Failures surface as [`Error::Store`](crate::Error::Store).

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
  Account, AdminUser, Category, NewProduct, Order, OrderStatus, OrderSummary, Product, ProductQuery, ProductStatus,
  Profile, UserRole,
};

pub mod memory;

pub use memory::MemoryStore;

#[async_trait]
pub trait Store: Send + Sync {
  // --- Catalog ---

  /// Products matching `query`, newest first, with the category name embedded.
  async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>>;

  async fn fetch_product(&self, product_id: Uuid) -> Result<Option<Product>>;

  /// All categories ordered by name.
  async fn list_categories(&self) -> Result<Vec<Category>>;

  async fn insert_category(&self, name: &str) -> Result<Category>;

  async fn insert_product(&self, product: NewProduct) -> Result<Product>;

  /// Assigns `status`. Updating a missing product is a `NotFound` error.
  async fn update_product_status(&self, product_id: Uuid, status: ProductStatus) -> Result<()>;

  // --- Accounts, profiles and roles ---

  async fn create_account(&self, email: &str, password_hash: &str) -> Result<Account>;

  /// Case-insensitive lookup.
  async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>>;

  async fn fetch_account(&self, user_id: Uuid) -> Result<Option<Account>>;

  async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>>;

  /// Inserts the profile or replaces the existing one for the same user.
  async fn upsert_profile(&self, profile: Profile) -> Result<()>;

  /// Every profile with its role rows, newest first.
  async fn list_profiles(&self) -> Result<Vec<AdminUser>>;

  async fn list_roles(&self, user_id: Uuid) -> Result<Vec<UserRole>>;

  /// Adds the role row unless the same `(user_id, role)` row already exists. The account must
  /// exist; a missing one is a `NotFound` error.
  async fn insert_role(&self, user_id: Uuid, role: &str) -> Result<()>;

  /// Removes the role row; removing an absent row succeeds.
  async fn delete_role(&self, user_id: Uuid, role: &str) -> Result<()>;

  // --- Orders ---

  /// One user's orders, newest first, each with its items and product references.
  async fn list_orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>>;

  /// Every order with the customer's name and email, newest first.
  async fn list_orders(&self) -> Result<Vec<OrderSummary>>;

  async fn update_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<()>;
}
