// tests/admin_tests.rs
mod common;

use common::*;
use async_trait::async_trait;
use launchcraft::models::{
  Account, AdminUser, Category, NewProduct, Order, OrderStatus, OrderSummary, Product, ProductQuery, ProductStatus,
  Profile, UserRole,
};
use launchcraft::{AdminConsole, Catalog, CatalogFilter, Error, MemoryStore, Result, SessionRegistry, Store};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Holds the first `list_orders` call until released, so a fetch can be overtaken mid-flight.
struct GatedStore {
  inner: Arc<MemoryStore>,
  gate: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
}

impl GatedStore {
  /// Returns the store, a receiver fired once the held call is waiting, and its release switch.
  fn new(inner: Arc<MemoryStore>) -> (Self, oneshot::Receiver<()>, oneshot::Sender<()>) {
    let (entered_tx, entered_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel();
    let store = Self {
      inner,
      gate: Mutex::new(Some((entered_tx, release_rx))),
    };
    (store, entered_rx, release_tx)
  }
}

#[async_trait]
impl Store for GatedStore {
  async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>> {
    self.inner.list_products(query).await
  }
  async fn fetch_product(&self, product_id: Uuid) -> Result<Option<Product>> {
    self.inner.fetch_product(product_id).await
  }
  async fn list_categories(&self) -> Result<Vec<Category>> {
    self.inner.list_categories().await
  }
  async fn insert_category(&self, name: &str) -> Result<Category> {
    self.inner.insert_category(name).await
  }
  async fn insert_product(&self, product: NewProduct) -> Result<Product> {
    self.inner.insert_product(product).await
  }
  async fn update_product_status(&self, product_id: Uuid, status: ProductStatus) -> Result<()> {
    self.inner.update_product_status(product_id, status).await
  }
  async fn create_account(&self, email: &str, password_hash: &str) -> Result<Account> {
    self.inner.create_account(email, password_hash).await
  }
  async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
    self.inner.find_account_by_email(email).await
  }
  async fn fetch_account(&self, user_id: Uuid) -> Result<Option<Account>> {
    self.inner.fetch_account(user_id).await
  }
  async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    self.inner.fetch_profile(user_id).await
  }
  async fn upsert_profile(&self, profile: Profile) -> Result<()> {
    self.inner.upsert_profile(profile).await
  }
  async fn list_profiles(&self) -> Result<Vec<AdminUser>> {
    self.inner.list_profiles().await
  }
  async fn list_roles(&self, user_id: Uuid) -> Result<Vec<UserRole>> {
    self.inner.list_roles(user_id).await
  }
  async fn insert_role(&self, user_id: Uuid, role: &str) -> Result<()> {
    self.inner.insert_role(user_id, role).await
  }
  async fn delete_role(&self, user_id: Uuid, role: &str) -> Result<()> {
    self.inner.delete_role(user_id, role).await
  }
  async fn list_orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    self.inner.list_orders_for_user(user_id).await
  }
  async fn list_orders(&self) -> Result<Vec<OrderSummary>> {
    let held = self.gate.lock().take();
    if let Some((entered, release)) = held {
      let _ = entered.send(());
      let _ = release.await;
    }
    self.inner.list_orders().await
  }
  async fn update_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<()> {
    self.inner.update_order_status(order_id, status).await
  }
}

async fn console_with_member() -> (Arc<MemoryStore>, AdminConsole, Uuid) {
  let store = memory_store();
  let account = member(&store, "ada@example.com", Some("Ada Lovelace")).await;
  let console = AdminConsole::new(store.clone());
  (store, console, account.id)
}

#[tokio::test]
async fn overview_stats_count_only_completed_revenue() {
  setup_tracing();
  let (store, console, user_id) = console_with_member().await;
  store.insert_product(new_product("TextN", None)).await.unwrap();
  store.insert_order(order(user_id, OrderStatus::Completed, 2999, 1));
  store.insert_order(order(user_id, OrderStatus::Pending, 9900, 2));
  store.insert_order(order(user_id, OrderStatus::Failed, 1000, 1));

  let overview = console.refresh().await.unwrap();
  assert_eq!(overview.stats.total_users, 1);
  assert_eq!(overview.stats.total_products, 1);
  assert_eq!(overview.stats.total_orders, 3);
  assert_eq!(overview.stats.total_revenue, Decimal::new(2999, 2));
  assert_eq!(overview.orders[0].customer_label(), "Ada Lovelace");
}

#[tokio::test]
async fn toggling_a_role_twice_restores_the_original_roles() {
  setup_tracing();
  let (store, console, user_id) = console_with_member().await;
  let before = store.list_roles(user_id).await.unwrap();
  assert!(before.is_empty());

  let granted = console.toggle_user_role(user_id).await.unwrap();
  assert_eq!(granted.notice.description, "User role updated to admin");
  assert!(!granted.stale);
  assert!(granted.overview.as_ref().unwrap().user(user_id).unwrap().is_admin());

  let revoked = console.toggle_user_role(user_id).await.unwrap();
  assert_eq!(revoked.notice.description, "User role updated to user");
  assert!(!revoked.overview.as_ref().unwrap().user(user_id).unwrap().is_admin());
  assert_eq!(store.list_roles(user_id).await.unwrap(), before);
}

#[tokio::test]
async fn toggling_status_twice_restores_catalog_membership() {
  setup_tracing();
  let store = memory_store();
  let console = AdminConsole::new(store.clone());
  let catalog = Catalog::new(store.clone());
  let product = store.insert_product(new_product("TextN", None)).await.unwrap();
  let everything = CatalogFilter::default();

  let visible = catalog.browse(&everything).await.unwrap();
  assert_eq!(visible.products.len(), 1);

  let hidden = console.toggle_product_status(product.id).await.unwrap();
  assert_eq!(hidden.notice.description, "Product status updated to inactive");
  assert!(catalog.browse(&everything).await.unwrap().no_results);
  // Inactive products stay listed for admins.
  assert_eq!(
    hidden.overview.unwrap().product(product.id).unwrap().status,
    ProductStatus::Inactive
  );

  console.toggle_product_status(product.id).await.unwrap();
  let restored = catalog.browse(&everything).await.unwrap();
  assert_eq!(restored.products, visible.products);
}

#[tokio::test]
async fn failed_mutation_leaves_overview_stale() {
  setup_tracing();
  let (store, console, user_id) = console_with_member().await;
  let product = store.insert_product(new_product("TextN", None)).await.unwrap();
  let published = console.refresh().await.unwrap();

  store.set_fail_writes(true);
  let err = console.toggle_product_status(product.id).await.unwrap_err();
  assert!(matches!(err, Error::Store { .. }));
  let err = console.toggle_user_role(user_id).await.unwrap_err();
  assert!(matches!(err, Error::Store { .. }));

  let current = console.overview().unwrap();
  assert!(Arc::ptr_eq(&current, &published));
  store.set_fail_writes(false);
  let stored = store.fetch_product(product.id).await.unwrap().unwrap();
  assert_eq!(stored.status, ProductStatus::Active);
}

#[tokio::test]
async fn failed_refetch_reports_stale_overview() {
  setup_tracing();
  let (store, console, user_id) = console_with_member().await;
  let pending = order(user_id, OrderStatus::Pending, 5000, 1);
  let order_id = pending.id;
  store.insert_order(pending);
  let published = console.refresh().await.unwrap();

  // The write lands but the follow-up fetch cannot.
  store.set_fail_reads(true);
  let outcome = console.set_order_status(order_id, OrderStatus::Completed).await.unwrap();
  assert!(outcome.stale);
  assert!(!outcome.notice.is_failure());
  assert!(Arc::ptr_eq(&outcome.overview.unwrap(), &published));
  assert_eq!(published.stats.total_revenue, Decimal::ZERO);

  store.set_fail_reads(false);
  let fresh = console.refresh().await.unwrap();
  assert_eq!(fresh.stats.total_revenue, Decimal::new(5000, 2));
}

#[tokio::test]
async fn unknown_product_toggle_is_not_found() {
  let store = memory_store();
  let console = AdminConsole::new(store);
  let err = console.toggle_product_status(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
  assert!(console.overview().is_none());
}

#[tokio::test]
async fn overtaken_refresh_keeps_the_newer_overview() {
  setup_tracing();
  let memory = memory_store();
  let (gated, entered, release) = GatedStore::new(memory.clone());
  let console = AdminConsole::new(Arc::new(gated));

  let older = console.refresh();
  let newer = async {
    // The older fetch has read an empty product list and is parked on its order read.
    entered.await.unwrap();
    memory.insert_product(new_product("TextN", None)).await.unwrap();
    let newer = console.refresh().await.unwrap();
    release.send(()).unwrap();
    newer
  };
  let (older, newer) = tokio::join!(older, newer);
  let older = older.unwrap();

  assert_eq!(newer.stats.total_products, 1);
  assert!(Arc::ptr_eq(&older, &newer));
  let current = console.overview().unwrap();
  assert!(Arc::ptr_eq(&current, &newer));
  assert_eq!(current.products[0].name, "TextN");
}

#[tokio::test]
async fn unknown_user_role_toggle_is_not_found() {
  setup_tracing();
  let (store, console, _) = console_with_member().await;
  let stranger = Uuid::new_v4();

  let err = console.toggle_user_role(stranger).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
  assert!(store.list_roles(stranger).await.unwrap().is_empty());
  assert!(console.overview().is_none());
}

#[tokio::test]
async fn created_products_validate_and_appear_in_overview() {
  setup_tracing();
  let store = memory_store();
  let console = AdminConsole::new(store.clone());
  let ai = store.insert_category("AI").await.unwrap();

  let outcome = console.create_product(new_product("TextN", Some(ai.id))).await.unwrap();
  let overview = outcome.overview.unwrap();
  assert_eq!(overview.products.len(), 1);
  assert_eq!(overview.products[0].category_name.as_deref(), Some("AI"));

  let mut nameless = new_product("", None);
  nameless.name = "   ".to_string();
  assert!(matches!(console.create_product(nameless).await, Err(Error::Validation(_))));

  let mut negative = new_product("Freebie", None);
  negative.price = Decimal::new(-1, 0);
  assert!(matches!(console.create_product(negative).await, Err(Error::Validation(_))));
  assert_eq!(store.list_products(ProductQuery::any_status()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn order_status_changes_feed_revenue() {
  setup_tracing();
  let (store, console, user_id) = console_with_member().await;
  let pending = order(user_id, OrderStatus::Pending, 5000, 1);
  let order_id = pending.id;
  store.insert_order(pending);

  assert_eq!(console.refresh().await.unwrap().stats.total_revenue, Decimal::ZERO);
  let outcome = console.set_order_status(order_id, OrderStatus::Completed).await.unwrap();
  assert_eq!(outcome.overview.unwrap().stats.total_revenue, Decimal::new(5000, 2));
}

#[tokio::test]
async fn role_toggle_refreshes_open_sessions() {
  setup_tracing();
  let (store, _, user_id) = console_with_member().await;
  let sessions = SessionRegistry::new(store.clone());
  let console = AdminConsole::new(store.clone()).with_sessions(sessions.clone());
  let account = store.fetch_account(user_id).await.unwrap().unwrap();

  let (token, session) = sessions.open(&account).await.unwrap();
  assert!(!session.is_admin);
  assert!(matches!(sessions.require_admin(&token), Err(Error::Forbidden(_))));

  console.toggle_user_role(user_id).await.unwrap();
  assert!(sessions.require_admin(&token).unwrap().is_admin);
  // The snapshot handed out earlier is unchanged.
  assert!(!session.is_admin);
}
