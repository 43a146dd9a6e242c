// app/src/db/pg_store.rs

//! Postgres implementation of the storefront [`Store`], using runtime-checked sqlx queries.

use async_trait::async_trait;
use launchcraft::models::{
  Account, AdminUser, Category, NewProduct, Order, OrderItem, OrderStatus, OrderSummary, Product, ProductQuery,
  ProductStatus, Profile, UserRole,
};
use launchcraft::{Error, Result, Store};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::rows::{
  AccountRow, OrderItemRow, OrderRow, OrderSummaryRow, ProductRow, ProfileRow, PRODUCT_COLUMNS,
};

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

// Grouping by order keeps each order's items in `line_no` order.
const ORDER_ITEMS_SQL: &str = "SELECT i.id, i.order_id, i.product_id, i.quantity, i.price, \
   p.name AS product_name, p.download_url \
   FROM order_items i LEFT JOIN products p ON p.id = i.product_id WHERE i.order_id = ANY($1) \
   ORDER BY i.order_id, i.line_no";

// Tags a sqlx failure with the store operation that raised it.
fn db(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Error {
  move |e| Error::store(operation, e)
}

#[derive(sqlx::FromRow)]
struct RoleRow {
  user_id: Uuid,
  role: String,
}

#[async_trait]
impl Store for PgStore {
  #[instrument(name = "pg_store::list_products", skip(self), err(Display))]
  async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>> {
    let sql = format!(
      "SELECT {} FROM products p LEFT JOIN categories c ON c.id = p.category_id \
       WHERE ($1::text IS NULL OR p.status = $1) ORDER BY p.created_at DESC",
      PRODUCT_COLUMNS
    );
    let rows: Vec<ProductRow> = sqlx::query_as(&sql)
      .bind(query.status.map(|s| s.as_str()))
      .fetch_all(&self.pool)
      .await
      .map_err(db("list_products"))?;
    debug!(count = rows.len(), "Fetched product rows.");
    rows.into_iter().map(Product::try_from).collect()
  }

  #[instrument(name = "pg_store::fetch_product", skip(self), err(Display))]
  async fn fetch_product(&self, product_id: Uuid) -> Result<Option<Product>> {
    let sql = format!(
      "SELECT {} FROM products p LEFT JOIN categories c ON c.id = p.category_id WHERE p.id = $1",
      PRODUCT_COLUMNS
    );
    let row: Option<ProductRow> = sqlx::query_as(&sql)
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(db("fetch_product"))?;
    row.map(Product::try_from).transpose()
  }

  async fn list_categories(&self) -> Result<Vec<Category>> {
    let rows: Vec<(Uuid, String)> = sqlx::query_as("SELECT id, name FROM categories ORDER BY name ASC")
      .fetch_all(&self.pool)
      .await
      .map_err(db("list_categories"))?;
    Ok(rows.into_iter().map(|(id, name)| Category { id, name }).collect())
  }

  async fn insert_category(&self, name: &str) -> Result<Category> {
    let (id, name): (Uuid, String) = sqlx::query_as(
      "INSERT INTO categories (name) VALUES ($1) \
       ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id, name",
    )
    .bind(name)
    .fetch_one(&self.pool)
    .await
    .map_err(db("insert_category"))?;
    Ok(Category { id, name })
  }

  #[instrument(name = "pg_store::insert_product", skip(self, product), fields(name = %product.name), err(Display))]
  async fn insert_product(&self, product: NewProduct) -> Result<Product> {
    let id: Uuid = sqlx::query_scalar(
      "INSERT INTO products (name, description, short_description, price, cover_image_url, preview_url, \
       download_url, category_id, product_type, stage, market_type, market_scope, features, tech_stack, status) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) RETURNING id",
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.short_description)
    .bind(product.price)
    .bind(&product.cover_image_url)
    .bind(&product.preview_url)
    .bind(&product.download_url)
    .bind(product.category_id)
    .bind(product.product_type.as_str())
    .bind(product.stage.as_str())
    .bind(product.market_type.as_str())
    .bind(product.market_scope.as_str())
    .bind(&product.features)
    .bind(&product.tech_stack)
    .bind(product.status.unwrap_or(ProductStatus::Active).as_str())
    .fetch_one(&self.pool)
    .await
    .map_err(db("insert_product"))?;

    self
      .fetch_product(id)
      .await?
      .ok_or_else(|| Error::not_found(format!("Product with ID {} not found after insert.", id)))
  }

  #[instrument(name = "pg_store::update_product_status", skip(self), err(Display))]
  async fn update_product_status(&self, product_id: Uuid, status: ProductStatus) -> Result<()> {
    let result = sqlx::query("UPDATE products SET status = $2 WHERE id = $1")
      .bind(product_id)
      .bind(status.as_str())
      .execute(&self.pool)
      .await
      .map_err(db("update_product_status"))?;
    if result.rows_affected() == 0 {
      return Err(Error::not_found(format!("Product with ID {} not found.", product_id)));
    }
    Ok(())
  }

  #[instrument(name = "pg_store::create_account", skip(self, password_hash), err(Display))]
  async fn create_account(&self, email: &str, password_hash: &str) -> Result<Account> {
    let row: AccountRow = sqlx::query_as(
      "INSERT INTO accounts (email, password_hash) VALUES ($1, $2) RETURNING id, email, password_hash, created_at",
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| match &e {
      sqlx::Error::Database(dbe) if dbe.is_unique_violation() => {
        warn!("Attempt to create an account with an existing email.");
        Error::validation("An account with this email already exists.")
      }
      _ => Error::store("create_account", e),
    })?;
    Ok(row.into())
  }

  async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
    let row: Option<AccountRow> = sqlx::query_as(
      "SELECT id, email, password_hash, created_at FROM accounts WHERE lower(email) = lower($1)",
    )
    .bind(email)
    .fetch_optional(&self.pool)
    .await
    .map_err(db("find_account_by_email"))?;
    Ok(row.map(Account::from))
  }

  async fn fetch_account(&self, user_id: Uuid) -> Result<Option<Account>> {
    let row: Option<AccountRow> =
      sqlx::query_as("SELECT id, email, password_hash, created_at FROM accounts WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db("fetch_account"))?;
    Ok(row.map(Account::from))
  }

  async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    let row: Option<ProfileRow> = sqlx::query_as(
      "SELECT user_id, full_name, email, company, role, bio, created_at FROM profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(db("fetch_profile"))?;
    Ok(row.map(Profile::from))
  }

  #[instrument(name = "pg_store::upsert_profile", skip(self, profile), fields(user_id = %profile.user_id), err(Display))]
  async fn upsert_profile(&self, profile: Profile) -> Result<()> {
    sqlx::query(
      "INSERT INTO profiles (user_id, full_name, email, company, role, bio, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7) \
       ON CONFLICT (user_id) DO UPDATE SET full_name = EXCLUDED.full_name, email = EXCLUDED.email, \
       company = EXCLUDED.company, role = EXCLUDED.role, bio = EXCLUDED.bio",
    )
    .bind(profile.user_id)
    .bind(&profile.full_name)
    .bind(&profile.email)
    .bind(&profile.company)
    .bind(&profile.role)
    .bind(&profile.bio)
    .bind(profile.created_at)
    .execute(&self.pool)
    .await
    .map_err(db("upsert_profile"))?;
    Ok(())
  }

  #[instrument(name = "pg_store::list_profiles", skip(self), err(Display))]
  async fn list_profiles(&self) -> Result<Vec<AdminUser>> {
    let profiles: Vec<ProfileRow> = sqlx::query_as(
      "SELECT user_id, full_name, email, company, role, bio, created_at FROM profiles ORDER BY created_at DESC",
    )
    .fetch_all(&self.pool)
    .await
    .map_err(db("list_profiles"))?;
    let roles: Vec<RoleRow> = sqlx::query_as("SELECT user_id, role FROM user_roles ORDER BY role")
      .fetch_all(&self.pool)
      .await
      .map_err(db("list_profiles"))?;

    let mut by_user: HashMap<Uuid, Vec<String>> = HashMap::new();
    for row in roles {
      by_user.entry(row.user_id).or_default().push(row.role);
    }
    Ok(
      profiles
        .into_iter()
        .map(|row| AdminUser {
          roles: by_user.remove(&row.user_id).unwrap_or_default(),
          profile: row.into(),
        })
        .collect(),
    )
  }

  async fn list_roles(&self, user_id: Uuid) -> Result<Vec<UserRole>> {
    let rows: Vec<RoleRow> = sqlx::query_as("SELECT user_id, role FROM user_roles WHERE user_id = $1")
      .bind(user_id)
      .fetch_all(&self.pool)
      .await
      .map_err(db("list_roles"))?;
    Ok(
      rows
        .into_iter()
        .map(|r| UserRole {
          user_id: r.user_id,
          role: r.role,
        })
        .collect(),
    )
  }

  #[instrument(name = "pg_store::insert_role", skip(self), err(Display))]
  async fn insert_role(&self, user_id: Uuid, role: &str) -> Result<()> {
    sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2) ON CONFLICT DO NOTHING")
      .bind(user_id)
      .bind(role)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        let unknown_user = e.as_database_error().is_some_and(|d| d.is_foreign_key_violation());
        if unknown_user {
          Error::not_found(format!("User with ID {} not found.", user_id))
        } else {
          Error::store("insert_role", e)
        }
      })?;
    Ok(())
  }

  #[instrument(name = "pg_store::delete_role", skip(self), err(Display))]
  async fn delete_role(&self, user_id: Uuid, role: &str) -> Result<()> {
    sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role = $2")
      .bind(user_id)
      .bind(role)
      .execute(&self.pool)
      .await
      .map_err(db("delete_role"))?;
    Ok(())
  }

  #[instrument(name = "pg_store::list_orders_for_user", skip(self), err(Display))]
  async fn list_orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    let orders: Vec<OrderRow> = sqlx::query_as(
      "SELECT id, user_id, total_amount, status, created_at FROM orders WHERE user_id = $1 \
       ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await
    .map_err(db("list_orders_for_user"))?;

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let items: Vec<OrderItemRow> = sqlx::query_as(ORDER_ITEMS_SQL)
    .bind(&order_ids)
    .fetch_all(&self.pool)
    .await
    .map_err(db("list_orders_for_user"))?;

    let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for item in items {
      by_order.entry(item.order_id).or_default().push(item.into());
    }
    orders
      .into_iter()
      .map(|row| {
        let items = by_order.remove(&row.id).unwrap_or_default();
        row.into_order(items)
      })
      .collect()
  }

  #[instrument(name = "pg_store::list_orders", skip(self), err(Display))]
  async fn list_orders(&self) -> Result<Vec<OrderSummary>> {
    let rows: Vec<OrderSummaryRow> = sqlx::query_as(
      "SELECT o.id, o.user_id, o.total_amount, o.status, o.created_at, \
       pr.full_name AS customer_name, pr.email AS customer_email \
       FROM orders o LEFT JOIN profiles pr ON pr.user_id = o.user_id ORDER BY o.created_at DESC",
    )
    .fetch_all(&self.pool)
    .await
    .map_err(db("list_orders"))?;
    rows.into_iter().map(OrderSummary::try_from).collect()
  }

  #[instrument(name = "pg_store::update_order_status", skip(self), err(Display))]
  async fn update_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<()> {
    let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
      .bind(order_id)
      .bind(status.as_str())
      .execute(&self.pool)
      .await
      .map_err(db("update_order_status"))?;
    if result.rows_affected() == 0 {
      return Err(Error::not_found(format!("Order with ID {} not found.", order_id)));
    }
    Ok(())
  }
}
