// core/src/admin.rs

//! Admin panel: the overview of users, products and orders, and the mutations behind its
//! buttons.
//!
//! Every successful mutation is followed by a full re-fetch of the overview rather than a local
//! patch. A failed mutation is not retried or rolled back, and the last published overview stays
//! in place until the next successful fetch. Overlapping fetches are ordered through a
//! [`LatestView`], so a slow older fetch never replaces a newer one.

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
  AdminUser, NewProduct, OrderStatus, OrderSummary, Product, ProductQuery, ProductStatus, ADMIN_ROLE,
};
use crate::notice::Notice;
use crate::sequence::LatestView;
use crate::session::SessionRegistry;
use crate::store::Store;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdminStats {
  pub total_users: usize,
  pub total_products: usize,
  pub total_orders: usize,
  pub total_revenue: Decimal,
}

impl AdminStats {
  pub fn compute(users: &[AdminUser], products: &[Product], orders: &[OrderSummary]) -> Self {
    Self {
      total_users: users.len(),
      total_products: products.len(),
      total_orders: orders.len(),
      total_revenue: orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed)
        .map(|o| o.total_amount)
        .sum(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
  pub users: Vec<AdminUser>,
  pub products: Vec<Product>,
  pub orders: Vec<OrderSummary>,
  pub stats: AdminStats,
}

impl AdminOverview {
  pub fn user(&self, user_id: Uuid) -> Option<&AdminUser> {
    self.users.iter().find(|u| u.profile.user_id == user_id)
  }

  pub fn product(&self, product_id: Uuid) -> Option<&Product> {
    self.products.iter().find(|p| p.id == product_id)
  }
}

/// Result of a successful admin mutation.
#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome {
  pub notice: Notice,
  pub overview: Option<Arc<AdminOverview>>,
  /// Set when the mutation succeeded but the follow-up fetch did not; `overview` is then the
  /// last published one.
  pub stale: bool,
}

pub struct AdminConsole {
  store: Arc<dyn Store>,
  sessions: Option<SessionRegistry>,
  view: LatestView<AdminOverview>,
}

impl AdminConsole {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self {
      store,
      sessions: None,
      view: LatestView::new(),
    }
  }

  /// Refresh the affected user's sessions after a role change.
  pub fn with_sessions(mut self, sessions: SessionRegistry) -> Self {
    self.sessions = Some(sessions);
    self
  }

  /// The last published overview, possibly stale.
  pub fn overview(&self) -> Option<Arc<AdminOverview>> {
    self.view.current()
  }

  /// Fetches users, products and orders and recomputes the stats.
  ///
  /// On failure the published overview is left untouched.
  #[instrument(name = "admin::refresh", skip(self), err(Display))]
  pub async fn refresh(&self) -> Result<Arc<AdminOverview>> {
    let ticket = self.view.begin();

    let fetched = async {
      let users = self.store.list_profiles().await?;
      let products = self.store.list_products(ProductQuery::any_status()).await?;
      let orders = self.store.list_orders().await?;
      Ok::<_, Error>((users, products, orders))
    }
    .await;

    let (users, products, orders) = fetched.map_err(|e| {
      error!(error = %e, ticket = ticket.number(), "Failed to load admin data.");
      e
    })?;

    let stats = AdminStats::compute(&users, &products, &orders);
    let (overview, applied) = self.view.publish(
      ticket,
      AdminOverview {
        users,
        products,
        orders,
        stats,
      },
    );
    if !applied {
      warn!(ticket = ticket.number(), "A newer admin overview was already published.");
    }
    Ok(overview)
  }

  async fn finish(&self, notice: Notice) -> MutationOutcome {
    match self.refresh().await {
      Ok(overview) => MutationOutcome {
        notice,
        overview: Some(overview),
        stale: false,
      },
      Err(_) => MutationOutcome {
        notice,
        overview: self.view.current(),
        stale: true,
      },
    }
  }

  /// Grants the admin role if the user lacks it, revokes it otherwise.
  #[instrument(name = "admin::toggle_user_role", skip(self), err(Display))]
  pub async fn toggle_user_role(&self, user_id: Uuid) -> Result<MutationOutcome> {
    if self.store.fetch_account(user_id).await?.is_none() {
      return Err(Error::not_found(format!("User with ID {} not found.", user_id)));
    }
    let is_admin = self
      .store
      .list_roles(user_id)
      .await?
      .iter()
      .any(|r| r.role == ADMIN_ROLE);

    let new_role = if is_admin {
      self.store.delete_role(user_id, ADMIN_ROLE).await
    } else {
      self.store.insert_role(user_id, ADMIN_ROLE).await
    }
    .map(|()| if is_admin { "user" } else { ADMIN_ROLE })
    .map_err(|e| {
      error!(error = %e, "Error updating user role.");
      e
    })?;

    info!(%user_id, new_role, "User role updated.");

    if let Some(sessions) = &self.sessions {
      if let Err(e) = sessions.refresh_user(user_id).await {
        warn!(error = %e, "Role changed but sessions could not be refreshed.");
      }
    }

    Ok(
      self
        .finish(Notice::success("Success", format!("User role updated to {}", new_role)))
        .await,
    )
  }

  /// Flips a product between active and inactive.
  #[instrument(name = "admin::toggle_product_status", skip(self), err(Display))]
  pub async fn toggle_product_status(&self, product_id: Uuid) -> Result<MutationOutcome> {
    let current = self
      .store
      .fetch_product(product_id)
      .await?
      .ok_or_else(|| Error::not_found(format!("Product with ID {} not found.", product_id)))?
      .status;
    let new_status: ProductStatus = current.toggled();

    self
      .store
      .update_product_status(product_id, new_status)
      .await
      .map_err(|e| {
        error!(error = %e, "Error updating product status.");
        e
      })?;

    info!(%product_id, from = %current, to = %new_status, "Product status updated.");
    Ok(
      self
        .finish(Notice::success("Success", format!("Product status updated to {}", new_status)))
        .await,
    )
  }

  #[instrument(name = "admin::set_order_status", skip(self), err(Display))]
  pub async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<MutationOutcome> {
    self.store.update_order_status(order_id, status).await.map_err(|e| {
      error!(error = %e, "Error updating order status.");
      e
    })?;
    info!(%order_id, %status, "Order status updated.");
    Ok(
      self
        .finish(Notice::success("Success", format!("Order status updated to {}", status)))
        .await,
    )
  }

  #[instrument(name = "admin::create_product", skip(self, product), fields(name = %product.name), err(Display))]
  pub async fn create_product(&self, product: NewProduct) -> Result<MutationOutcome> {
    product.validate()?;
    let created = self.store.insert_product(product).await.map_err(|e| {
      error!(error = %e, "Error creating product.");
      e
    })?;
    info!(product_id = %created.id, "Product created.");
    Ok(
      self
        .finish(Notice::success("Success", format!("{} has been added to the catalog.", created.name)))
        .await,
    )
  }
}
