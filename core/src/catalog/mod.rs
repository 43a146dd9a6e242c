// core/src/catalog/mod.rs

//! The "Founder Tools" catalog: active products, categories and the add-to-cart stub.

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Category, Product, ProductQuery};
use crate::notice::Notice;
use crate::store::Store;

pub mod filter;

pub use filter::{CatalogFilter, CatalogFilterParams, Selector};

/// Products and categories as fetched, before any filtering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogSnapshot {
  pub products: Vec<Product>,
  pub categories: Vec<Category>,
}

/// A filtered view of a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage {
  pub products: Vec<Product>,
  pub categories: Vec<Category>,
  pub total_available: usize,
  /// Set when the filter admitted nothing; shown as "no products found", not an error.
  pub no_results: bool,
}

impl CatalogSnapshot {
  pub fn page(&self, filter: &CatalogFilter) -> CatalogPage {
    let products = filter.apply(&self.products);
    CatalogPage {
      no_results: products.is_empty(),
      products,
      categories: self.categories.clone(),
      total_available: self.products.len(),
    }
  }
}

#[derive(Clone)]
pub struct Catalog {
  store: Arc<dyn Store>,
}

impl Catalog {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }

  /// Fetches active products (newest first) and categories (by name).
  ///
  /// A product fetch failure fails the load. A category failure only leaves the category list
  /// empty, since the catalog is still usable without it.
  #[instrument(name = "catalog::load", skip(self), err(Display))]
  pub async fn load(&self) -> Result<CatalogSnapshot> {
    let products = self.store.list_products(ProductQuery::active()).await.map_err(|e| {
      error!(error = %e, "Failed to load products.");
      e
    })?;

    let categories = match self.store.list_categories().await {
      Ok(categories) => categories,
      Err(e) => {
        warn!(error = %e, "Failed to load categories; continuing without them.");
        Vec::new()
      }
    };

    info!(products = products.len(), categories = categories.len(), "Catalog loaded.");
    Ok(CatalogSnapshot { products, categories })
  }

  /// Loads the catalog and applies `filter`.
  pub async fn browse(&self, filter: &CatalogFilter) -> Result<CatalogPage> {
    let page = self.load().await?.page(filter);
    if page.no_results {
      info!(?filter, "No products matched the filter.");
    }
    Ok(page)
  }

  #[instrument(name = "catalog::product", skip(self), err(Display))]
  pub async fn product(&self, product_id: Uuid) -> Result<Product> {
    self
      .store
      .fetch_product(product_id)
      .await?
      .ok_or_else(|| Error::not_found(format!("Product with ID {} not found.", product_id)))
  }

  /// Acknowledges an add-to-cart click. Nothing is persisted; the notice is the whole effect.
  #[instrument(name = "catalog::add_to_cart", skip(self), err(Display))]
  pub async fn add_to_cart(&self, product_id: Uuid) -> Result<Notice> {
    let product = self.product(product_id).await?;
    if !product.is_active() {
      warn!(%product_id, "Attempt to add an inactive product to the cart.");
      return Err(Error::validation(format!("{} is not currently available.", product.name)));
    }
    info!(%product_id, "Add to cart acknowledged.");
    Ok(Notice::success(
      "Added to Cart",
      format!("{} has been added to your cart.", product.name),
    ))
  }
}
