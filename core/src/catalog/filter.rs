// core/src/catalog/filter.rs

//! Predicate filtering over an already-fetched product list.

use serde::Serialize;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{MarketScope, MarketType, Product, ProductType, Stage};

/// Value that selects every product for a selector.
pub const ALL: &str = "all";

/// One drop-down in the catalog filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Selector<T> {
  All,
  Only(T),
}

// Written by hand so `T` needs no `Default`.
impl<T> Default for Selector<T> {
  fn default() -> Self {
    Selector::All
  }
}

impl<T: PartialEq> Selector<T> {
  pub fn admits(&self, value: &T) -> bool {
    match self {
      Selector::All => true,
      Selector::Only(wanted) => wanted == value,
    }
  }

  /// Like [`admits`](Self::admits) for optional fields; a missing value only passes `All`.
  pub fn admits_opt(&self, value: Option<&T>) -> bool {
    match (self, value) {
      (Selector::All, _) => true,
      (Selector::Only(wanted), Some(value)) => wanted == value,
      (Selector::Only(_), None) => false,
    }
  }
}

impl<T> Selector<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  /// `None`, `""` and `"all"` mean no restriction.
  pub fn parse(raw: Option<&str>) -> Result<Self> {
    match raw.map(str::trim) {
      None | Some("") | Some(ALL) => Ok(Selector::All),
      Some(value) => value
        .parse::<T>()
        .map(Selector::Only)
        .map_err(|e| Error::validation(e.to_string())),
    }
  }
}

/// The six catalog filter selectors. `Default` admits every product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogFilter {
  pub search: String,
  pub category: Selector<Uuid>,
  pub product_type: Selector<ProductType>,
  pub stage: Selector<Stage>,
  pub market_type: Selector<MarketType>,
  pub market_scope: Selector<MarketScope>,
}

/// Raw selector strings as they arrive from a query string.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct CatalogFilterParams {
  pub search: Option<String>,
  pub category: Option<String>,
  pub product_type: Option<String>,
  pub stage: Option<String>,
  pub market_type: Option<String>,
  pub market_scope: Option<String>,
}

impl TryFrom<CatalogFilterParams> for CatalogFilter {
  type Error = Error;

  fn try_from(params: CatalogFilterParams) -> Result<Self> {
    Ok(CatalogFilter {
      search: params.search.unwrap_or_default(),
      category: Selector::parse(params.category.as_deref())?,
      product_type: Selector::parse(params.product_type.as_deref())?,
      stage: Selector::parse(params.stage.as_deref())?,
      market_type: Selector::parse(params.market_type.as_deref())?,
      market_scope: Selector::parse(params.market_scope.as_deref())?,
    })
  }
}

impl CatalogFilter {
  pub fn is_unrestricted(&self) -> bool {
    *self == CatalogFilter::default()
  }

  pub fn matches(&self, product: &Product) -> bool {
    self.admits(&self.search.to_lowercase(), product)
  }

  // `needle` is the lower-cased search text, computed once per pass.
  fn admits(&self, needle: &str, product: &Product) -> bool {
    let search_hit = needle.is_empty()
      || product.name.to_lowercase().contains(needle)
      || product.description.to_lowercase().contains(needle);

    search_hit
      && self.category.admits_opt(product.category_id.as_ref())
      && self.product_type.admits(&product.product_type)
      && self.stage.admits(&product.stage)
      && self.market_type.admits(&product.market_type)
      && self.market_scope.admits(&product.market_scope)
  }

  /// Borrowing variant of [`apply`](Self::apply).
  pub fn apply_refs<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
    let needle = self.search.to_lowercase();
    products.iter().filter(|p| self.admits(&needle, p)).collect()
  }

  /// The products admitted by every selector, in their original order.
  pub fn apply(&self, products: &[Product]) -> Vec<Product> {
    self.apply_refs(products).into_iter().cloned().collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn selector_parse_treats_all_and_blank_as_unrestricted() {
    assert_eq!(Selector::<Stage>::parse(None).unwrap(), Selector::All);
    assert_eq!(Selector::<Stage>::parse(Some("")).unwrap(), Selector::All);
    assert_eq!(Selector::<Stage>::parse(Some("all")).unwrap(), Selector::All);
    assert_eq!(Selector::<Stage>::parse(Some("growth")).unwrap(), Selector::Only(Stage::Growth));
    assert!(Selector::<Stage>::parse(Some("seed")).is_err());
    assert!(Selector::<Uuid>::parse(Some("not-a-uuid")).is_err());
  }

  #[test]
  fn missing_category_only_passes_all() {
    let id = Uuid::new_v4();
    assert!(Selector::All.admits_opt(None::<&Uuid>));
    assert!(!Selector::Only(id).admits_opt(None));
    assert!(Selector::Only(id).admits_opt(Some(&id)));
  }

  #[test]
  fn default_filter_is_unrestricted() {
    assert!(CatalogFilter::default().is_unrestricted());
    let narrowed = CatalogFilter {
      stage: Selector::Only(Stage::Idea),
      ..Default::default()
    };
    assert!(!narrowed.is_unrestricted());
  }
}
