// core/src/models/mod.rs

//! Data structures mirroring the storefront's tables.

/// Declares a closed set of lowercase wire values (`"saas"`, `"pre_revenue"`, ...) as an enum
/// with `as_str`, `Display`, `FromStr` and serde support.
macro_rules! wire_enum {
  (
    $(#[$meta:meta])*
    $vis:vis enum $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    $vis enum $name {
      $(
        #[serde(rename = $wire)]
        $variant,
      )+
    }

    impl $name {
      pub const ALL: &'static [$name] = &[$($name::$variant),+];

      pub fn as_str(&self) -> &'static str {
        match self {
          $($name::$variant => $wire,)+
        }
      }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
      }
    }

    impl std::str::FromStr for $name {
      type Err = crate::error::Error;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
          $($wire => Ok($name::$variant),)+
          other => Err(crate::error::Error::Validation(format!(
            "'{}' is not a valid {} value",
            other,
            stringify!($name)
          ))),
        }
      }
    }
  };
}

pub(crate) use wire_enum;

pub mod order;
pub mod product;
pub mod profile;

pub use order::{Order, OrderItem, OrderStatus, OrderSummary};
pub use product::{
  Category, FeaturePreview, MarketScope, MarketType, NewProduct, Product, ProductQuery, ProductStatus, ProductType,
  Stage,
};
pub use profile::{Account, AdminUser, Profile, ProfileUpdate, UserRole, ADMIN_ROLE};
