// src/lib.rs

//! LaunchCraft: the storefront core behind the venture-studio site.
//!
//! The crate covers:
//!  - The "Founder Tools" catalog and its six-way filter.
//!  - The per-user dashboard and its completed-order statistics.
//!  - The admin panel: role toggling, product status, order status, product creation.
//!  - Contact form validation.
//!  - Session snapshots used for role gating.
//!
//! Persistence is abstracted behind [`Store`]; [`MemoryStore`] keeps everything in process.

pub mod admin;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod lead;
pub mod models;
pub mod notice;
pub mod sequence;
pub mod session;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::admin::{AdminConsole, AdminOverview, AdminStats, MutationOutcome};
pub use crate::catalog::{Catalog, CatalogFilter, CatalogFilterParams, CatalogPage, CatalogSnapshot, Selector};
pub use crate::dashboard::{load_dashboard, update_profile, Dashboard, DashboardStats, OrderHistory};
pub use crate::error::{Error, Result};
pub use crate::lead::{Lead, LeadForm};
pub use crate::notice::{Notice, NoticeVariant};
pub use crate::sequence::{LatestView, Ticket};
pub use crate::session::{Session, SessionEvent, SessionRegistry, SessionToken, DEFAULT_SESSION_TTL};
pub use crate::store::{MemoryStore, Store};

/*
    Typical request flow:
    1. Build one `Arc<dyn Store>` at startup and share it.
    2. Catalog reads: `Catalog::browse(&filter)` loads the active products and applies the filter.
    3. Admin writes: `AdminConsole::toggle_*` mutates, then re-fetches the whole overview.
    4. Dashboard reads: `load_dashboard(store, user_id)` recomputes everything per call.
    5. Role gating: `SessionRegistry::require_admin(&token)` reads the session snapshot only.
*/
