// app/src/state.rs
use crate::config::AppConfig;
use launchcraft::{AdminConsole, Catalog, SessionRegistry, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub catalog: Catalog,
  pub admin: Arc<AdminConsole>,
  pub sessions: SessionRegistry,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  /// Wires every service onto one shared store.
  pub fn new(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
    let sessions = SessionRegistry::with_ttl(store.clone(), config.session_ttl);
    let admin = AdminConsole::new(store.clone()).with_sessions(sessions.clone());
    Self {
      catalog: Catalog::new(store.clone()),
      admin: Arc::new(admin),
      sessions,
      store,
      config,
    }
  }
}
