// core/src/session.rs

//! Signed-in sessions and the role snapshot used for gating.
//!
//! Handlers receive an immutable [`Session`] snapshot. Role changes never mutate a snapshot in
//! place: [`SessionRegistry::refresh_user`] re-reads the roles, swaps in new snapshots and
//! announces the change to subscribers.
//!
//! Sessions live in process memory for at most their time-to-live, counted from sign-in. Expired
//! sessions are dropped when looked up and swept on every sign-in, so the registry only holds
//! sessions issued within the last TTL window.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Account, ADMIN_ROLE};
use crate::store::Store;

/// Opaque bearer token handed to the client at sign-in.
pub type SessionToken = Uuid;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
  pub user_id: Uuid,
  pub email: String,
  pub is_admin: bool,
  pub member_since: DateTime<Utc>,
  pub issued_at: DateTime<Utc>,
}

impl Session {
  /// A session issued in the future (clock skew) is treated as fresh.
  fn expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
    (now - self.issued_at).to_std().is_ok_and(|age| age >= ttl)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
  SignedIn { user_id: Uuid },
  Refreshed { user_id: Uuid, is_admin: bool },
  SignedOut { user_id: Uuid },
}

struct Inner {
  store: Arc<dyn Store>,
  ttl: Duration,
  sessions: RwLock<HashMap<SessionToken, Arc<Session>>>,
  events: watch::Sender<Option<SessionEvent>>,
}

#[derive(Clone)]
pub struct SessionRegistry {
  inner: Arc<Inner>,
}

impl SessionRegistry {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self::with_ttl(store, DEFAULT_SESSION_TTL)
  }

  pub fn with_ttl(store: Arc<dyn Store>, ttl: Duration) -> Self {
    let (events, _) = watch::channel(None);
    Self {
      inner: Arc::new(Inner {
        store,
        ttl,
        sessions: RwLock::new(HashMap::new()),
        events,
      }),
    }
  }

  /// Receives the latest session change; starts at `None`.
  pub fn subscribe(&self) -> watch::Receiver<Option<SessionEvent>> {
    self.inner.events.subscribe()
  }

  async fn is_admin(&self, user_id: Uuid) -> Result<bool> {
    let roles = self.inner.store.list_roles(user_id).await?;
    Ok(roles.iter().any(|r| r.role == ADMIN_ROLE))
  }

  #[instrument(name = "session::open", skip(self, account), fields(user_id = %account.id), err(Display))]
  pub async fn open(&self, account: &Account) -> Result<(SessionToken, Arc<Session>)> {
    let session = Arc::new(Session {
      user_id: account.id,
      email: account.email.clone(),
      is_admin: self.is_admin(account.id).await?,
      member_since: account.created_at,
      issued_at: Utc::now(),
    });
    self.purge_expired();
    let token = Uuid::new_v4();
    self.inner.sessions.write().insert(token, session.clone());
    self.inner.events.send_replace(Some(SessionEvent::SignedIn { user_id: account.id }));
    info!(is_admin = session.is_admin, "Session opened.");
    Ok((token, session))
  }

  pub fn get(&self, token: &SessionToken) -> Option<Arc<Session>> {
    let session = self.inner.sessions.read().get(token).cloned()?;
    if session.expired(self.inner.ttl, Utc::now()) {
      debug!(user_id = %session.user_id, "Session expired.");
      self.close(token);
      return None;
    }
    Some(session)
  }

  /// Drops every expired session and returns how many were removed.
  pub fn purge_expired(&self) -> usize {
    let now = Utc::now();
    let ttl = self.inner.ttl;
    let mut sessions = self.inner.sessions.write();
    let before = sessions.len();
    sessions.retain(|_, session| !session.expired(ttl, now));
    let purged = before - sessions.len();
    if purged > 0 {
      debug!(purged, "Expired sessions purged.");
    }
    purged
  }

  pub fn require(&self, token: &SessionToken) -> Result<Arc<Session>> {
    self.get(token).ok_or_else(|| {
      debug!("Unknown or expired session token.");
      Error::Unauthorized("Please sign in to continue.".to_string())
    })
  }

  pub fn require_admin(&self, token: &SessionToken) -> Result<Arc<Session>> {
    let session = self.require(token)?;
    if !session.is_admin {
      warn!(user_id = %session.user_id, "Non-admin session attempted an admin operation.");
      return Err(Error::Forbidden("Admin access required.".to_string()));
    }
    Ok(session)
  }

  /// Ends a session. Closing an unknown token is not an error; returns whether one was removed.
  pub fn close(&self, token: &SessionToken) -> bool {
    let removed = self.inner.sessions.write().remove(token);
    match removed {
      Some(session) => {
        self
          .inner
          .events
          .send_replace(Some(SessionEvent::SignedOut { user_id: session.user_id }));
        true
      }
      None => false,
    }
  }

  /// Re-reads `user_id`'s roles and replaces every snapshot that user holds.
  /// Returns how many sessions were refreshed.
  #[instrument(name = "session::refresh_user", skip(self), err(Display))]
  pub async fn refresh_user(&self, user_id: Uuid) -> Result<usize> {
    let is_admin = self.is_admin(user_id).await?;
    let refreshed = {
      let mut sessions = self.inner.sessions.write();
      let mut count = 0;
      for session in sessions.values_mut().filter(|s| s.user_id == user_id) {
        *session = Arc::new(Session {
          is_admin,
          ..(**session).clone()
        });
        count += 1;
      }
      count
    };
    if refreshed > 0 {
      self
        .inner
        .events
        .send_replace(Some(SessionEvent::Refreshed { user_id, is_admin }));
    }
    debug!(refreshed, is_admin, "Sessions refreshed.");
    Ok(refreshed)
  }

  pub fn active_sessions(&self) -> usize {
    self.inner.sessions.read().len()
  }
}
