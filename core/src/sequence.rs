// core/src/sequence.rs

//! Ordering guard for overlapping fetches of the same view.
//!
//! Each fetch takes a [`Ticket`] before it starts. When it finishes, its result is published
//! only if no fetch that started later has already published; a slow, older response can never
//! replace a newer one.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Position of a fetch in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
  pub fn number(&self) -> u64 {
    self.0
  }
}

struct Published<T> {
  ticket: Ticket,
  value: Arc<T>,
}

/// The most recent published value of a view, plus the counter that orders its fetches.
pub struct LatestView<T> {
  next: AtomicU64,
  current: RwLock<Option<Published<T>>>,
}

impl<T> Default for LatestView<T> {
  fn default() -> Self {
    Self {
      next: AtomicU64::new(1),
      current: RwLock::new(None),
    }
  }
}

impl<T> LatestView<T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reserves a ticket for a fetch that is about to start.
  pub fn begin(&self) -> Ticket {
    Ticket(self.next.fetch_add(1, Ordering::SeqCst))
  }

  /// Publishes `value` if `ticket` is newer than the current one. Returns the value that is
  /// current afterwards and whether this call replaced it.
  pub fn publish(&self, ticket: Ticket, value: T) -> (Arc<T>, bool) {
    let mut current = self.current.write();
    match current.as_ref() {
      Some(existing) if existing.ticket > ticket => {
        debug!(
          stale = ticket.number(),
          current = existing.ticket.number(),
          "Discarding stale view."
        );
        (existing.value.clone(), false)
      }
      _ => {
        let value = Arc::new(value);
        *current = Some(Published {
          ticket,
          value: value.clone(),
        });
        (value, true)
      }
    }
  }

  pub fn current(&self) -> Option<Arc<T>> {
    self.current.read().as_ref().map(|p| p.value.clone())
  }

  pub fn current_ticket(&self) -> Option<Ticket> {
    self.current.read().as_ref().map(|p| p.ticket)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn older_ticket_cannot_overwrite_newer_value() {
    let view = LatestView::<&str>::new();
    let first = view.begin();
    let second = view.begin();

    let (value, applied) = view.publish(second, "fresh");
    assert!(applied);
    assert_eq!(*value, "fresh");

    let (value, applied) = view.publish(first, "stale");
    assert!(!applied);
    assert_eq!(*value, "fresh");
    assert_eq!(view.current_ticket(), Some(second));
  }

  #[test]
  fn in_order_publishes_all_apply() {
    let view = LatestView::<u32>::new();
    for n in 0..3 {
      let ticket = view.begin();
      assert!(view.publish(ticket, n).1);
    }
    assert_eq!(view.current().as_deref(), Some(&2));
  }
}
