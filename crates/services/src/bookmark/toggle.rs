use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use learn_core::model::{BookmarkableEntity, TogglePhase, ToggleState};

use super::client::BookmarkService;

/// Invoked with the confirmed value after a toggle succeeds.
pub type ToggleCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Result of a single `BookmarkToggle::toggle` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Another toggle was already in flight; nothing happened.
    Ignored,
    /// The server accepted the change; carries the new value.
    Confirmed(bool),
    /// The server rejected the change; carries the restored value.
    RolledBack(bool),
    /// The owner went away before the call resolved; nothing was written.
    Discarded,
}

#[derive(Debug, Default)]
struct ToggleCell {
    is_bookmarked: bool,
    phase: TogglePhase,
    disposed: bool,
}

/// Optimistic bookmark state for one card.
///
/// Each bookmark control owns one `BookmarkToggle`. Clones share the same
/// state so a clone can be moved into a spawned task while the owner keeps
/// reading `state()`. After `dispose()` no pending call writes to the state.
#[derive(Clone)]
pub struct BookmarkToggle {
    entity: BookmarkableEntity,
    service: Arc<dyn BookmarkService>,
    cell: Arc<Mutex<ToggleCell>>,
    on_toggled: Option<ToggleCallback>,
}

impl BookmarkToggle {
    #[must_use]
    pub fn new(service: Arc<dyn BookmarkService>, entity: BookmarkableEntity) -> Self {
        Self {
            entity,
            service,
            cell: Arc::new(Mutex::new(ToggleCell::default())),
            on_toggled: None,
        }
    }

    /// Run `callback` after every confirmed toggle.
    #[must_use]
    pub fn on_toggled(mut self, callback: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.on_toggled = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn entity(&self) -> BookmarkableEntity {
        self.entity
    }

    #[must_use]
    pub fn state(&self) -> ToggleState {
        let cell = self.lock();
        ToggleState {
            is_bookmarked: cell.is_bookmarked,
            is_loading: cell.phase.is_pending(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> TogglePhase {
        self.lock().phase
    }

    /// Seed the state, or ask the server when no seed is known.
    ///
    /// A failed status check keeps the current value. The fetched value is
    /// dropped if a toggle started while the check was in flight.
    pub async fn initialize(&self, initial: Option<bool>) -> ToggleState {
        if let Some(value) = initial {
            let mut cell = self.lock();
            if !cell.disposed {
                cell.is_bookmarked = value;
            }
            drop(cell);
            return self.state();
        }

        match self.service.status(&self.entity).await {
            Ok(value) => {
                let mut cell = self.lock();
                if cell.disposed {
                    tracing::debug!(entity = ?self.entity, "status arrived after dispose");
                } else if cell.phase == TogglePhase::Idle {
                    cell.is_bookmarked = value;
                }
            }
            Err(err) => {
                tracing::debug!(entity = ?self.entity, error = %err, "bookmark status check failed");
            }
        }
        self.state()
    }

    /// Flip the bookmark optimistically and confirm it with the server.
    ///
    /// The new value is visible immediately. On failure the previous value is
    /// restored. A call made while another is in flight is ignored.
    pub async fn toggle(&self) -> ToggleOutcome {
        let previous = {
            let mut cell = self.lock();
            if cell.disposed {
                return ToggleOutcome::Discarded;
            }
            if cell.phase.is_pending() {
                tracing::debug!(entity = ?self.entity, "toggle already in flight");
                return ToggleOutcome::Ignored;
            }
            let previous = cell.is_bookmarked;
            cell.is_bookmarked = !previous;
            cell.phase = TogglePhase::Pending;
            previous
        };

        let mut pending = PendingGuard {
            toggle: self,
            previous,
            armed: true,
        };

        let result = if previous {
            self.service.remove(&self.entity).await
        } else {
            self.service.add(&self.entity).await
        };
        pending.armed = false;

        let outcome = {
            let mut cell = self.lock();
            if cell.disposed {
                tracing::debug!(entity = ?self.entity, "toggle resolved after dispose");
                return ToggleOutcome::Discarded;
            }
            match result {
                Ok(()) => {
                    cell.phase = TogglePhase::Settled;
                    ToggleOutcome::Confirmed(!previous)
                }
                Err(err) => {
                    tracing::warn!(entity = ?self.entity, error = %err, "bookmark toggle rolled back");
                    cell.is_bookmarked = previous;
                    cell.phase = TogglePhase::RolledBack;
                    ToggleOutcome::RolledBack(previous)
                }
            }
        };

        if let (ToggleOutcome::Confirmed(value), Some(callback)) = (outcome, &self.on_toggled) {
            callback(value);
        }
        outcome
    }

    /// Stop all pending continuations from touching this state.
    pub fn dispose(&self) {
        self.lock().disposed = true;
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    /// Disposes this toggle when the returned guard is dropped.
    #[must_use]
    pub fn guard(&self) -> DisposeGuard {
        DisposeGuard {
            toggle: self.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ToggleCell> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ties a `BookmarkToggle` to the lifetime of the element that owns it.
pub struct DisposeGuard {
    toggle: BookmarkToggle,
}

impl Drop for DisposeGuard {
    fn drop(&mut self) {
        self.toggle.dispose();
    }
}

/// Restores the previous value if the toggle future is dropped mid-call, so
/// the control never stays in the loading state.
struct PendingGuard<'a> {
    toggle: &'a BookmarkToggle,
    previous: bool,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut cell = self.toggle.lock();
        if !cell.disposed && cell.phase.is_pending() {
            cell.is_bookmarked = self.previous;
            cell.phase = TogglePhase::RolledBack;
        }
    }
}
