//! Holder of the signed-in identity and the only place a [`PermissionHelper`]
//! is created or dropped.
//!
//! ```text
//! Inactive --init_session(loaded)--> Active
//! Inactive --init_session(failed)--> Error
//! Active --helper unloaded / reload failed--> Error
//! Error --reload_permissions(loaded)--> Active
//! Active | Error --clear_session--> Inactive
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::watch;

use crate::error::SessionError;
use crate::permissions::PermissionHelper;
use crate::repositories::PermissionRepository;
use crate::types::{FranchiseId, UserId};

pub const PERMISSION_LOAD_FAILED: &str = "Error al cargar permisos";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum SessionState {
    #[default]
    Inactive,
    Active {
        user_id: UserId,
        franchise_id: FranchiseId,
    },
    Error(String),
}

#[derive(Default)]
struct SessionSlot {
    user_id: Option<UserId>,
    franchise_id: Option<FranchiseId>,
    helper: Option<Arc<PermissionHelper>>,
    /// Bumped by every init/clear; a permission load finishing under an older
    /// generation is discarded.
    generation: u64,
}

impl SessionSlot {
    fn is_active(&self) -> bool {
        self.user_id.is_some()
            && self.franchise_id.is_some()
            && self.helper.as_ref().is_some_and(|helper| helper.is_loaded())
    }

    /// State matching the slot contents; `Inactive` when nothing is stored.
    fn derived_state(&self) -> SessionState {
        match (self.user_id, self.franchise_id, &self.helper) {
            (Some(user_id), Some(franchise_id), Some(helper)) if helper.is_loaded() => {
                SessionState::Active {
                    user_id,
                    franchise_id,
                }
            }
            (Some(_), Some(_), Some(_)) => SessionState::Error(PERMISSION_LOAD_FAILED.to_string()),
            _ => SessionState::Inactive,
        }
    }

    fn reset(&mut self) {
        self.generation += 1;
        if let Some(helper) = self.helper.take() {
            helper.clear_permissions();
        }
        self.user_id = None;
        self.franchise_id = None;
    }
}

struct Shared {
    slot: Mutex<SessionSlot>,
    state: watch::Sender<SessionState>,
}

impl Shared {
    fn slot(&self) -> MutexGuard<'_, SessionSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, next: SessionState) {
        self.state.send_if_modified(|state| {
            let changed = *state != next;
            *state = next;
            changed
        });
    }

    /// Republishes the slot's state if `generation` is still current.
    /// Returns `false` once the session has moved on.
    fn sync(&self, generation: u64) -> bool {
        let slot = self.slot();
        if slot.generation != generation {
            return false;
        }
        self.publish(slot.derived_state());
        true
    }
}

/// Shared as `Arc<SessionManager>` from the application root. Fields sit
/// behind a mutex that is never held across an `.await`.
///
/// The published [`SessionState`] follows the helper: if its permissions are
/// reloaded or cleared by whoever holds it, subscribers see the session drop
/// out of `Active` until a load succeeds again.
pub struct SessionManager {
    shared: Arc<Shared>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(SessionSlot::default()),
                state: watch::Sender::new(SessionState::Inactive),
            }),
        }
    }

    fn slot(&self) -> MutexGuard<'_, SessionSlot> {
        self.shared.slot()
    }

    /// Builds a fresh helper for `(user_id, franchise_id)`, loads its
    /// permissions and publishes the resulting state. Never fails: a load
    /// error ends in [`SessionState::Error`], which the caller should follow
    /// with [`SessionManager::clear_session`].
    pub async fn init_session(
        &self,
        user_id: UserId,
        franchise_id: FranchiseId,
        repository: Arc<dyn PermissionRepository>,
    ) -> SessionState {
        let helper = Arc::new(PermissionHelper::new(user_id, franchise_id, repository));
        let generation = {
            let mut slot = self.slot();
            slot.reset();
            self.shared.publish(SessionState::Inactive);
            slot.generation
        };

        let loaded = helper.load_permissions().await;

        let state = {
            let mut slot = self.slot();
            if slot.generation != generation {
                tracing::warn!(
                    %user_id,
                    %franchise_id,
                    "Session changed while permissions were loading; discarding result"
                );
                helper.clear_permissions();
                return self.shared.state.borrow().clone();
            }

            slot.user_id = Some(user_id);
            slot.franchise_id = Some(franchise_id);
            slot.helper = Some(helper.clone());
            let state = slot.derived_state();
            self.shared.publish(state.clone());
            state
        };

        if loaded {
            tracing::info!(%user_id, %franchise_id, "Session started");
        } else {
            tracing::error!(%user_id, %franchise_id, "Session could not load permissions");
        }
        self.follow_helper(&helper, generation);
        state
    }

    /// Keeps the published state in step with `helper` until the session
    /// generation changes or the helper is dropped.
    fn follow_helper(&self, helper: &PermissionHelper, generation: u64) {
        let mut permissions = helper.subscribe();
        let shared = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            while permissions.changed().await.is_ok() {
                let Some(shared) = shared.upgrade() else { break };
                if !shared.sync(generation) {
                    break;
                }
            }
        });
    }

    /// Reloads the active helper's permissions and republishes the session
    /// state: `Active` on success, `Error` when the reload fails.
    pub async fn reload_permissions(&self) -> Result<SessionState, SessionError> {
        let (helper, generation) = {
            let slot = self.slot();
            match (&slot.helper, slot.user_id, slot.franchise_id) {
                (Some(helper), Some(_), Some(_)) => (helper.clone(), slot.generation),
                _ => return Err(SessionError::NotActive),
            }
        };

        if !helper.reload_permissions().await {
            tracing::error!(
                user_id = %helper.user_id(),
                franchise_id = %helper.franchise_id(),
                "Session lost its permissions on reload"
            );
        }
        self.shared.sync(generation);
        Ok(self.state())
    }

    /// Idempotent.
    pub fn clear_session(&self) {
        let had_identity = {
            let mut slot = self.slot();
            let had_identity = slot.user_id.is_some();
            slot.reset();
            self.shared.state.send_replace(SessionState::Inactive);
            had_identity
        };
        if had_identity {
            tracing::info!("Session cleared");
        }
    }

    /// The authoritative "may protected screens render" check.
    pub fn is_session_active(&self) -> bool {
        self.slot().is_active()
    }

    pub fn state(&self) -> SessionState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.slot().user_id
    }

    pub fn franchise_id(&self) -> Option<FranchiseId> {
        self.slot().franchise_id
    }

    pub fn permission_helper(&self) -> Option<Arc<PermissionHelper>> {
        self.slot().helper.clone()
    }

    /// Identity of the signed-in user, only while the session is active.
    pub fn active_identity(&self) -> Option<(UserId, FranchiseId)> {
        let slot = self.slot();
        if !slot.is_active() {
            return None;
        }
        slot.user_id.zip(slot.franchise_id)
    }

    pub fn require_user_id(&self) -> Result<UserId, SessionError> {
        self.active_identity()
            .map(|(user_id, _)| user_id)
            .ok_or(SessionError::NotActive)
    }

    pub fn require_franchise_id(&self) -> Result<FranchiseId, SessionError> {
        self.active_identity()
            .map(|(_, franchise_id)| franchise_id)
            .ok_or(SessionError::NotActive)
    }

    pub fn require_permission_helper(&self) -> Result<Arc<PermissionHelper>, SessionError> {
        let slot = self.slot();
        if !slot.is_active() {
            return Err(SessionError::NotActive);
        }
        slot.helper.clone().ok_or(SessionError::NotActive)
    }
}
