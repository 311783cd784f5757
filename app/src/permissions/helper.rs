//! Capability checks for one user inside one franchise.
//!
//! Every query answers "denied" until the grant set has been loaded, so a
//! screen rendered before the asynchronous load finishes never shows
//! privileged content.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::permissions::table::{self, codes, Action, Module, PERMISSION_TABLE};
use crate::repositories::PermissionRepository;
use crate::types::{FranchiseId, UserId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PermissionState {
    #[default]
    Unloaded,
    Loaded(HashSet<String>),
}

impl PermissionState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, PermissionState::Loaded(_))
    }

    fn holds(&self, code: &str) -> bool {
        match self {
            PermissionState::Loaded(granted) => granted.contains(code),
            PermissionState::Unloaded => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModuleCapabilities {
    pub can_view: bool,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

pub struct PermissionHelper {
    user_id: UserId,
    franchise_id: FranchiseId,
    repository: Arc<dyn PermissionRepository>,
    state: watch::Sender<PermissionState>,
}

impl PermissionHelper {
    pub fn new(
        user_id: UserId,
        franchise_id: FranchiseId,
        repository: Arc<dyn PermissionRepository>,
    ) -> Self {
        Self {
            user_id,
            franchise_id,
            repository,
            state: watch::Sender::new(PermissionState::Unloaded),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn franchise_id(&self) -> FranchiseId {
        self.franchise_id
    }

    /// Fetches the grant set once. Failures are logged and leave the helper
    /// unloaded; they are never returned. Returns whether permissions are loaded.
    pub async fn load_permissions(&self) -> bool {
        if self.is_loaded() {
            return true;
        }

        match self
            .repository
            .permissions_for_user(self.user_id, self.franchise_id)
            .await
        {
            Ok(granted) => {
                let granted: HashSet<String> = granted.into_iter().collect();
                tracing::info!(
                    user_id = %self.user_id,
                    franchise_id = %self.franchise_id,
                    count = granted.len(),
                    "Permissions loaded"
                );
                self.state.send_replace(PermissionState::Loaded(granted));
                true
            }
            Err(err) => {
                tracing::error!(
                    user_id = %self.user_id,
                    franchise_id = %self.franchise_id,
                    error = %err,
                    "Failed to load permissions"
                );
                self.state.send_replace(PermissionState::Unloaded);
                false
            }
        }
    }

    /// Drops the current grant set and fetches it again. Readers observe the
    /// denied state until the new set arrives.
    pub async fn reload_permissions(&self) -> bool {
        self.state.send_replace(PermissionState::Unloaded);
        self.load_permissions().await
    }

    pub fn clear_permissions(&self) {
        self.state.send_replace(PermissionState::Unloaded);
    }

    pub fn is_loaded(&self) -> bool {
        self.state.borrow().is_loaded()
    }

    pub fn subscribe(&self) -> watch::Receiver<PermissionState> {
        self.state.subscribe()
    }

    /// Granted codes, sorted. Empty while unloaded.
    pub fn permissions(&self) -> Vec<String> {
        match &*self.state.borrow() {
            PermissionState::Loaded(granted) => {
                let mut sorted: Vec<String> = granted.iter().cloned().collect();
                sorted.sort();
                sorted
            }
            PermissionState::Unloaded => Vec::new(),
        }
    }

    pub fn can(&self, code: &str) -> bool {
        self.state.borrow().holds(code)
    }

    pub fn can_any(&self, wanted: &[&str]) -> bool {
        let state = self.state.borrow();
        wanted.iter().any(|code| state.holds(code))
    }

    pub fn can_all(&self, wanted: &[&str]) -> bool {
        let state = self.state.borrow();
        state.is_loaded() && wanted.iter().all(|code| state.holds(code))
    }

    /// `false` for names missing from the permission table.
    pub fn can_view_section(&self, module: &str) -> bool {
        match table::lookup(module) {
            Some((_, module_codes)) => self.can_any(module_codes),
            None => false,
        }
    }

    pub fn can_view_module(&self, module: Module) -> bool {
        self.can_any(module.codes())
    }

    pub fn accessible_modules(&self) -> Vec<Module> {
        let state = self.state.borrow();
        if !state.is_loaded() {
            return Vec::new();
        }
        PERMISSION_TABLE
            .iter()
            .filter(|(_, module_codes)| module_codes.iter().any(|code| state.holds(code)))
            .map(|(module, _)| *module)
            .collect()
    }

    pub fn is_admin(&self) -> bool {
        self.can_any(&[codes::CONFIGURACION_AVANZADA_VER, codes::RESPALDO_DATOS])
    }

    pub fn module_capabilities(&self, module: &str) -> ModuleCapabilities {
        let Some((_, module_codes)) = table::lookup(module) else {
            return ModuleCapabilities::default();
        };
        let state = self.state.borrow();
        let allows = |action: Action| {
            module_codes
                .iter()
                .any(|code| action.matches(code) && state.holds(code))
        };
        ModuleCapabilities {
            can_view: allows(Action::View),
            can_create: allows(Action::Create),
            can_edit: allows(Action::Edit),
            can_delete: allows(Action::Delete),
        }
    }

    pub fn can_access_dashboard(&self) -> bool {
        self.can(codes::DASHBOARD_VER)
    }

    pub fn can_view_franchises(&self) -> bool {
        self.can(codes::FRANQUICIAS_VER)
    }

    pub fn can_view_users(&self) -> bool {
        self.can(codes::USUARIOS_VER)
    }

    pub fn can_view_students(&self) -> bool {
        self.can(codes::ALUMNOS_VER)
    }

    pub fn can_view_schedules(&self) -> bool {
        self.can_any(&[codes::DISCIPLINAS_VER, codes::HORARIOS_VER])
    }

    pub fn can_view_products(&self) -> bool {
        self.can(codes::PRODUCTOS_VER)
    }

    pub fn can_view_events(&self) -> bool {
        self.can_any(&[codes::EVENTOS_VER, codes::PROMOCIONES_VER])
    }

    pub fn can_view_settings(&self) -> bool {
        self.can_view_module(Module::Configuracion)
    }
}

impl std::fmt::Debug for PermissionHelper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionHelper")
            .field("user_id", &self.user_id)
            .field("franchise_id", &self.franchise_id)
            .field("state", &*self.state.borrow())
            .finish()
    }
}
