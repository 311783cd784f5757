use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::config::Config;
use crate::db::connection::DbPool;
use crate::error::{AuthError, NavigationError, SessionError};
use crate::models::user::LoginRequest;
use crate::navigation::{can_enter, NavigationController, Route, Screen};
use crate::repositories::{DashboardRepository, PermissionRepository, SqliteStore, UserRepository};
use crate::services::{AuthService, DashboardService, RefreshHandle};
use crate::session::{SessionManager, SessionState};

/// Everything the presentation layer talks to: one session, one navigation
/// stack and the services behind the screens.
pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub auth: AuthService,
    pub dashboard: DashboardService,
    permissions: Arc<dyn PermissionRepository>,
    navigation: Mutex<NavigationController>,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        permissions: Arc<dyn PermissionRepository>,
        dashboard: Arc<dyn DashboardRepository>,
    ) -> Self {
        let session = Arc::new(SessionManager::new());
        let navigation = Mutex::new(NavigationController::new(session.clone()));
        let dashboard = DashboardService::new(
            dashboard,
            config.birthday_window_days,
            config.time_zone,
        );
        Self {
            config,
            session,
            auth: AuthService::new(users),
            dashboard,
            permissions,
            navigation,
        }
    }

    /// Wires every repository to the same SQLite store.
    pub fn from_pool(pool: DbPool, config: Config) -> Self {
        let store = Arc::new(SqliteStore::new(pool));
        Self::new(config, store.clone(), store.clone(), store)
    }

    fn navigation(&self) -> MutexGuard<'_, NavigationController> {
        self.navigation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_navigation<R>(&self, f: impl FnOnce(&mut NavigationController) -> R) -> R {
        f(&mut self.navigation())
    }

    pub fn current_screen(&self) -> Screen {
        self.navigation().current_screen()
    }

    /// Authenticates, opens the session and lands on the dashboard with an
    /// empty back stack. A session whose permissions cannot be loaded is
    /// torn down again and reported as [`AuthError::PermissionsUnavailable`];
    /// one cleared by a concurrent logout is reported as
    /// [`AuthError::Interrupted`]. `Ok` always carries `SessionState::Active`.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionState, AuthError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let user = self.auth.authenticate(&request).await?;

        let state = self
            .session
            .init_session(user.id, user.franchise_id, self.permissions.clone())
            .await;
        match &state {
            SessionState::Active { .. } => {
                if let Err(err) = self.navigation().navigate_to_route(Route::Dashboard, true) {
                    tracing::warn!(user_id = %user.id, error = %err, "Could not open dashboard after login");
                }
                Ok(state)
            }
            SessionState::Error(_) => {
                self.session.clear_session();
                Err(AuthError::PermissionsUnavailable)
            }
            SessionState::Inactive => {
                tracing::warn!(user_id = %user.id, "Session was cleared while signing in");
                Err(AuthError::Interrupted)
            }
        }
    }

    pub fn logout(&self) {
        self.session.clear_session();
        self.navigation().navigate_to(Screen::Login, true);
        tracing::info!("Logged out");
    }

    /// Opens `route` if the session may enter it.
    pub fn open(&self, route: Route, clear_back_stack: bool) -> Result<(), NavigationError> {
        if !can_enter(&self.session, route) {
            tracing::warn!(%route, "Route denied for current session");
            return Err(NavigationError::Forbidden(route.as_str()));
        }
        self.navigation().navigate_to_route(route, clear_back_stack)
    }

    /// Starts the periodic dashboard refresh for the active franchise.
    pub fn start_dashboard_refresh(&self) -> Result<RefreshHandle, SessionError> {
        let franchise_id = self.session.require_franchise_id()?;
        let period = Duration::from_secs(self.config.dashboard_refresh_secs);
        Ok(self.dashboard.spawn_refresh(franchise_id, period))
    }
}
