//! Current screen plus a back-stack, independent of any UI toolkit's own back
//! handling.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::NavigationError;
use crate::navigation::{route::Route, screen::Screen};
use crate::session::SessionManager;

pub struct NavigationController {
    session: Arc<SessionManager>,
    current: watch::Sender<Screen>,
    /// Most recent last.
    back_stack: Vec<Screen>,
}

impl NavigationController {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self::with_initial(session, Screen::Login)
    }

    pub fn with_initial(session: Arc<SessionManager>, initial: Screen) -> Self {
        Self {
            session,
            current: watch::Sender::new(initial),
            back_stack: Vec::new(),
        }
    }

    pub fn current_screen(&self) -> Screen {
        *self.current.borrow()
    }

    pub fn current_route(&self) -> Route {
        self.current_screen().route()
    }

    pub fn subscribe(&self) -> watch::Receiver<Screen> {
        self.current.subscribe()
    }

    pub fn back_stack(&self) -> &[Screen] {
        &self.back_stack
    }

    /// With `clear_back_stack` the history is dropped and nothing is pushed;
    /// otherwise the current screen is pushed unless it equals `screen`.
    pub fn navigate_to(&mut self, screen: Screen, clear_back_stack: bool) {
        let current = self.current_screen();
        if clear_back_stack {
            self.back_stack.clear();
        } else if screen != current {
            self.back_stack.push(current);
        }
        tracing::debug!(from = ?current, to = ?screen, depth = self.back_stack.len(), "Navigate");
        self.current.send_replace(screen);
    }

    /// Returns `false`, leaving state untouched, when there is nothing to go back to.
    pub fn navigate_back(&mut self) -> bool {
        match self.back_stack.pop() {
            Some(previous) => {
                tracing::debug!(to = ?previous, depth = self.back_stack.len(), "Navigate back");
                self.current.send_replace(previous);
                true
            }
            None => {
                tracing::debug!("Back navigation requested with an empty back-stack");
                false
            }
        }
    }

    /// Builds the screen for `route` from the active session's identity.
    pub fn resolve(&self, route: Route) -> Result<Screen, NavigationError> {
        let identity = self.session.active_identity();
        let user_id = identity.map(|(user_id, _)| user_id);
        let franchise_id = identity.map(|(_, franchise_id)| franchise_id);

        let screen = match route {
            Route::Login => Screen::Login,
            Route::Dashboard => Screen::Dashboard {
                user_id,
                franchise_id: franchise_id
                    .ok_or(NavigationError::MissingFranchise(route.as_str()))?,
            },
            Route::Franchises => Screen::Franchises { user_id },
            Route::Users => Screen::Users { franchise_id },
            Route::DisciplinesSchedules => Screen::DisciplinesSchedules { franchise_id },
            Route::Products => Screen::Products { franchise_id },
            Route::EventsPromotions => Screen::EventsPromotions { franchise_id },
            Route::Settings => Screen::Settings { user_id },
        };
        Ok(screen)
    }

    pub fn navigate_to_route(
        &mut self,
        route: Route,
        clear_back_stack: bool,
    ) -> Result<(), NavigationError> {
        match self.resolve(route) {
            Ok(screen) => {
                self.navigate_to(screen, clear_back_stack);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%route, error = %err, "Navigation aborted");
                Err(err)
            }
        }
    }

    /// String entry point for deep links and stored preferences.
    pub fn navigate_to_route_name(
        &mut self,
        name: &str,
        clear_back_stack: bool,
    ) -> Result<(), NavigationError> {
        match name.parse::<Route>() {
            Ok(route) => self.navigate_to_route(route, clear_back_stack),
            Err(err) => {
                tracing::warn!(route = name, error = %err, "Navigation aborted");
                Err(err)
            }
        }
    }

    pub fn can_navigate_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    pub fn clear_back_stack(&mut self) {
        self.back_stack.clear();
    }

    pub fn navigate_and_clear_back_stack(&mut self, screen: Screen) {
        self.navigate_to(screen, true);
    }

    pub fn back_stack_size(&self) -> usize {
        self.back_stack.len()
    }
}
