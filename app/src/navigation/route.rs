use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::NavigationError;
use crate::permissions::Module;

/// Closed set of navigation targets. Textual names only exist at the edge,
/// through [`Route::from_str`] and [`Route::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Route {
    Login,
    Dashboard,
    Franchises,
    Users,
    DisciplinesSchedules,
    Products,
    EventsPromotions,
    Settings,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Login,
        Route::Dashboard,
        Route::Franchises,
        Route::Users,
        Route::DisciplinesSchedules,
        Route::Products,
        Route::EventsPromotions,
        Route::Settings,
    ];

    pub const PUBLIC: [Route; 1] = [Route::Login];

    pub const PROTECTED: [Route; 7] = [
        Route::Dashboard,
        Route::Franchises,
        Route::Users,
        Route::DisciplinesSchedules,
        Route::Products,
        Route::EventsPromotions,
        Route::Settings,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Dashboard => "dashboard",
            Route::Franchises => "franquicias",
            Route::Users => "usuarios",
            Route::DisciplinesSchedules => "disciplinas_horarios",
            Route::Products => "productos",
            Route::EventsPromotions => "eventos_promociones",
            Route::Settings => "settings",
        }
    }

    pub fn is_protected(self) -> bool {
        !Route::PUBLIC.contains(&self)
    }

    /// Permission modules whose view right opens this route; any one suffices.
    pub const fn modules(self) -> &'static [Module] {
        match self {
            Route::Login => &[],
            Route::Dashboard => &[Module::Dashboard],
            Route::Franchises => &[Module::Franquicias],
            Route::Users => &[Module::Usuarios, Module::Alumnos],
            Route::DisciplinesSchedules => &[Module::Disciplinas, Module::Horarios],
            Route::Products => &[Module::Productos],
            Route::EventsPromotions => &[Module::Eventos, Module::Promociones],
            Route::Settings => &[Module::Configuracion],
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::ALL
            .into_iter()
            .find(|route| route.as_str() == s)
            .ok_or_else(|| NavigationError::UnknownRoute(s.to_string()))
    }
}
