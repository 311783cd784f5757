use serde::Serialize;

use crate::navigation::route::Route;
use crate::types::{FranchiseId, UserId};

/// A concrete UI location, carrying the ids the screen queries with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Screen {
    #[default]
    Login,
    Dashboard {
        user_id: Option<UserId>,
        franchise_id: FranchiseId,
    },
    Franchises {
        user_id: Option<UserId>,
    },
    Users {
        franchise_id: Option<FranchiseId>,
    },
    DisciplinesSchedules {
        franchise_id: Option<FranchiseId>,
    },
    Products {
        franchise_id: Option<FranchiseId>,
    },
    EventsPromotions {
        franchise_id: Option<FranchiseId>,
    },
    Settings {
        user_id: Option<UserId>,
    },
}

impl Screen {
    pub const fn route(&self) -> Route {
        match self {
            Screen::Login => Route::Login,
            Screen::Dashboard { .. } => Route::Dashboard,
            Screen::Franchises { .. } => Route::Franchises,
            Screen::Users { .. } => Route::Users,
            Screen::DisciplinesSchedules { .. } => Route::DisciplinesSchedules,
            Screen::Products { .. } => Route::Products,
            Screen::EventsPromotions { .. } => Route::EventsPromotions,
            Screen::Settings { .. } => Route::Settings,
        }
    }
}
