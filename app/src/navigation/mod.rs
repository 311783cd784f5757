pub mod controller;
pub mod guard;
pub mod route;
pub mod screen;

pub use controller::NavigationController;
pub use guard::can_enter;
pub use route::Route;
pub use screen::Screen;
