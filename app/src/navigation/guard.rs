use crate::navigation::route::Route;
use crate::session::SessionManager;

/// Whether the presentation layer may render `route` for the current session.
/// Public routes are always open; protected ones need an active session whose
/// permissions include a code of one of the route's modules.
pub fn can_enter(session: &SessionManager, route: Route) -> bool {
    if !route.is_protected() {
        return true;
    }
    let Ok(helper) = session.require_permission_helper() else {
        return false;
    };
    route
        .modules()
        .iter()
        .any(|module| helper.can_view_module(*module))
}
