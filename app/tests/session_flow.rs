use std::sync::Arc;

use marbet::{
    error::{AuthError, NavigationError},
    navigation::{NavigationController, Route, Screen},
    permissions::codes,
    repositories::SqliteStore,
    session::{SessionManager, SessionState},
    state::AppState,
};

#[path = "support/mod.rs"]
mod support;

#[tokio::test]
async fn login_navigate_and_logout_against_sqlite() {
    let pool = support::test_pool().await;
    let store = SqliteStore::new(pool.clone());
    let franchise = support::seed_franchise(&store, "Centro").await;
    let user = support::seed_user(
        &store,
        franchise.id,
        "ana",
        "secreto",
        &[codes::DASHBOARD_VER, codes::HORARIOS_VER, codes::USUARIOS_VER, codes::USUARIOS_EDITAR],
    )
    .await;
    let app = AppState::from_pool(pool, support::test_config());

    let state = app.login("  ana ", "secreto").await.expect("login");
    assert_eq!(
        state,
        SessionState::Active {
            user_id: user.id,
            franchise_id: franchise.id,
        }
    );

    let helper = app.session.permission_helper().expect("helper");
    assert!(helper.can_access_dashboard());
    let users = helper.module_capabilities("Usuarios");
    assert!(users.can_view && users.can_edit);
    assert!(!users.can_create && !users.can_delete);

    app.open(Route::DisciplinesSchedules, false)
        .expect("schedules reachable through horarios");
    app.open(Route::Users, false).expect("users reachable");
    assert_eq!(
        app.open(Route::Products, false),
        Err(NavigationError::Forbidden("productos"))
    );
    assert_eq!(app.with_navigation(|nav| nav.back_stack_size()), 2);

    assert!(app.with_navigation(|nav| nav.navigate_back()));
    assert_eq!(
        app.current_screen(),
        Screen::DisciplinesSchedules {
            franchise_id: Some(franchise.id),
        }
    );

    app.logout();
    assert_eq!(app.session.state(), SessionState::Inactive);
    assert_eq!(app.current_screen(), Screen::Login);
    assert_eq!(app.with_navigation(|nav| nav.back_stack_size()), 0);
}

#[tokio::test]
async fn disabled_and_unknown_accounts_are_rejected() {
    let pool = support::test_pool().await;
    let store = SqliteStore::new(pool.clone());
    let franchise = support::seed_franchise(&store, "Centro").await;
    let user = support::seed_user(&store, franchise.id, "beto", "clave", &[codes::DASHBOARD_VER]).await;
    store.set_user_active(user.id, false).await.expect("deactivate");
    let app = AppState::from_pool(pool, support::test_config());

    let disabled = app.login("beto", "clave").await.unwrap_err();
    assert!(matches!(disabled, AuthError::Disabled));

    let unknown = app.login("nadie", "clave").await.unwrap_err();
    assert!(matches!(unknown, AuthError::InvalidCredentials));

    let blank = app.login("   ", "clave").await.unwrap_err();
    assert_eq!(blank.to_string(), "Ingrese su nombre de usuario");

    assert!(!app.session.is_session_active());
}

#[tokio::test]
async fn dashboard_only_user_sees_a_single_section() {
    let pool = support::test_pool().await;
    let store = Arc::new(SqliteStore::new(pool));
    let franchise = support::seed_franchise(&store, "Centro").await;
    let user = support::seed_user(&store, franchise.id, "caro", "clave", &[codes::DASHBOARD_VER]).await;

    let session = Arc::new(SessionManager::new());
    session.init_session(user.id, franchise.id, store.clone()).await;

    assert!(session.is_session_active());
    let helper = session.require_permission_helper().expect("helper");
    assert!(helper.can_access_dashboard());
    assert!(!helper.can_view_section("Usuarios"));
    assert!(!helper.is_admin());

    session.clear_session();
    let mut nav = NavigationController::new(session.clone());
    assert_eq!(
        nav.navigate_to_route_name("dashboard", false),
        Err(NavigationError::MissingFranchise("dashboard"))
    );
    assert_eq!(nav.current_screen(), Screen::Login);
}
