use marbet::{
    db::connection::{create_pool, run_migrations},
    error::AppError,
    models::user::CreateUser,
    permissions::codes,
    repositories::{DashboardRepository, PermissionRepository, SqliteStore, UserRepository},
    types::UserId,
};

#[path = "support/mod.rs"]
mod support;

use support::date;

#[tokio::test]
async fn permissions_are_scoped_to_user_and_franchise() {
    let store = SqliteStore::new(support::test_pool().await);
    let centro = support::seed_franchise(&store, "Centro").await;
    let norte = support::seed_franchise(&store, "Norte").await;
    let ana = support::seed_user(
        &store,
        centro.id,
        "ana",
        "secreto",
        &[codes::DASHBOARD_VER, codes::ALUMNOS_VER],
    )
    .await;
    store
        .grant_permissions(ana.id, norte.id, &[codes::PRODUCTOS_VER])
        .await
        .expect("grant in second franchise");

    let in_centro = store
        .permissions_for_user(ana.id, centro.id)
        .await
        .expect("fetch permissions");
    assert_eq!(in_centro, vec!["ALUMNOS_VER", "DASHBOARD_VER"]);

    let in_norte = store
        .permissions_for_user(ana.id, norte.id)
        .await
        .expect("fetch permissions");
    assert_eq!(in_norte, vec!["PRODUCTOS_VER"]);

    let nobody = store
        .permissions_for_user(UserId::new(999), centro.id)
        .await
        .expect("fetch permissions");
    assert!(nobody.is_empty());
}

#[tokio::test]
async fn granting_twice_and_revoking() {
    let store = SqliteStore::new(support::test_pool().await);
    let franchise = support::seed_franchise(&store, "Centro").await;
    let user = support::seed_user(&store, franchise.id, "luis", "clave", &[codes::EVENTOS_VER]).await;

    store
        .grant_permissions(user.id, franchise.id, &[codes::EVENTOS_VER, codes::EVENTOS_CREAR])
        .await
        .expect("grant again");
    assert_eq!(
        store
            .permissions_for_user(user.id, franchise.id)
            .await
            .expect("fetch"),
        vec!["EVENTOS_CREAR", "EVENTOS_VER"]
    );

    assert!(store
        .revoke_permission(user.id, franchise.id, codes::EVENTOS_CREAR)
        .await
        .expect("revoke"));
    assert!(!store
        .revoke_permission(user.id, franchise.id, codes::EVENTOS_CREAR)
        .await
        .expect("revoke again"));
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let store = SqliteStore::new(support::test_pool().await);
    let franchise = support::seed_franchise(&store, "Centro").await;
    support::seed_user(&store, franchise.id, "ana", "secreto", &[]).await;

    let err = store
        .create_user(&CreateUser {
            franchise_id: franchise.id,
            username: "ana".into(),
            password: "otra".into(),
            full_name: "Otra Ana".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn users_are_found_and_deactivated() {
    let store = SqliteStore::new(support::test_pool().await);
    let franchise = support::seed_franchise(&store, "Centro").await;
    let user = support::seed_user(&store, franchise.id, "ana", "secreto", &[]).await;

    let found = store
        .find_by_username("ana")
        .await
        .expect("lookup")
        .expect("user exists");
    assert_eq!(found.id, user.id);
    assert_ne!(found.password_hash, "secreto");
    assert!(found.is_active);

    store.set_user_active(user.id, false).await.expect("deactivate");
    let by_id = store.find_by_id(user.id).await.expect("lookup").expect("user exists");
    assert!(!by_id.is_active);

    let missing = store.set_user_active(UserId::new(404), false).await.unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));
}

#[tokio::test]
async fn dashboard_counts_only_active_rows_and_running_events() {
    let store = SqliteStore::new(support::test_pool().await);
    let pool = store.pool().clone();
    let centro = support::seed_franchise(&store, "Centro").await;
    let norte = support::seed_franchise(&store, "Norte").await;
    support::seed_user(&store, centro.id, "ana", "secreto", &[]).await;
    let inactive = support::seed_user(&store, centro.id, "beto", "secreto", &[]).await;
    store.set_user_active(inactive.id, false).await.expect("deactivate");
    support::seed_user(&store, norte.id, "carla", "secreto", &[]).await;

    support::seed_student(&pool, centro.id, "Camila", Some(date(2018, 3, 12)), true).await;
    support::seed_student(&pool, centro.id, "Sofía", None, true).await;
    support::seed_student(&pool, centro.id, "Retirada", Some(date(2017, 3, 11)), false).await;
    support::seed_student(&pool, norte.id, "Otra sede", Some(date(2018, 3, 12)), true).await;
    support::seed_discipline(&pool, centro.id, "Ballet").await;
    support::seed_discipline(&pool, centro.id, "Jazz").await;
    support::seed_event(&pool, centro.id, "Recital", "evento", date(2024, 3, 1), date(2024, 3, 20)).await;
    support::seed_event(&pool, centro.id, "2x1", "promocion", date(2024, 3, 10), date(2024, 3, 10)).await;
    support::seed_event(&pool, centro.id, "Pasado", "evento", date(2024, 1, 1), date(2024, 1, 31)).await;

    let counts = store.counts(centro.id, date(2024, 3, 10)).await.expect("counts");
    assert_eq!(counts.students, 2);
    assert_eq!(counts.staff, 1);
    assert_eq!(counts.disciplines, 2);
    assert_eq!(counts.active_events, 2);

    let birthdays = store.student_birthdays(centro.id).await.expect("birthdays");
    assert_eq!(birthdays.len(), 1);
    assert_eq!(birthdays[0].full_name, "Camila");
    assert_eq!(birthdays[0].birth_date, date(2018, 3, 12));
}

#[tokio::test]
async fn file_database_survives_reopening() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("marbet.db").display());

    {
        let pool = create_pool(&url).await.expect("open file database");
        run_migrations(&pool).await.expect("run migrations");
        let store = SqliteStore::new(pool.clone());
        support::seed_franchise(&store, "Centro").await;
        pool.close().await;
    }

    let pool = create_pool(&url).await.expect("reopen file database");
    run_migrations(&pool).await.expect("migrations are idempotent");
    let store = SqliteStore::new(pool);
    let franchise = store
        .find_franchise_by_name("Centro")
        .await
        .expect("lookup")
        .expect("franchise persisted");
    assert_eq!(franchise.city.as_deref(), Some("Quito"));
}
