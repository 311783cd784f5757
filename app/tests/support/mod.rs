#![allow(dead_code)]
use chrono::NaiveDate;
use marbet::{
    config::Config,
    db::connection::{create_pool, run_migrations, DbPool},
    models::{franchise::Franchise, user::CreateUser, user::User},
    repositories::SqliteStore,
    types::{FranchiseId, StudentId},
};

pub async fn test_pool() -> DbPool {
    let pool = create_pool("sqlite::memory:")
        .await
        .expect("open in-memory database");
    run_migrations(&pool).await.expect("run migrations");
    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".into(),
        dashboard_refresh_secs: 30,
        birthday_window_days: 7,
        time_zone: chrono_tz::UTC,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub async fn seed_franchise(store: &SqliteStore, name: &str) -> Franchise {
    store
        .create_franchise(name, Some("Quito"))
        .await
        .expect("create franchise")
}

pub async fn seed_user(
    store: &SqliteStore,
    franchise_id: FranchiseId,
    username: &str,
    password: &str,
    codes: &[&str],
) -> User {
    let user = store
        .create_user(&CreateUser {
            franchise_id,
            username: username.into(),
            password: password.into(),
            full_name: format!("{username} de prueba"),
        })
        .await
        .expect("create user");
    store
        .grant_permissions(user.id, franchise_id, codes)
        .await
        .expect("grant permissions");
    user
}

pub async fn seed_student(
    pool: &DbPool,
    franchise_id: FranchiseId,
    full_name: &str,
    birth_date: Option<NaiveDate>,
    is_active: bool,
) -> StudentId {
    sqlx::query_scalar::<_, StudentId>(
        "INSERT INTO students (franchise_id, full_name, birth_date, is_active) \
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(franchise_id)
    .bind(full_name)
    .bind(birth_date)
    .bind(is_active)
    .fetch_one(pool)
    .await
    .expect("insert student")
}

pub async fn seed_discipline(pool: &DbPool, franchise_id: FranchiseId, name: &str) {
    sqlx::query("INSERT INTO disciplines (franchise_id, name) VALUES (?, ?)")
        .bind(franchise_id)
        .bind(name)
        .execute(pool)
        .await
        .expect("insert discipline");
}

pub async fn seed_event(
    pool: &DbPool,
    franchise_id: FranchiseId,
    title: &str,
    kind: &str,
    starts_on: NaiveDate,
    ends_on: NaiveDate,
) {
    sqlx::query(
        "INSERT INTO events (franchise_id, title, kind, starts_on, ends_on) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(franchise_id)
    .bind(title)
    .bind(kind)
    .bind(starts_on)
    .bind(ends_on)
    .execute(pool)
    .await
    .expect("insert event");
}
