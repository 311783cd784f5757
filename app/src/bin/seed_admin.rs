//! Creates a franchise and an administrator holding every permission code.
//!
//! Usage: `seed_admin <franchise> <username> <password> [full name]`

use marbet::config::Config;
use marbet::db::connection::{create_pool, run_migrations};
use marbet::models::user::CreateUser;
use marbet::permissions::table::all_codes;
use marbet::repositories::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marbet=info,seed_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(franchise_name), Some(username), Some(password)) =
        (args.next(), args.next(), args.next())
    else {
        anyhow::bail!("usage: seed_admin <franchise> <username> <password> [full name]");
    };
    let full_name = args.next().unwrap_or_else(|| "Administrador".to_string());

    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;
    let store = SqliteStore::new(pool);

    let franchise = match store.find_franchise_by_name(&franchise_name).await? {
        Some(existing) => existing,
        None => store.create_franchise(&franchise_name, None).await?,
    };
    let user = store
        .create_user(&CreateUser {
            franchise_id: franchise.id,
            username,
            password,
            full_name,
        })
        .await?;
    let codes: Vec<&str> = all_codes().collect();
    store.grant_permissions(user.id, franchise.id, &codes).await?;

    tracing::info!(
        user_id = %user.id,
        franchise_id = %franchise.id,
        permissions = codes.len(),
        "Seeded administrator"
    );
    Ok(())
}
