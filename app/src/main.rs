use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marbet::config::Config;
use marbet::db::connection::{create_pool, run_migrations, DbPool};
use marbet::navigation::Route;
use marbet::services::RefreshHandle;
use marbet::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marbet=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        dashboard_refresh_secs = config.dashboard_refresh_secs,
        birthday_window_days = config.birthday_window_days,
        time_zone = %config.time_zone,
        "Loaded configuration from environment/.env"
    );

    let pool: DbPool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let app = AppState::from_pool(pool, config);
    tracing::info!("Ready. Commands: login <user> <password>, open <route>, back, logout, quit");

    let mut refresh: Option<RefreshHandle> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        let mut words = line.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("login"), Some(username), Some(password)) => {
                match app.login(username, password).await {
                    Ok(state) => {
                        tracing::info!(?state, screen = ?app.current_screen(), "Signed in");
                        refresh = app.start_dashboard_refresh().ok();
                    }
                    Err(err) => tracing::warn!("{err}"),
                }
            }
            (Some("open"), Some(name), _) => {
                let result = name
                    .parse::<Route>()
                    .and_then(|route| app.open(route, false));
                match result {
                    Ok(()) => tracing::info!(screen = ?app.current_screen(), "Opened"),
                    Err(err) => tracing::warn!("{err}"),
                }
            }
            (Some("back"), _, _) => {
                if app.with_navigation(|nav| nav.navigate_back()) {
                    let route = app.with_navigation(|nav| nav.current_route());
                    tracing::info!(%route, "Went back");
                }
            }
            (Some("dashboard"), _, _) => match refresh.as_ref().and_then(|h| h.latest()) {
                Some(snapshot) => tracing::info!(?snapshot, "Dashboard"),
                None => tracing::info!("No dashboard data yet"),
            },
            (Some("logout"), _, _) => {
                refresh = None;
                app.logout();
            }
            (Some("quit"), _, _) => break,
            (None, _, _) => {}
            (Some(other), _, _) => tracing::warn!(command = other, "Unknown command"),
        }
    }

    drop(refresh);
    app.logout();
    Ok(())
}
