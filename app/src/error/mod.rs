use thiserror::Error;

/// Failures raised at the persistence boundary and by the binaries' bootstrap.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("internal error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(db.message().to_string())
            }
            _ => AppError::Database(err),
        }
    }
}

/// Login failures. The `Display` text is what the login screen shows.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Ingrese su nombre de usuario")]
    MissingUsername,
    #[error("Ingrese su contraseña")]
    MissingPassword,
    #[error("Usuario o contraseña incorrectos")]
    InvalidCredentials,
    #[error("El usuario está desactivado")]
    Disabled,
    #[error("Error al cargar permisos")]
    PermissionsUnavailable,
    #[error("El inicio de sesión fue interrumpido")]
    Interrupted,
    #[error("No se pudo verificar las credenciales")]
    Unavailable(#[source] AppError),
}

/// Raised by accessors that assume an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no active session")]
    NotActive,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("unknown route `{0}`")]
    UnknownRoute(String),
    #[error("route `{0}` requires an active franchise")]
    MissingFranchise(&'static str),
    #[error("route `{0}` is not permitted for this session")]
    Forbidden(&'static str),
}
