use thiserror::Error;

/// Result type alias for orgatlas operations.
pub type Result<T> = std::result::Result<T, OrgAtlasError>;

#[derive(Error, Debug)]
pub enum OrgAtlasError {
    #[error("Activity {0} not found")]
    UnknownActivity(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
