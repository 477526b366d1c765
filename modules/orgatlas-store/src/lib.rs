//! Postgres persistence for the organization directory.
//!
//! Every store takes a `PgPool` at construction; there is no process-wide
//! engine or session state.

pub mod activities;
pub mod buildings;
pub mod organizations;

pub use activities::{ActivityPatch, ActivityStore, NewActivity};
pub use buildings::{BuildingPatch, BuildingStore, NewBuilding};
pub use organizations::{NewOrganization, OrganizationPatch, OrganizationStore};

use orgatlas_common::Result;
use sqlx::PgPool;

/// Run the embedded SQL migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
