// Postgres persistence for buildings.

use orgatlas_common::{Building, Result};
use serde::Deserialize;
use sqlx::PgPool;

/// Parameters for inserting a new building.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBuilding {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Partial update for a building. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildingPatch {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Clone)]
pub struct BuildingStore {
    pool: PgPool,
}

impl BuildingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Building>> {
        let rows = sqlx::query_as::<_, Building>(
            "SELECT id, address, latitude, longitude FROM buildings ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Building>> {
        let row = sqlx::query_as::<_, Building>(
            "SELECT id, address, latitude, longitude FROM buildings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn create(&self, new: NewBuilding) -> Result<Building> {
        let row = sqlx::query_as::<_, Building>(
            r#"
            INSERT INTO buildings (address, latitude, longitude)
            VALUES ($1, $2, $3)
            RETURNING id, address, latitude, longitude
            "#,
        )
        .bind(&new.address)
        .bind(new.latitude)
        .bind(new.longitude)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Apply a patch. Returns None when the building does not exist.
    pub async fn update(&self, id: i32, patch: BuildingPatch) -> Result<Option<Building>> {
        let Some(current) = self.get(id).await? else {
            return Ok(None);
        };

        let address = patch.address.unwrap_or(current.address);
        let latitude = patch.latitude.unwrap_or(current.latitude);
        let longitude = patch.longitude.unwrap_or(current.longitude);

        let row = sqlx::query_as::<_, Building>(
            r#"
            UPDATE buildings
            SET address = $1, latitude = $2, longitude = $3
            WHERE id = $4
            RETURNING id, address, latitude, longitude
            "#,
        )
        .bind(&address)
        .bind(latitude)
        .bind(longitude)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(Some(row))
    }

    /// Delete a building. Its organizations go with it via the schema's
    /// cascade. Returns false when nothing matched.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM buildings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
