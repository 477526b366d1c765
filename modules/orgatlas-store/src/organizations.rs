// Postgres persistence for organizations.
//
// Every read path returns organizations pre-joined with their building's
// coordinates and aggregated activity ids, so callers (the geo filter in
// particular) always receive resolved locations.

use anyhow::anyhow;
use orgatlas_common::{OrgAtlasError, Organization, Result};
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;

/// Parameters for inserting a new organization.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrganization {
    pub name: String,
    pub phone_numbers: Vec<String>,
    pub building_id: i32,
    pub activity_ids: Vec<i32>,
}

/// Partial update for an organization. Absent fields keep their current
/// value; a supplied `activity_ids` replaces the whole link set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizationPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_numbers: Option<Vec<String>>,
    #[serde(default)]
    pub building_id: Option<i32>,
    #[serde(default)]
    pub activity_ids: Option<Vec<i32>>,
}

const ORG_SELECT: &str = r#"
SELECT o.id, o.name, o.phone_numbers, o.building_id,
       b.latitude, b.longitude,
       COALESCE(
           ARRAY_AGG(oa.activity_id ORDER BY oa.activity_id)
               FILTER (WHERE oa.activity_id IS NOT NULL),
           '{}'::int4[]
       ) AS activity_ids
FROM organizations o
JOIN buildings b ON b.id = o.building_id
LEFT JOIN organization_activities oa ON oa.organization_id = o.id
"#;

const ORG_GROUP: &str = r#"
GROUP BY o.id, o.name, o.phone_numbers, o.building_id, b.latitude, b.longitude
ORDER BY o.id
"#;

fn org_query(where_clause: &str) -> String {
    format!("{ORG_SELECT} {where_clause} {ORG_GROUP}")
}

#[derive(Clone)]
pub struct OrganizationStore {
    pool: PgPool,
}

impl OrganizationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Organization>> {
        let rows = sqlx::query_as::<_, Organization>(&org_query(""))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Organization>> {
        let row = sqlx::query_as::<_, Organization>(&org_query("WHERE o.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Organizations located in a given building.
    pub async fn by_building(&self, building_id: i32) -> Result<Vec<Organization>> {
        let rows = sqlx::query_as::<_, Organization>(&org_query("WHERE o.building_id = $1"))
            .bind(building_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Case-insensitive substring match on the organization name.
    pub async fn search_by_name(&self, name_substr: &str) -> Result<Vec<Organization>> {
        let rows =
            sqlx::query_as::<_, Organization>(&org_query("WHERE o.name ILIKE '%' || $1 || '%'"))
                .bind(name_substr)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    /// Distinct organizations linked to any of the given activity ids.
    pub async fn by_activity_ids(&self, activity_ids: &[i32]) -> Result<Vec<Organization>> {
        if activity_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Organization>(&org_query(
            r#"
            WHERE o.id IN (
                SELECT organization_id FROM organization_activities
                WHERE activity_id = ANY($1)
            )
            "#,
        ))
        .bind(activity_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert an organization and its activity links. Every referenced
    /// activity must exist; the first missing one aborts with
    /// `UnknownActivity` before anything is written.
    pub async fn create(&self, new: NewOrganization) -> Result<Organization> {
        self.ensure_activities_exist(&new.activity_ids).await?;

        let mut tx = self.pool.begin().await?;

        let org_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO organizations (name, phone_numbers, building_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&new.name)
        .bind(Json(&new.phone_numbers))
        .bind(new.building_id)
        .fetch_one(&mut *tx)
        .await?;

        for activity_id in &new.activity_ids {
            sqlx::query(
                "INSERT INTO organization_activities (organization_id, activity_id) VALUES ($1, $2)",
            )
            .bind(org_id)
            .bind(activity_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get(org_id)
            .await?
            .ok_or_else(|| OrgAtlasError::Other(anyhow!("organization {org_id} vanished after insert")))
    }

    /// Apply a patch. Returns None when the organization does not exist.
    pub async fn update(&self, id: i32, patch: OrganizationPatch) -> Result<Option<Organization>> {
        let Some(current) = self.get(id).await? else {
            return Ok(None);
        };

        if let Some(activity_ids) = &patch.activity_ids {
            self.ensure_activities_exist(activity_ids).await?;
        }

        let name = patch.name.unwrap_or(current.name);
        let phone_numbers = patch.phone_numbers.unwrap_or(current.phone_numbers);
        let building_id = patch.building_id.unwrap_or(current.building_id);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE organizations SET name = $1, phone_numbers = $2, building_id = $3 WHERE id = $4",
        )
        .bind(&name)
        .bind(Json(&phone_numbers))
        .bind(building_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if let Some(activity_ids) = &patch.activity_ids {
            sqlx::query("DELETE FROM organization_activities WHERE organization_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for activity_id in activity_ids {
                sqlx::query(
                    "INSERT INTO organization_activities (organization_id, activity_id) VALUES ($1, $2)",
                )
                .bind(id)
                .bind(activity_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        self.get(id).await
    }

    /// Delete an organization and its links. Returns false when nothing
    /// matched.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ensure_activities_exist(&self, ids: &[i32]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let found: Vec<i32> = sqlx::query_scalar("SELECT id FROM activities WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        for id in ids {
            if !found.contains(id) {
                return Err(OrgAtlasError::UnknownActivity(*id));
            }
        }
        Ok(())
    }
}
