// Postgres persistence for the activity taxonomy.

use orgatlas_common::{Activity, Result};
use serde::Deserialize;
use sqlx::PgPool;

/// Parameters for inserting a new activity.
#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i32>,
}

/// Partial update for an activity. Absent fields keep their current value.
/// `parent_id` distinguishes "absent" (keep), "null" (detach from parent),
/// and "value" (reattach).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Option<i32>>,
}

#[derive(Clone)]
pub struct ActivityStore {
    pool: PgPool,
}

impl ActivityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Complete snapshot of the taxonomy in id order. The hierarchy
    /// resolver needs every row, not just a subtree.
    pub async fn list(&self) -> Result<Vec<Activity>> {
        let rows = sqlx::query_as::<_, Activity>(
            "SELECT id, name, parent_id FROM activities ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Activity>> {
        let row = sqlx::query_as::<_, Activity>(
            "SELECT id, name, parent_id FROM activities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn create(&self, new: NewActivity) -> Result<Activity> {
        let row = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (name, parent_id)
            VALUES ($1, $2)
            RETURNING id, name, parent_id
            "#,
        )
        .bind(&new.name)
        .bind(new.parent_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Apply a patch. Returns None when the activity does not exist.
    pub async fn update(&self, id: i32, patch: ActivityPatch) -> Result<Option<Activity>> {
        let Some(current) = self.get(id).await? else {
            return Ok(None);
        };

        let name = patch.name.unwrap_or(current.name);
        let parent_id = patch.parent_id.unwrap_or(current.parent_id);

        let row = sqlx::query_as::<_, Activity>(
            r#"
            UPDATE activities
            SET name = $1, parent_id = $2
            WHERE id = $3
            RETURNING id, name, parent_id
            "#,
        )
        .bind(&name)
        .bind(parent_id)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(Some(row))
    }

    /// Delete an activity. Descendants and organization links go with it
    /// via the schema's cascades. Returns false when nothing matched.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_absent_from_null_parent() {
        let absent: ActivityPatch = serde_json::from_str(r#"{"name": "renamed"}"#).unwrap();
        assert_eq!(absent.name.as_deref(), Some("renamed"));
        assert_eq!(absent.parent_id, None, "missing field must mean keep");

        let cleared: ActivityPatch = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(cleared.parent_id, Some(None), "explicit null must mean detach");

        let set: ActivityPatch = serde_json::from_str(r#"{"parent_id": 7}"#).unwrap();
        assert_eq!(set.parent_id, Some(Some(7)));
    }

    #[test]
    fn empty_patch_keeps_everything() {
        let patch: ActivityPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.name.is_none());
        assert!(patch.parent_id.is_none());
    }
}
