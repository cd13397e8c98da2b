use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use common::root::{base_paths_conflict, normalize_base_path, Root, RootType};

use super::{is_unique_violation, Database};

/// Parameters for creating a new root.
#[derive(Debug, Clone)]
pub struct CreateRootParams {
    pub node_name: String,
    pub root_type: RootType,
    pub bucket: String,
    /// Raw base path as supplied by the administrator; normalized on insert.
    pub base_path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateRootError {
    #[error("unknown node: '{0}'")]
    UnknownNode(String),

    #[error("base path '{base_path}' conflicts with existing root '{existing}' in bucket '{bucket}'")]
    PathConflict {
        base_path: String,
        existing: String,
        bucket: String,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RootQueryError {
    #[error("corrupt root row: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Database {
    /// Create a root bound to the named node.
    ///
    /// The node lookup, overlap check and insert run in one transaction, so
    /// a rejected creation commits nothing.
    pub async fn create_root(&self, params: CreateRootParams) -> Result<Root, CreateRootError> {
        let base_path = normalize_base_path(&params.base_path);
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        let mut tx = self.pool().begin().await?;

        let node_row = sqlx::query("SELECT id FROM nodes WHERE name = ?")
            .bind(&params.node_name)
            .fetch_optional(&mut *tx)
            .await?;
        let node_id: String = match node_row {
            Some(row) => row.get("id"),
            None => return Err(CreateRootError::UnknownNode(params.node_name)),
        };

        let existing = sqlx::query("SELECT base_path FROM roots WHERE node_id = ? AND bucket = ?")
            .bind(&node_id)
            .bind(&params.bucket)
            .fetch_all(&mut *tx)
            .await?;
        for row in &existing {
            let other: String = row.get("base_path");
            if base_paths_conflict(&base_path, &other) {
                return Err(CreateRootError::PathConflict {
                    base_path,
                    existing: other,
                    bucket: params.bucket,
                });
            }
        }

        let insert = sqlx::query(
            r#"
            INSERT INTO roots (id, node_id, root_type, bucket, base_path, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&node_id)
        .bind(params.root_type.as_str())
        .bind(&params.bucket)
        .bind(&base_path)
        .bind(created_at.to_rfc3339())
        .execute(&mut *tx)
        .await;

        match insert {
            Ok(_) => {}
            // Lost race on an identical base path; same answer as the check.
            Err(e) if is_unique_violation(&e) => {
                return Err(CreateRootError::PathConflict {
                    existing: base_path.clone(),
                    base_path,
                    bucket: params.bucket,
                });
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;

        let node_id = Uuid::parse_str(&node_id)
            .map_err(|_| CreateRootError::UnknownNode(params.node_name))?;
        Ok(Root {
            id,
            node_id,
            root_type: params.root_type,
            bucket: params.bucket,
            base_path,
            created_at,
        })
    }

    pub async fn get_root(&self, id: &Uuid) -> Result<Option<Root>, RootQueryError> {
        let row = sqlx::query("SELECT * FROM roots WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| root_from_row(&r)).transpose()
    }

    /// All roots, oldest first. Resolution re-reads this per request.
    pub async fn list_roots(&self) -> Result<Vec<Root>, RootQueryError> {
        let rows = sqlx::query("SELECT * FROM roots ORDER BY created_at ASC")
            .fetch_all(self.pool())
            .await?;
        rows.iter().map(root_from_row).collect()
    }

    pub async fn delete_root(&self, id: &Uuid) -> Result<bool, RootQueryError> {
        let result = sqlx::query("DELETE FROM roots WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn root_from_row(row: &SqliteRow) -> Result<Root, RootQueryError> {
    let corrupt = |detail: String| RootQueryError::Corrupt(detail);

    let id: String = row.get("id");
    let id = Uuid::parse_str(&id).map_err(|e| corrupt(format!("id '{}': {}", id, e)))?;

    let node_id: String = row.get("node_id");
    let node_id =
        Uuid::parse_str(&node_id).map_err(|e| corrupt(format!("node_id '{}': {}", node_id, e)))?;

    let created_at: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| corrupt(format!("created_at '{}': {}", created_at, e)))?
        .with_timezone(&Utc);

    Ok(Root {
        id,
        node_id,
        root_type: RootType::parse(row.get::<String, _>("root_type").as_str()),
        bucket: row.get("bucket"),
        base_path: row.get("base_path"),
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    use crate::database::CreateNodeParams;

    async fn db_with_node(name: &str) -> Database {
        let db = Database::in_memory().await.unwrap();
        db.create_node(CreateNodeParams {
            name: name.to_string(),
            endpoint: Url::parse("http://localhost:9000").unwrap(),
            region: common::node::DEFAULT_REGION.to_string(),
            access_key_id: "AK".to_string(),
            secret_access_key: "SK".to_string(),
            sts_api_url: None,
            role_arn: None,
        })
        .await
        .unwrap();
        db
    }

    fn params(node: &str, bucket: &str, base_path: &str) -> CreateRootParams {
        CreateRootParams {
            node_name: node.to_string(),
            root_type: RootType::Public,
            bucket: bucket.to_string(),
            base_path: base_path.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_base_path() {
        let db = db_with_node("n1").await;
        let root = db.create_root(params("n1", "bucket1", "/shared")).await.unwrap();
        assert_eq!(root.base_path, "shared/");

        let listed = db.list_roots().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].base_path, "shared/");
    }

    #[tokio::test]
    async fn test_unknown_node_rejected() {
        let db = db_with_node("n1").await;
        let err = db
            .create_root(params("missing", "bucket1", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, CreateRootError::UnknownNode(name) if name == "missing"));
        assert!(db.list_roots().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_base_path_conflicts() {
        let db = db_with_node("n1").await;
        db.create_root(params("n1", "bucketA", "public/")).await.unwrap();

        let err = db
            .create_root(params("n1", "bucketA", "public/"))
            .await
            .unwrap_err();
        assert!(matches!(err, CreateRootError::PathConflict { .. }));
        // Nothing was committed for the rejected creation.
        assert_eq!(db.list_roots().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_nested_base_path_conflicts() {
        let db = db_with_node("n1").await;
        db.create_root(params("n1", "bucketA", "public/")).await.unwrap();

        let err = db
            .create_root(params("n1", "bucketA", "public/docs/"))
            .await
            .unwrap_err();
        assert!(matches!(err, CreateRootError::PathConflict { .. }));
    }

    #[tokio::test]
    async fn test_catch_all_coexists_with_nested_root() {
        let db = db_with_node("n1").await;
        db.create_root(params("n1", "bucketA", "")).await.unwrap();
        db.create_root(params("n1", "bucketA", "public/")).await.unwrap();

        assert_eq!(db.list_roots().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_same_base_path_on_other_bucket_is_fine() {
        let db = db_with_node("n1").await;
        db.create_root(params("n1", "bucketA", "shared/")).await.unwrap();
        db.create_root(params("n1", "bucketB", "shared/")).await.unwrap();

        assert_eq!(db.list_roots().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_root() {
        let db = db_with_node("n1").await;
        let root = db.create_root(params("n1", "bucket1", "x/")).await.unwrap();

        assert!(db.delete_root(&root.id).await.unwrap());
        assert!(!db.delete_root(&root.id).await.unwrap());
        assert!(db.get_root(&root.id).await.unwrap().is_none());
    }
}
