use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use url::Url;
use uuid::Uuid;

use common::node::{BackendKind, Credentials, FederationParams, Node};

use super::{is_unique_violation, Database};

/// Parameters for registering a new storage node.
#[derive(Debug, Clone)]
pub struct CreateNodeParams {
    pub name: String,
    pub endpoint: Url,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Federation parameters; a role ARN makes the node cloud-backed.
    pub sts_api_url: Option<Url>,
    pub role_arn: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateNodeError {
    #[error("duplicate node name: '{0}'")]
    DuplicateName(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum NodeQueryError {
    #[error("corrupt node row: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Database {
    /// Register a new node. Name collisions reject the insert and leave the
    /// existing node untouched.
    pub async fn create_node(&self, params: CreateNodeParams) -> Result<Node, CreateNodeError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        let kind = match &params.role_arn {
            Some(role_arn) => BackendKind::Cloud {
                federation: FederationParams {
                    sts_api_url: params.sts_api_url.clone(),
                    role_arn: role_arn.clone(),
                },
            },
            None => BackendKind::SelfHosted,
        };

        let result = sqlx::query(
            r#"
            INSERT INTO nodes (
                id, name, endpoint, region, access_key_id, secret_access_key,
                backend_kind, sts_api_url, role_arn, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&params.name)
        .bind(params.endpoint.as_str())
        .bind(&params.region)
        .bind(&params.access_key_id)
        .bind(&params.secret_access_key)
        .bind(kind.as_str())
        .bind(params.sts_api_url.as_ref().map(Url::as_str))
        .bind(&params.role_arn)
        .bind(created_at.to_rfc3339())
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(CreateNodeError::DuplicateName(params.name));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Node {
            id,
            name: params.name,
            endpoint: params.endpoint,
            region: params.region,
            credentials: Credentials::new(params.access_key_id, params.secret_access_key),
            kind,
            created_at,
        })
    }

    pub async fn get_node(&self, id: &Uuid) -> Result<Option<Node>, NodeQueryError> {
        let row = sqlx::query("SELECT * FROM nodes WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| node_from_row(&r)).transpose()
    }

    pub async fn get_node_by_name(&self, name: &str) -> Result<Option<Node>, NodeQueryError> {
        let row = sqlx::query("SELECT * FROM nodes WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| node_from_row(&r)).transpose()
    }

    pub async fn list_nodes(&self) -> Result<Vec<Node>, NodeQueryError> {
        let rows = sqlx::query("SELECT * FROM nodes ORDER BY created_at ASC")
            .fetch_all(self.pool())
            .await?;
        rows.iter().map(node_from_row).collect()
    }

    /// Delete a node by name. Roots bound to it are cascaded away.
    pub async fn delete_node(&self, name: &str) -> Result<bool, NodeQueryError> {
        let result = sqlx::query("DELETE FROM nodes WHERE name = ?")
            .bind(name)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn node_from_row(row: &SqliteRow) -> Result<Node, NodeQueryError> {
    let corrupt = |detail: String| NodeQueryError::Corrupt(detail);

    let id: String = row.get("id");
    let id = Uuid::parse_str(&id).map_err(|e| corrupt(format!("id '{}': {}", id, e)))?;

    let endpoint: String = row.get("endpoint");
    let endpoint =
        Url::parse(&endpoint).map_err(|e| corrupt(format!("endpoint '{}': {}", endpoint, e)))?;

    let sts_api_url: Option<String> = row.get("sts_api_url");
    let sts_api_url = sts_api_url
        .map(|s| Url::parse(&s).map_err(|e| corrupt(format!("sts_api_url '{}': {}", s, e))))
        .transpose()?;

    let backend_kind: String = row.get("backend_kind");
    let kind = match backend_kind.as_str() {
        "cloud" => {
            let role_arn: Option<String> = row.get("role_arn");
            let role_arn =
                role_arn.ok_or_else(|| corrupt("cloud node without role_arn".to_string()))?;
            BackendKind::Cloud {
                federation: FederationParams {
                    sts_api_url,
                    role_arn,
                },
            }
        }
        _ => BackendKind::SelfHosted,
    };

    let created_at: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| corrupt(format!("created_at '{}': {}", created_at, e)))?
        .with_timezone(&Utc);

    Ok(Node {
        id,
        name: row.get("name"),
        endpoint,
        region: row.get("region"),
        credentials: Credentials::new(
            row.get::<String, _>("access_key_id"),
            row.get::<String, _>("secret_access_key"),
        ),
        kind,
        created_at,
    })
}
