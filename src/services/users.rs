use crate::error::AppResult;
use crate::models::UserProfile;
use async_trait::async_trait;
use deadpool_postgres::Pool;
use uuid::Uuid;

/// Lookup collaborator resolving a user id to a profile snapshot.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>>;
}

pub struct PgUserStore {
    db: Pool,
}

impl PgUserStore {
    pub fn new(db: Pool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_user_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        let client = self.db.get().await?;
        let row = client
            .query_opt(
                "SELECT id, username, email, avatar_url FROM users WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.map(|row| UserProfile {
            id: row.get(0),
            username: row.get(1),
            email: row.get(2),
            avatar_url: row.get(3),
        }))
    }
}
