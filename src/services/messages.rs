use crate::error::AppResult;
use crate::models::NewPrivateMessage;
use async_trait::async_trait;
use deadpool_postgres::Pool;
use uuid::Uuid;

/// Storage collaborator for private messages. Write-only from the relay's
/// perspective; history retrieval belongs to the REST API, not the relay.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn save_private_message(&self, msg: &NewPrivateMessage) -> AppResult<()>;
}

pub struct PgMessageStore {
    db: Pool,
}

impl PgMessageStore {
    pub fn new(db: Pool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn save_private_message(&self, msg: &NewPrivateMessage) -> AppResult<()> {
        let client = self.db.get().await?;
        client
            .execute(
                r#"
                INSERT INTO private_messages (id, sender_id, receiver_id, content, sent_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
                &[
                    &Uuid::new_v4(),
                    &msg.sender_id,
                    &msg.receiver_id,
                    &msg.content,
                    &msg.sent_at,
                ],
            )
            .await?;
        Ok(())
    }
}
