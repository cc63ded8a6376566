use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile snapshot bound to a connection at authentication time.
///
/// Fetched once from the user store and never refreshed for the lifetime of
/// the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
