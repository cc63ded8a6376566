pub mod auth;
pub mod messages;
pub mod relay;
pub mod users;

pub use auth::TokenVerifier;
pub use messages::{MessageStore, PgMessageStore};
pub use relay::ChatService;
pub use users::{PgUserStore, UserStore};
