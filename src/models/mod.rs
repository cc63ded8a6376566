pub mod message;
pub mod user;

pub use message::NewPrivateMessage;
pub use user::UserProfile;
