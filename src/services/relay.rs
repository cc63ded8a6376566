use crate::error::AppError;
use crate::models::{NewPrivateMessage, UserProfile};
use crate::services::auth::TokenVerifier;
use crate::services::messages::MessageStore;
use crate::services::users::UserStore;
use crate::websocket::message_types::{WsInboundEvent, WsOutboundEvent, FALLBACK_ACK};
use crate::websocket::{SessionId, SessionRegistry};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// State change requested by frame handling, applied by the connection
/// actor that owns the session.
#[derive(Debug)]
pub enum SessionCommand {
    /// Bind the authenticated profile to the connection. Happens at most
    /// once; the binding is immutable afterwards.
    Bind(UserProfile),
    /// Close the connection (failed authentication).
    Close,
}

/// Glue between WebSocket sessions and the external collaborators: token
/// verification, user lookup, live relay and message persistence.
pub struct ChatService {
    registry: SessionRegistry,
    verifier: TokenVerifier,
    users: Arc<dyn UserStore>,
    messages: Arc<dyn MessageStore>,
}

impl ChatService {
    pub fn new(
        registry: SessionRegistry,
        verifier: TokenVerifier,
        users: Arc<dyn UserStore>,
        messages: Arc<dyn MessageStore>,
    ) -> Self {
        Self {
            registry,
            verifier,
            users,
            messages,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Dispatch one inbound text frame on behalf of a session.
    ///
    /// `user` is the profile bound to the connection, if authentication
    /// already succeeded. All outbound traffic goes through `sender`; the
    /// returned command is the only state the actor has to apply itself.
    pub async fn handle_frame(
        &self,
        session_id: SessionId,
        user: Option<&UserProfile>,
        sender: &UnboundedSender<String>,
        raw: &str,
    ) -> Option<SessionCommand> {
        match serde_json::from_str::<WsInboundEvent>(raw) {
            Ok(WsInboundEvent::Authenticate { token }) => {
                if user.is_some() {
                    // The bound identity is immutable for the connection's
                    // lifetime; a second authenticate is refused outright.
                    send_event(
                        sender,
                        &WsOutboundEvent::Error {
                            message: "already authenticated".to_string(),
                        },
                    );
                    return None;
                }
                match self.authenticate(session_id, sender, &token).await {
                    Ok(profile) => Some(SessionCommand::Bind(profile)),
                    Err(e) => {
                        tracing::warn!(error = %e, "authentication failed");
                        send_event(
                            sender,
                            &WsOutboundEvent::Error {
                                message: AppError::InvalidToken.to_string(),
                            },
                        );
                        Some(SessionCommand::Close)
                    }
                }
            }
            Ok(WsInboundEvent::PrivateMessage {
                sender_id,
                receiver_id,
                content,
                timestamp,
            }) => {
                if user.is_none() {
                    send_event(
                        sender,
                        &WsOutboundEvent::Error {
                            message: AppError::Unauthenticated.to_string(),
                        },
                    );
                    return None;
                }
                self.relay_private_message(sender, sender_id, receiver_id, content, timestamp)
                    .await;
                None
            }
            Err(_) => {
                // Unknown type, plain string, or malformed JSON: log and
                // acknowledge with the raw string clients already expect.
                tracing::info!(frame = %raw, "inbound frame outside the envelope schema");
                let _ = sender.send(FALLBACK_ACK.to_string());
                None
            }
        }
    }

    /// Verify the bearer token, resolve the profile and register the session.
    ///
    /// Signature, expiry and lookup failures all surface as `InvalidToken`;
    /// the caller sends the error envelope and closes the connection. No
    /// retry: a fresh connection is required to try again.
    pub async fn authenticate(
        &self,
        session_id: SessionId,
        sender: &UnboundedSender<String>,
        token: &str,
    ) -> Result<UserProfile, AppError> {
        let claims = self.verifier.verify(token)?;

        let profile = match self.users.get_user_by_id(claims.user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::warn!(user_id = %claims.user_id, "token resolved to unknown user");
                return Err(AppError::InvalidToken);
            }
            Err(e) => {
                tracing::error!(error = %e, "user lookup failed during authentication");
                return Err(AppError::InvalidToken);
            }
        };

        self.registry
            .register(session_id, profile.clone(), sender.clone())
            .await;
        send_event(
            sender,
            &WsOutboundEvent::Authenticated {
                message: "authenticated successfully".to_string(),
            },
        );
        self.registry.broadcast_presence().await;

        tracing::info!(user_id = %profile.id, "session authenticated");
        Ok(profile)
    }

    /// Best-effort live delivery followed by unconditional persistence.
    ///
    /// Delivery and persistence are independent: a message to an offline
    /// user is still stored, and a failed store does not retract a delivery
    /// that already happened. The sender gets no delivery acknowledgment,
    /// only an error envelope when the store write fails.
    pub async fn relay_private_message(
        &self,
        sender: &UnboundedSender<String>,
        sender_id: Uuid,
        receiver_id: Uuid,
        content: String,
        timestamp: DateTime<Utc>,
    ) {
        if let Some(receiver) = self.registry.find_by_user_id(receiver_id).await {
            send_event(
                &receiver,
                &WsOutboundEvent::PrivateMessage {
                    from: sender_id,
                    to: receiver_id,
                    content: content.clone(),
                    timestamp,
                },
            );
        }

        let record = NewPrivateMessage {
            sender_id,
            receiver_id,
            content,
            sent_at: timestamp,
        };
        if let Err(e) = self.messages.save_private_message(&record).await {
            tracing::error!(
                error = %e,
                sender_id = %sender_id,
                receiver_id = %receiver_id,
                "failed to persist private message"
            );
            send_event(
                sender,
                &WsOutboundEvent::Error {
                    message: "error saving message".to_string(),
                },
            );
        }
    }

    /// Drop a closed session from the registry and re-broadcast presence.
    pub async fn disconnect(&self, session_id: SessionId) {
        self.registry.deregister(session_id).await;
        self.registry.broadcast_presence().await;
    }
}

/// Serialize and push an outbound event; a closed channel means the
/// connection is gone and the event is dropped.
fn send_event(sender: &UnboundedSender<String>, event: &WsOutboundEvent) {
    match event.to_json() {
        Ok(payload) => {
            let _ = sender.send(payload);
        }
        Err(e) => tracing::error!(error = %e, "failed to serialize outbound event"),
    }
}
