use crate::models::UserProfile;
use crate::services::relay::SessionCommand;
use crate::services::ChatService;
use crate::state::AppState;
use crate::websocket::SessionId;
use actix::{Actor, ActorContext, AsyncContext, Handler, Message as ActixMessage, StreamHandler};
use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound payload forwarded from the session channel to the socket.
#[derive(ActixMessage)]
#[rtype(result = "()")]
struct OutboundText(String);

/// State change produced by frame handling.
#[derive(ActixMessage)]
#[rtype(result = "()")]
struct ApplyCommand(SessionCommand);

/// One WebSocket connection.
///
/// Starts unauthenticated and may stay that way indefinitely; a successful
/// authenticate frame binds a profile for the rest of the connection's life.
struct ChatSession {
    session_id: SessionId,
    user: Option<UserProfile>,
    chat: Arc<ChatService>,
    tx: UnboundedSender<String>,
    rx: Option<UnboundedReceiver<String>>,
    hb: Instant,
}

impl ChatSession {
    fn new(chat: Arc<ChatService>) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            session_id: SessionId::new(),
            user: None,
            chat,
            tx,
            rx: Some(rx),
            hb: Instant::now(),
        }
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                tracing::warn!("WebSocket heartbeat failed, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for ChatSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!("client connected");
        self.hb(ctx);

        // Bridge the session channel into the socket. The registry and the
        // relay only ever see the channel, never the actor.
        if let Some(mut rx) = self.rx.take() {
            let addr = ctx.address();
            actix::spawn(async move {
                while let Some(payload) = rx.recv().await {
                    addr.do_send(OutboundText(payload));
                }
            });
        }
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("client disconnected");
        if self.user.is_some() {
            let chat = self.chat.clone();
            let session_id = self.session_id;
            actix::spawn(async move {
                chat.disconnect(session_id).await;
            });
        }
    }
}

impl Handler<OutboundText> for ChatSession {
    type Result = ();

    fn handle(&mut self, msg: OutboundText, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

impl Handler<ApplyCommand> for ChatSession {
    type Result = ();

    fn handle(&mut self, msg: ApplyCommand, ctx: &mut Self::Context) {
        match msg.0 {
            SessionCommand::Bind(profile) => {
                self.user = Some(profile);
            }
            SessionCommand::Close => {
                ctx.close(None);
                ctx.stop();
            }
        }
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ChatSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                let chat = self.chat.clone();
                let session_id = self.session_id;
                let user = self.user.clone();
                let tx = self.tx.clone();
                let addr = ctx.address();
                actix::spawn(async move {
                    if let Some(cmd) = chat
                        .handle_frame(session_id, user.as_ref(), &tx, &text)
                        .await
                    {
                        addr.do_send(ApplyCommand(cmd));
                    }
                });
            }
            Ok(ws::Message::Binary(_)) => {
                tracing::warn!("binary WebSocket messages not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                tracing::info!("WebSocket close message received: {:?}", reason);
                ctx.stop();
            }
            _ => {}
        }
    }
}

#[get("/ws")]
pub async fn ws_handler(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    ws::start(ChatSession::new(state.chat.clone()), &req, stream)
}
