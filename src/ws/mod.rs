pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use std::sync::Arc;

use crate::feed::{load_questions, QuestionOrigin};
use crate::protocol::{ServerMessage, PROTOCOL_VERSION};
use crate::session::{Quiz, SessionController};
use crate::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!("WebSocket connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Run one quiz session for the lifetime of the connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Nothing is rendered until the feed resolves or falls back
    let loaded = load_questions(state.feed.as_ref()).await;
    let from_fallback = loaded.origin == QuestionOrigin::Fallback;
    let quiz = Quiz::new(loaded.questions, state.quiz_config.clone());

    let (mut controller, mut timer_rx) = SessionController::new(quiz);
    tracing::info!(
        "Session {} opened ({} questions, fallback={})",
        controller.id(),
        controller.quiz().len(),
        from_fallback
    );

    let welcome = ServerMessage::Welcome {
        protocol: PROTOCOL_VERSION.to_string(),
        session_id: controller.id().clone(),
        question_count: controller.quiz().len(),
        max_score: controller.quiz().max_score(),
        from_fallback,
        server_now: chrono::Utc::now().to_rfc3339(),
    };

    if !send_all(&mut sender, vec![welcome, controller.snapshot()]).await {
        tracing::error!("Failed to send welcome message");
        controller.shutdown();
        return;
    }

    loop {
        tokio::select! {
            // Timer events posted by the controller's own countdown/advance tasks
            event = timer_rx.recv() => {
                let Some(event) = event else { break };
                let messages = controller.handle(event);
                if !send_all(&mut sender, messages).await {
                    break;
                }
            }

            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message: {}", text);
                        let messages = handlers::handle_text(text.as_str(), &mut controller);
                        if !send_all(&mut sender, messages).await {
                            tracing::error!("Failed to send response");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    controller.shutdown();
    tracing::info!("WebSocket connection closed for session {}", controller.id());
}

/// Serialize and send messages in order. Returns false once the socket is gone.
async fn send_all(
    sender: &mut SplitSink<WebSocket, Message>,
    messages: Vec<ServerMessage>,
) -> bool {
    for msg in messages {
        match serde_json::to_string(&msg) {
            Ok(json) => {
                if sender.send(Message::Text(json.into())).await.is_err() {
                    return false;
                }
            }
            Err(e) => tracing::error!("Failed to serialize message: {}", e),
        }
    }
    true
}
