use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::{SessionController, SessionEvent};

/// Decode one client frame and apply it to the session
pub fn handle_text(text: &str, controller: &mut SessionController) -> Vec<ServerMessage> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => handle_message(msg, controller),
        Err(e) => {
            tracing::error!("Failed to parse client message: {}", e);
            vec![ServerMessage::error(
                "PARSE_ERROR",
                format!("Invalid message format: {}", e),
            )]
        }
    }
}

pub fn handle_message(msg: ClientMessage, controller: &mut SessionController) -> Vec<ServerMessage> {
    controller.handle(SessionEvent::from(msg))
}
