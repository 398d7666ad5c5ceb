use chrono::{DateTime, Utc};
use lexis::presenter::{
    composer_placeholder, connection_label, message_footer, model_indicators,
};
use lexis::{present, ConnectivityState, ConversationSnapshot, Message, Sender};

pub fn message(message: &Message, now: DateTime<Utc>) -> String {
    let who = match message.sender() {
        Sender::User => "you",
        Sender::Assistant => "ai",
    };
    let mut out = format!("[{}] {}\n      {}", who, message.text(), message_footer(message, now));

    if let Some(analysis) = message.analysis() {
        for line in present(analysis).lines() {
            out.push_str("\n      ");
            out.push_str(&line);
        }
    }
    out
}

pub fn status(state: &ConnectivityState) -> String {
    let models = model_indicators(&state.models_ready())
        .iter()
        .map(|indicator| indicator.to_string())
        .collect::<Vec<_>>()
        .join("  ");
    format!("{}  |  {}", connection_label(state.connected), models)
}

pub fn prompt(connected: bool, snapshot: &ConversationSnapshot) -> String {
    format!(
        "{} > ",
        composer_placeholder(connected, snapshot.awaiting_response)
    )
}
