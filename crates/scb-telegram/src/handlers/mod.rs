//! Telegram update handlers.
//!
//! Each inbound update is routed here from the webhook endpoint. Handling is
//! serialized per chat through `ChatLocks`, so two button presses in the same
//! chat never interleave their session read-modify-write.

use std::sync::Arc;

use teloxide::types::{CallbackQuery, Message, Update, UpdateKind};

use scb_core::domain::{ChatId, MessageId, MessageRef};

use crate::router::AppState;

pub async fn handle_update(state: Arc<AppState>, update: Update) {
    match update.kind {
        UpdateKind::Message(msg) => handle_message(state, msg).await,
        UpdateKind::CallbackQuery(q) => handle_callback(state, q).await,
        _ => {}
    }
}

/// `/start` opens the menu; any other text is only meaningful while the
/// session is waiting for the number prompt's one-shot reply.
async fn handle_message(state: Arc<AppState>, msg: Message) {
    let Some(user) = msg.from() else {
        return;
    };
    let Some(text) = msg.text().map(|s| s.to_string()) else {
        return;
    };

    let chat_id = ChatId(msg.chat.id.0);
    let first_name = user.first_name.clone();

    let _guard = state.chat_locks.lock_chat(chat_id.0).await;

    if is_start_command(&text) {
        if let Err(err) = state.flow.send_start(chat_id, &first_name).await {
            tracing::error!(chat = chat_id.0, error = %err, "start handler failed");
        }
        return;
    }

    let awaiting = state
        .flow
        .sessions()
        .get(chat_id)
        .await
        .map(|s| s.awaiting_number)
        .unwrap_or(false);
    if awaiting {
        if let Err(err) = state
            .flow
            .handle_number_input(chat_id, &first_name, &text)
            .await
        {
            tracing::error!(chat = chat_id.0, error = %err, "number input handler failed");
        }
    }
}

async fn handle_callback(state: Arc<AppState>, q: CallbackQuery) {
    // Ack the button press first; Telegram keeps the spinner until then.
    if let Err(err) = state.messenger.answer_callback(&q.id, None).await {
        tracing::warn!(error = %err, "failed to answer callback query");
    }

    let Some(message) = q.message.as_ref() else {
        return;
    };
    let data = q.data.unwrap_or_default();
    if data.is_empty() {
        return;
    }

    let chat_id = ChatId(message.chat.id.0);
    let origin = MessageRef {
        chat_id,
        message_id: MessageId(message.id.0),
    };

    let _guard = state.chat_locks.lock_chat(chat_id.0).await;
    state
        .flow
        .process_callback(chat_id, Some(origin), &q.from.first_name, &data)
        .await;
}

/// Telegram may send `/start@botname`.
fn is_start_command(text: &str) -> bool {
    let first = text.trim().split_whitespace().next().unwrap_or("");
    let Some(cmd) = first.strip_prefix('/') else {
        return false;
    };
    cmd.split('@').next().unwrap_or("").eq_ignore_ascii_case("start")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_command_variants() {
        assert!(is_start_command("/start"));
        assert!(is_start_command("/start@satta_chart_bot"));
        assert!(is_start_command("  /start extra args"));
        assert!(!is_start_command("start"));
        assert!(!is_start_command("/stop"));
        assert!(!is_start_command("47"));
    }
}
