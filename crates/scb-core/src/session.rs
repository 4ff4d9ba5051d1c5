use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatId, MessageRef};

/// Per-chat conversational state.
///
/// Created on the first interaction and mutated once per menu transition.
/// Sessions are never expired; the map grows for the process lifetime, which
/// is accepted for single-user-per-chat usage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    /// The menu message edited in place as the user navigates.
    pub anchor: Option<MessageRef>,
    /// Number typed at the "check my number" prompt.
    pub entered_number: Option<String>,
    /// Latest scraped result number, remembered for chart highlighting.
    pub latest_result_number: Option<String>,
    /// The next plain-text message is consumed by the number prompt.
    pub awaiting_number: bool,
}

/// Explicit session store injected into the flow, so handlers never touch a
/// shared global and tests can observe transitions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, chat_id: ChatId) -> Option<Session>;
    async fn put(&self, chat_id: ChatId, session: Session);
    async fn delete(&self, chat_id: ChatId);
}

#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<HashMap<i64, Session>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, chat_id: ChatId) -> Option<Session> {
        self.inner.lock().await.get(&chat_id.0).cloned()
    }

    async fn put(&self, chat_id: ChatId, session: Session) {
        self.inner.lock().await.insert(chat_id.0, session);
    }

    async fn delete(&self, chat_id: ChatId) {
        self.inner.lock().await.remove(&chat_id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageId;

    #[tokio::test]
    async fn put_overwrites_and_delete_removes() {
        let store = MemorySessionStore::default();
        let chat = ChatId(7);

        assert_eq!(store.get(chat).await, None);

        let first = Session {
            anchor: Some(MessageRef {
                chat_id: chat,
                message_id: MessageId(1),
            }),
            ..Session::default()
        };
        store.put(chat, first.clone()).await;
        assert_eq!(store.get(chat).await, Some(first));

        let second = Session {
            entered_number: Some("42".to_string()),
            ..Session::default()
        };
        store.put(chat, second.clone()).await;
        assert_eq!(store.get(chat).await, Some(second));

        store.delete(chat).await;
        assert_eq!(store.get(chat).await, None);
    }

    #[tokio::test]
    async fn chats_are_independent() {
        let store = MemorySessionStore::default();
        store
            .put(
                ChatId(1),
                Session {
                    awaiting_number: true,
                    ..Session::default()
                },
            )
            .await;

        assert_eq!(store.get(ChatId(2)).await, None);
        assert!(store.get(ChatId(1)).await.unwrap().awaiting_number);
    }
}
