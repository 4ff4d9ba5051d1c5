use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use teloxide::{prelude::*, types::Update};
use tokio::sync::{Mutex, OwnedMutexGuard};

use scb_core::{
    clock::{Clock, IstClock},
    config::Config,
    flow::ChartBot,
    messaging::port::MessagingPort,
    scrape::ChartClient,
    session::{MemorySessionStore, SessionStore},
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<ChartBot>,
    pub messenger: Arc<dyn MessagingPort>,
    pub chat_locks: Arc<ChatLocks>,
}

/// One async mutex per chat id, so updates for the same chat are handled in
/// order while different chats proceed concurrently.
#[derive(Default)]
pub struct ChatLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl ChatLocks {
    pub async fn lock_chat(&self, chat_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(chat_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

pub fn build_state(cfg: &Config) -> Arc<AppState> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());
    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot));
    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::default());
    let client = Arc::new(ChartClient::new(cfg.chart_base_url.clone()));
    let clock: Arc<dyn Clock> = Arc::new(IstClock);

    let flow = Arc::new(ChartBot::new(
        messenger.clone(),
        sessions,
        client,
        clock,
    ));

    Arc::new(AppState {
        flow,
        messenger,
        chat_locks: Arc::new(ChatLocks::default()),
    })
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/webhook", post(webhook))
        .with_state(state)
}

pub async fn run_webhook(cfg: Arc<Config>) -> anyhow::Result<()> {
    let state = build_state(&cfg);
    let listener = tokio::net::TcpListener::bind(cfg.bind_addr).await?;
    tracing::info!(addr = %cfg.bind_addr, "webhook server listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Always `200 {"status":"ok"}`: processing happens on a detached task and
/// its failures are logged, never reported back to Telegram (a non-2xx would
/// make Telegram redeliver the update).
async fn webhook(
    State(state): State<Arc<AppState>>,
    Json(update): Json<Update>,
) -> Json<serde_json::Value> {
    tokio::spawn(handlers::handle_update(state, update));
    Json(serde_json::json!({"status": "ok"}))
}

async fn liveness() -> &'static str {
    "Bot is Live"
}
