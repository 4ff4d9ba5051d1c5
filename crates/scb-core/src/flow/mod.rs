//! Conversation state machine.
//!
//! One inbound event maps to at most one session mutation. `ChartBot` is the
//! single place where handler errors become user-visible messages: `Fetch`
//! and `Parse` are reported, everything else is logged and swallowed.

pub mod menus;
pub mod tokens;

use std::sync::Arc;

use crate::chart::resolve_prediction;
use crate::clock::Clock;
use crate::domain::{ChatId, MessageRef};
use crate::export;
use crate::messaging::{port::MessagingPort, types::InlineKeyboard};
use crate::scrape::ChartClient;
use crate::session::{Session, SessionStore};
use crate::{Error, Result};

use tokens::Callback;

/// Valid prompt input: a string of digits representing an integer in [0, 99].
pub fn parse_checked_number(text: &str) -> Option<String> {
    let t = text.trim();
    if t.is_empty() || !t.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let n = t.parse::<u32>().ok()?;
    (n <= 99).then(|| t.to_string())
}

pub struct ChartBot {
    messenger: Arc<dyn MessagingPort>,
    sessions: Arc<dyn SessionStore>,
    client: Arc<ChartClient>,
    clock: Arc<dyn Clock>,
}

impl ChartBot {
    pub fn new(
        messenger: Arc<dyn MessagingPort>,
        sessions: Arc<dyn SessionStore>,
        client: Arc<ChartClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            messenger,
            sessions,
            client,
            clock,
        }
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Render the start menu and reset the chat's session around it.
    pub async fn send_start(&self, chat_id: ChatId, first_name: &str) -> Result<()> {
        let text = menus::start_text(first_name, self.clock.now());
        let anchor = self
            .messenger
            .send_keyboard(chat_id, &text, menus::start_keyboard())
            .await?;

        self.sessions
            .put(
                chat_id,
                Session {
                    anchor: Some(anchor),
                    ..Session::default()
                },
            )
            .await;
        Ok(())
    }

    /// Top-level callback boundary: parse, dispatch, decide messaging per
    /// error kind. Unrecognized tokens are silently ignored.
    pub async fn process_callback(
        &self,
        chat_id: ChatId,
        origin: Option<MessageRef>,
        first_name: &str,
        data: &str,
    ) {
        let Some(callback) = Callback::parse(data) else {
            tracing::debug!(data, "ignoring unrecognized callback");
            return;
        };

        if let Err(err) = self.dispatch(chat_id, origin, first_name, callback).await {
            match &err {
                Error::Fetch(detail) => {
                    let _ = self
                        .messenger
                        .send_html(chat_id, &format!("Error: {detail}"))
                        .await;
                }
                Error::Parse(message) => {
                    let _ = self.messenger.send_html(chat_id, message).await;
                }
                _ => {}
            }
            tracing::error!(data, error = %err, "callback handler failed");
        }
    }

    async fn dispatch(
        &self,
        chat_id: ChatId,
        origin: Option<MessageRef>,
        first_name: &str,
        callback: Callback,
    ) -> Result<()> {
        match callback {
            Callback::Chart | Callback::BackToYearSelection => {
                let now = self.clock.now();
                self.edit_anchor(chat_id, &menus::year_menu_text(now), menus::year_menu_keyboard(now))
                    .await
            }
            Callback::Predict => {
                self.edit_anchor(
                    chat_id,
                    &menus::predict_menu_text(self.clock.now()),
                    menus::predict_menu_keyboard(),
                )
                .await
            }
            Callback::CheckMyNumber => self.prompt_for_number(chat_id).await,
            Callback::Close => {
                if let Some(msg) = origin {
                    self.messenger.delete_message(msg).await?;
                }
                Ok(())
            }
            Callback::BackToStart => {
                if let Some(msg) = origin {
                    self.messenger.delete_message(msg).await?;
                }
                self.send_start(chat_id, first_name).await
            }
            Callback::Year(year) => {
                self.edit_anchor(
                    chat_id,
                    &menus::month_menu_text(year),
                    menus::month_menu_keyboard(year),
                )
                .await
            }
            Callback::Month { month, year } => self.send_month_chart(chat_id, month, year).await,
            Callback::PredictGame(game) => self.send_prediction(chat_id, origin, game).await,
            Callback::ShowLatestNumber => self.show_interval_menu(chat_id, origin).await,
            Callback::Months(months) => {
                let highlight = match self.sessions.get(chat_id).await {
                    Some(session) => session.latest_result_number,
                    None => None,
                };
                self.send_months_workbook(chat_id, months, highlight).await
            }
            Callback::NumberMonths(months) => {
                let Some(number) = self
                    .sessions
                    .get(chat_id)
                    .await
                    .and_then(|s| s.entered_number)
                else {
                    tracing::debug!(chat = chat_id.0, "no entered number for interval export");
                    return Ok(());
                };
                self.send_months_workbook(chat_id, months, Some(number)).await
            }
        }
    }

    /// One-shot free-text handler for the number prompt. The pending flag is
    /// cleared before validation so the prompt never consumes a second
    /// message.
    pub async fn handle_number_input(
        &self,
        chat_id: ChatId,
        first_name: &str,
        text: &str,
    ) -> Result<()> {
        let mut session = self.sessions.get(chat_id).await.unwrap_or_default();
        session.awaiting_number = false;

        match parse_checked_number(text) {
            Some(number) => {
                session.entered_number = Some(number);
                self.sessions.put(chat_id, session).await;

                self.messenger
                    .send_keyboard(
                        chat_id,
                        menus::RANGE_PROMPT_NUMBER,
                        menus::interval_keyboard("number_months", false),
                    )
                    .await?;
                Ok(())
            }
            None => {
                self.sessions.put(chat_id, session).await;
                self.messenger
                    .send_html(chat_id, menus::SKIP_NOTICE)
                    .await?;
                self.send_start(chat_id, first_name).await
            }
        }
    }

    async fn prompt_for_number(&self, chat_id: ChatId) -> Result<()> {
        self.edit_anchor(chat_id, menus::NUMBER_PROMPT, menus::number_prompt_keyboard())
            .await?;

        let mut session = self.sessions.get(chat_id).await.unwrap_or_default();
        session.awaiting_number = true;
        self.sessions.put(chat_id, session).await;
        Ok(())
    }

    async fn send_month_chart(
        &self,
        chat_id: ChatId,
        month: crate::chart::Month,
        year: i32,
    ) -> Result<()> {
        let chart = self.client.month_chart(month, year).await?;

        // Per-request temp dir; the CSV lives exactly as long as this call.
        let dir = tempfile::tempdir()?;
        let file_name = format!("Satta_King_Chart_{}_{year}.csv", month.label());
        let path = dir.path().join(&file_name);
        export::csv::write_month_csv(&chart, &path)?;

        let aligned = export::csv::render_aligned(&chart);
        self.edit_anchor(
            chat_id,
            &menus::chart_result_text(month, year, &aligned),
            menus::chart_result_keyboard(),
        )
        .await?;

        self.messenger
            .send_document(chat_id, &path, &file_name)
            .await?;
        Ok(())
    }

    async fn send_prediction(
        &self,
        chat_id: ChatId,
        origin: Option<MessageRef>,
        game: crate::games::Game,
    ) -> Result<()> {
        let snapshot = self.client.live_snapshot(game).await?;
        let prediction = resolve_prediction(game, snapshot)?;

        let mut session = self.sessions.get(chat_id).await.unwrap_or_default();
        session.latest_result_number = Some(prediction.number.clone());
        self.sessions.put(chat_id, session.clone()).await;

        let text = menus::prediction_text(&prediction, self.clock.now());
        let keyboard = menus::prediction_keyboard(&prediction.number);

        match origin.or(session.anchor) {
            Some(msg) => self.messenger.edit_keyboard(msg, &text, keyboard).await,
            None => self
                .messenger
                .send_keyboard(chat_id, &text, keyboard)
                .await
                .map(|_| ()),
        }
    }

    async fn show_interval_menu(
        &self,
        chat_id: ChatId,
        origin: Option<MessageRef>,
    ) -> Result<()> {
        let has_latest = self
            .sessions
            .get(chat_id)
            .await
            .map(|s| s.latest_result_number.is_some())
            .unwrap_or(false);
        if !has_latest {
            tracing::debug!(chat = chat_id.0, "no remembered result number");
            return Ok(());
        }

        let keyboard = menus::interval_keyboard("months", true);
        match origin {
            Some(msg) => {
                self.messenger
                    .edit_keyboard(msg, menus::RANGE_PROMPT_LATEST, keyboard)
                    .await
            }
            None => self
                .messenger
                .send_keyboard(chat_id, menus::RANGE_PROMPT_LATEST, keyboard)
                .await
                .map(|_| ()),
        }
    }

    async fn send_months_workbook(
        &self,
        chat_id: ChatId,
        months: u32,
        highlight: Option<String>,
    ) -> Result<()> {
        let notice = self
            .messenger
            .send_html(chat_id, menus::PREPARING_FILE)
            .await?;

        let dir = tempfile::tempdir()?;
        let file_name = format!("satta_king_last_{months}_months.xlsx");
        let path = dir.path().join(&file_name);

        let built = export::workbook::write_months_workbook(
            self.client.as_ref(),
            self.clock.as_ref(),
            months,
            highlight.as_deref(),
            &path,
        )
        .await;

        let _ = self.messenger.delete_message(notice).await;
        built?;

        self.messenger
            .send_document(chat_id, &path, &file_name)
            .await?;
        Ok(())
    }

    async fn edit_anchor(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: InlineKeyboard,
    ) -> Result<()> {
        let anchor = self.sessions.get(chat_id).await.and_then(|s| s.anchor);
        let Some(anchor) = anchor else {
            tracing::debug!(chat = chat_id.0, "no session anchor for menu edit");
            return Ok(());
        };
        self.messenger.edit_keyboard(anchor, text, keyboard).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageId;
    use crate::session::MemorySessionStore;
    use async_trait::async_trait;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use std::path::Path;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Mutex;

    #[derive(Clone, Debug, PartialEq)]
    enum Sent {
        Html { text: String },
        Keyboard { text: String, data: Vec<String> },
        Edited { msg: MessageRef, text: String, data: Vec<String> },
        Deleted(MessageRef),
        Document { file_name: String },
    }

    #[derive(Default)]
    struct RecordingMessenger {
        sent: Mutex<Vec<Sent>>,
        next_id: AtomicI32,
    }

    impl RecordingMessenger {
        fn events(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        fn push(&self, event: Sent) {
            self.sent.lock().unwrap().push(event);
        }

        fn next_ref(&self, chat_id: ChatId) -> MessageRef {
            MessageRef {
                chat_id,
                message_id: MessageId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            }
        }
    }

    fn keyboard_data(keyboard: &InlineKeyboard) -> Vec<String> {
        keyboard
            .rows
            .iter()
            .flatten()
            .map(|b| b.callback_data.clone())
            .collect()
    }

    #[async_trait]
    impl MessagingPort for RecordingMessenger {
        async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
            self.push(Sent::Html {
                text: html.to_string(),
            });
            Ok(self.next_ref(chat_id))
        }

        async fn send_keyboard(
            &self,
            chat_id: ChatId,
            html: &str,
            keyboard: InlineKeyboard,
        ) -> Result<MessageRef> {
            self.push(Sent::Keyboard {
                text: html.to_string(),
                data: keyboard_data(&keyboard),
            });
            Ok(self.next_ref(chat_id))
        }

        async fn edit_keyboard(
            &self,
            msg: MessageRef,
            html: &str,
            keyboard: InlineKeyboard,
        ) -> Result<()> {
            self.push(Sent::Edited {
                msg,
                text: html.to_string(),
                data: keyboard_data(&keyboard),
            });
            Ok(())
        }

        async fn delete_message(&self, msg: MessageRef) -> Result<()> {
            self.push(Sent::Deleted(msg));
            Ok(())
        }

        async fn send_document(
            &self,
            chat_id: ChatId,
            _path: &Path,
            file_name: &str,
        ) -> Result<MessageRef> {
            self.push(Sent::Document {
                file_name: file_name.to_string(),
            });
            Ok(self.next_ref(chat_id))
        }

        async fn answer_callback(&self, _callback_id: &str, _text: Option<&str>) -> Result<()> {
            Ok(())
        }
    }

    struct FixedClock(DateTime<FixedOffset>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<FixedOffset> {
            self.0
        }
    }

    struct Harness {
        bot: ChartBot,
        messenger: Arc<RecordingMessenger>,
        sessions: Arc<MemorySessionStore>,
    }

    fn harness() -> Harness {
        let messenger = Arc::new(RecordingMessenger::default());
        let sessions = Arc::new(MemorySessionStore::default());
        let clock = FixedClock(
            crate::clock::ist_offset()
                .with_ymd_and_hms(2024, 3, 5, 21, 45, 0)
                .unwrap(),
        );
        // Unroutable address; tests below never hit the network.
        let client = Arc::new(ChartClient::new("http://127.0.0.1:9"));

        let bot = ChartBot::new(
            messenger.clone(),
            sessions.clone(),
            client,
            Arc::new(clock),
        );
        Harness {
            bot,
            messenger,
            sessions,
        }
    }

    const CHAT: ChatId = ChatId(99);

    async fn anchored_session(h: &Harness) -> MessageRef {
        let anchor = MessageRef {
            chat_id: CHAT,
            message_id: MessageId(1),
        };
        let session = Session {
            anchor: Some(anchor),
            ..Session::default()
        };
        h.sessions.put(CHAT, session).await;
        anchor
    }

    #[tokio::test]
    async fn start_stores_anchor_session() {
        let h = harness();
        h.bot.send_start(CHAT, "Asha").await.unwrap();

        let session = h.sessions.get(CHAT).await.unwrap();
        assert!(session.anchor.is_some());
        assert!(!session.awaiting_number);

        match &h.messenger.events()[0] {
            Sent::Keyboard { text, data } => {
                assert!(text.contains("Hello <b>Asha</b>"));
                assert_eq!(data, &["chart", "predict", "checkmynumber", "close"]);
            }
            other => panic!("expected start keyboard, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn valid_number_is_stored_and_interval_menu_shown() {
        let h = harness();
        h.sessions
            .put(
                CHAT,
                Session {
                    awaiting_number: true,
                    ..Session::default()
                },
            )
            .await;

        h.bot.handle_number_input(CHAT, "Asha", "47").await.unwrap();

        let session = h.sessions.get(CHAT).await.unwrap();
        assert_eq!(session.entered_number.as_deref(), Some("47"));
        assert!(!session.awaiting_number);

        match &h.messenger.events()[0] {
            Sent::Keyboard { text, data } => {
                assert_eq!(text, menus::RANGE_PROMPT_NUMBER);
                assert_eq!(data[0], "number_months_6");
                assert_eq!(data[19], "number_months_120");
            }
            other => panic!("expected interval keyboard, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_number_skips_back_to_start() {
        let h = harness();
        for bad in ["abc", "100", "", "-5", "4 7"] {
            h.sessions
                .put(
                    CHAT,
                    Session {
                        awaiting_number: true,
                        ..Session::default()
                    },
                )
                .await;

            h.bot.handle_number_input(CHAT, "Asha", bad).await.unwrap();

            let session = h.sessions.get(CHAT).await.unwrap();
            assert!(!session.awaiting_number, "input {bad:?} left prompt armed");
            assert_eq!(session.entered_number, None, "input {bad:?} was stored");
        }

        let events = h.messenger.events();
        assert!(matches!(&events[0], Sent::Html { text } if text == menus::SKIP_NOTICE));
        assert!(matches!(&events[1], Sent::Keyboard { .. })); // start menu again
    }

    #[tokio::test]
    async fn boundary_numbers_are_accepted() {
        assert_eq!(parse_checked_number("0").as_deref(), Some("0"));
        assert_eq!(parse_checked_number("00").as_deref(), Some("00"));
        assert_eq!(parse_checked_number("99").as_deref(), Some("99"));
        assert_eq!(parse_checked_number("100"), None);
        assert_eq!(parse_checked_number("-1"), None);
        assert_eq!(parse_checked_number(""), None);
    }

    #[tokio::test]
    async fn unrecognized_callback_is_silently_ignored() {
        let h = harness();
        h.bot
            .process_callback(CHAT, None, "Asha", "months_7")
            .await;
        h.bot.process_callback(CHAT, None, "Asha", "bogus").await;
        assert!(h.messenger.events().is_empty());
    }

    #[tokio::test]
    async fn chart_callback_renders_year_menu_on_anchor() {
        let h = harness();
        let anchor = anchored_session(&h).await;

        h.bot.process_callback(CHAT, None, "Asha", "chart").await;

        match &h.messenger.events()[0] {
            Sent::Edited { msg, data, .. } => {
                assert_eq!(*msg, anchor);
                assert_eq!(data[0], "year_2015");
                assert!(data.contains(&"year_2024".to_string()));
            }
            other => panic!("expected year menu edit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn year_callback_renders_month_menu() {
        let h = harness();
        anchored_session(&h).await;

        h.bot.process_callback(CHAT, None, "Asha", "year_2021").await;

        match &h.messenger.events()[0] {
            Sent::Edited { text, data, .. } => {
                assert_eq!(text, &menus::month_menu_text(2021));
                assert_eq!(data[0], "month_january_2021");
            }
            other => panic!("expected month menu edit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn close_deletes_the_pressed_message() {
        let h = harness();
        let origin = MessageRef {
            chat_id: CHAT,
            message_id: MessageId(5),
        };

        h.bot
            .process_callback(CHAT, Some(origin), "Asha", "close")
            .await;

        assert_eq!(h.messenger.events(), vec![Sent::Deleted(origin)]);
    }

    #[tokio::test]
    async fn back_to_start_deletes_and_rerenders() {
        let h = harness();
        let origin = MessageRef {
            chat_id: CHAT,
            message_id: MessageId(5),
        };

        h.bot
            .process_callback(CHAT, Some(origin), "Asha", "back_to_start")
            .await;

        let events = h.messenger.events();
        assert_eq!(events[0], Sent::Deleted(origin));
        assert!(matches!(&events[1], Sent::Keyboard { .. }));
        assert!(h.sessions.get(CHAT).await.unwrap().anchor.is_some());
    }

    #[tokio::test]
    async fn interval_menu_requires_a_remembered_number() {
        let h = harness();
        anchored_session(&h).await;

        h.bot
            .process_callback(CHAT, None, "Asha", "show_latest_number")
            .await;
        assert!(h.messenger.events().is_empty());

        let mut session = h.sessions.get(CHAT).await.unwrap();
        session.latest_result_number = Some("47".to_string());
        h.sessions.put(CHAT, session).await;

        h.bot
            .process_callback(CHAT, None, "Asha", "show_latest_number")
            .await;

        match &h.messenger.events()[0] {
            Sent::Keyboard { text, data } => {
                assert_eq!(text, menus::RANGE_PROMPT_LATEST);
                assert_eq!(data[0], "months_6");
            }
            other => panic!("expected interval keyboard, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn number_interval_without_entered_number_is_ignored() {
        let h = harness();
        anchored_session(&h).await;

        h.bot
            .process_callback(CHAT, None, "Asha", "number_months_12")
            .await;
        assert!(h.messenger.events().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_reports_error_to_user() {
        let h = harness();
        anchored_session(&h).await;

        // The harness client points at an unroutable address, so the month
        // fetch fails and the boundary must surface it as "Error: ...".
        h.bot
            .process_callback(CHAT, None, "Asha", "month_march_2021")
            .await;

        let events = h.messenger.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            Sent::Html { text } => assert!(text.starts_with("Error: ")),
            other => panic!("expected error message, got {other:?}"),
        }
    }
}
