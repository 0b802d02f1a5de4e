//! The conversation session controller.
//!
//! `Session` owns the message store, the turn state machine, the disclosure
//! side-table and the composer draft. Every mutation goes through the
//! operations here; renderers only read.

use std::time::Instant;

use crate::client::{AssistantClient, ClientError};
use crate::logging;
use crate::models::AssistantReply;

use super::disclosure::DisclosureState;
use super::store::{Message, MessageId, MessageStore};
use super::turn::{TurnId, TurnResolution, TurnState, TurnTicket};

/// Seeded assistant entry of every new session.
pub const GREETING: &str = "안녕하세요! AccessNine AI 영업 사원입니다. \n현장에 필요한 자재가 있으신가요?";

/// Committed in place of a reply whenever the assistant call fails.
pub const FALLBACK_MESSAGE: &str = "죄송합니다. 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";

#[derive(Debug, Clone)]
pub struct Session {
    store: MessageStore,
    turn: TurnState,
    disclosure: DisclosureState,
    draft: String,
    next_turn: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session holding only the greeting.
    #[must_use]
    pub fn new() -> Self {
        let mut store = MessageStore::new();
        store.append(Message::assistant_text(GREETING));
        Self {
            store,
            turn: TurnState::Idle,
            disclosure: DisclosureState::new(),
            draft: String::new(),
            next_turn: 1,
        }
    }

    // === Read access ===

    #[must_use]
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    #[must_use]
    pub fn entries(&self) -> &[Message] {
        self.store.entries()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.turn.is_pending()
    }

    #[must_use]
    pub fn pending_turn(&self) -> Option<TurnId> {
        self.turn.pending_turn()
    }

    #[must_use]
    pub fn pending_since(&self) -> Option<Instant> {
        self.turn.started_at()
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Whether the submit affordance is enabled for the current draft.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_pending() && !self.draft.trim().is_empty()
    }

    #[must_use]
    pub fn is_disclosure_open(&self, id: MessageId) -> bool {
        self.disclosure.is_open(id)
    }

    // === Draft ===

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    // === Request lifecycle ===

    /// Admit a submission.
    ///
    /// Returns `None` with no state change when `text` is blank or a turn
    /// is already pending. Otherwise appends the user entry verbatim,
    /// clears the draft and marks the turn pending.
    pub fn begin_turn(&mut self, text: &str) -> Option<TurnTicket> {
        if text.trim().is_empty() {
            logging::debug("Ignoring blank submission");
            return None;
        }
        if self.turn.is_pending() {
            logging::debug("Dropping submission while a turn is pending");
            return None;
        }

        self.store.append(Message::user(text));
        self.draft.clear();

        let turn_id = TurnId::new(self.next_turn);
        self.next_turn += 1;
        self.turn = TurnState::Pending {
            turn_id,
            started_at: Instant::now(),
        };
        logging::info(format!(
            "{turn_id} started ({} chars)",
            text.chars().count()
        ));

        Some(TurnTicket {
            turn_id,
            content: text.to_string(),
        })
    }

    /// Commit the outcome of the pending turn.
    ///
    /// A result for any other turn id is discarded. Otherwise exactly one
    /// assistant entry is appended (the reply, or the fallback on failure)
    /// and the session returns to idle.
    pub fn finish_turn(
        &mut self,
        turn_id: TurnId,
        result: Result<AssistantReply, ClientError>,
    ) -> TurnResolution {
        if self.turn.pending_turn() != Some(turn_id) {
            logging::warn(format!("Discarding late result for {turn_id}"));
            return TurnResolution::Stale;
        }

        let resolution = match result {
            Ok(reply) => {
                logging::info(format!(
                    "{turn_id} answered ({} tags, thought: {})",
                    reply.related_tags.len(),
                    reply.thought.is_some()
                ));
                self.store.append(Message::assistant(reply));
                TurnResolution::Answered
            }
            Err(err) => {
                logging::warn(format!("{turn_id} failed [{}]: {err}", err.kind()));
                self.store.append(Message::assistant_text(FALLBACK_MESSAGE));
                TurnResolution::Fallback
            }
        };
        self.turn = TurnState::Idle;
        resolution
    }

    /// Run one complete turn against `client`.
    ///
    /// Returns `None` when the submission was not admitted.
    pub async fn submit(
        &mut self,
        text: &str,
        client: &dyn AssistantClient,
    ) -> Option<TurnResolution> {
        let ticket = self.begin_turn(text)?;
        let result = client.send_message(&ticket.content).await;
        Some(self.finish_turn(ticket.turn_id, result))
    }

    // === Suggestions ===

    /// Text of the `index`-th related tag on assistant message `id`.
    #[must_use]
    pub fn tag_text(&self, id: MessageId, index: usize) -> Option<&str> {
        self.store
            .get(id)
            .filter(|message| message.is_assistant())
            .and_then(|message| message.related_tags().get(index))
            .map(String::as_str)
    }

    /// Admit a tag activation exactly as if its text had been typed.
    pub fn begin_tag_turn(&mut self, id: MessageId, index: usize) -> Option<TurnTicket> {
        let text = self.tag_text(id, index)?.to_string();
        self.begin_turn(&text)
    }

    pub async fn submit_tag(
        &mut self,
        id: MessageId,
        index: usize,
        client: &dyn AssistantClient,
    ) -> Option<TurnResolution> {
        let text = self.tag_text(id, index)?.to_string();
        self.submit(&text, client).await
    }

    // === Disclosure ===

    /// Flip the reasoning-trace flag of an assistant message.
    ///
    /// No-op returning `false` when the message has no trace.
    pub fn toggle_disclosure(&mut self, id: MessageId) -> bool {
        let has_thought = self
            .store
            .get(id)
            .is_some_and(|message| message.thought().is_some());
        if !has_thought {
            return false;
        }
        self.disclosure.toggle(id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::Role;
    use crate::test_support::ScriptedClient;
    use pretty_assertions::assert_eq;

    fn reply(answer: &str, thought: Option<&str>, tags: &[&str]) -> AssistantReply {
        AssistantReply {
            answer: answer.to_string(),
            thought: thought.map(str::to_string),
            related_tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
        }
    }

    fn transcript(session: &Session) -> Vec<(Role, String)> {
        session
            .entries()
            .iter()
            .map(|message| (message.role(), message.content().to_string()))
            .collect()
    }

    #[test]
    fn fresh_session_holds_only_greeting() {
        let session = Session::new();
        assert_eq!(session.entries().len(), 1);
        let greeting = &session.entries()[0];
        assert_eq!(greeting.role(), Role::Assistant);
        assert_eq!(greeting.content(), GREETING);
        assert_eq!(greeting.thought(), None);
        assert!(greeting.related_tags().is_empty());
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn successful_turn_appends_user_then_reply() {
        let client = ScriptedClient::new(vec![Ok(AssistantReply::answer_only("hi there"))]);
        let mut session = Session::new();

        let resolution = session.submit("hello", &client).await;

        assert_eq!(resolution, Some(TurnResolution::Answered));
        assert_eq!(
            transcript(&session),
            vec![
                (Role::Assistant, GREETING.to_string()),
                (Role::User, "hello".to_string()),
                (Role::Assistant, "hi there".to_string()),
            ]
        );
        assert!(!session.is_pending());
        assert_eq!(client.sent(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn failed_turn_appends_fallback() {
        let client = ScriptedClient::new(vec![Err(ClientError::Network(
            "connection refused".to_string(),
        ))]);
        let mut session = Session::new();

        let resolution = session.submit("hello", &client).await;

        assert_eq!(resolution, Some(TurnResolution::Fallback));
        assert_eq!(
            transcript(&session),
            vec![
                (Role::Assistant, GREETING.to_string()),
                (Role::User, "hello".to_string()),
                (Role::Assistant, FALLBACK_MESSAGE.to_string()),
            ]
        );
        let fallback = &session.entries()[2];
        assert_eq!(fallback.thought(), None);
        assert!(fallback.related_tags().is_empty());
        assert!(!session.is_pending());
    }

    #[test]
    fn every_failure_kind_maps_to_the_same_fallback() {
        let failures = vec![
            ClientError::Network("refused".to_string()),
            ClientError::Timeout(std::time::Duration::from_secs(1)),
            ClientError::Status {
                status: 500,
                body: String::new(),
            },
            ClientError::Malformed("missing field `answer`".to_string()),
        ];
        for failure in failures {
            let mut session = Session::new();
            let ticket = session.begin_turn("q").expect("admitted");
            session.finish_turn(ticket.turn_id, Err(failure));
            assert_eq!(session.entries()[2].content(), FALLBACK_MESSAGE);
            assert!(!session.is_pending());
        }
    }

    #[test]
    fn blank_submissions_change_nothing() {
        let mut session = Session::new();
        session.set_draft("   ");
        assert!(session.begin_turn("").is_none());
        assert!(session.begin_turn("   ").is_none());
        assert!(session.begin_turn("\n\t").is_none());
        assert_eq!(session.entries().len(), 1);
        assert!(!session.is_pending());
        assert_eq!(session.draft(), "   ");
    }

    #[test]
    fn submission_while_pending_is_dropped_not_queued() {
        let mut session = Session::new();
        let first = session.begin_turn("a").expect("first admitted");
        assert!(session.begin_turn("b").is_none());
        assert_eq!(session.entries().len(), 2);

        session.finish_turn(first.turn_id, Ok(AssistantReply::answer_only("A")));
        assert_eq!(
            transcript(&session),
            vec![
                (Role::Assistant, GREETING.to_string()),
                (Role::User, "a".to_string()),
                (Role::Assistant, "A".to_string()),
            ]
        );
    }

    #[test]
    fn user_entry_is_visible_while_pending_and_draft_cleared() {
        let mut session = Session::new();
        session.set_draft("  hello  ");
        let ticket = session.begin_turn("  hello  ").expect("admitted");

        assert!(session.is_pending());
        assert_eq!(session.draft(), "");
        assert_eq!(session.entries()[1].content(), "  hello  ");
        assert_eq!(ticket.content, "  hello  ");
        assert!(!session.can_submit());
    }

    #[test]
    fn stale_result_is_discarded() {
        let mut session = Session::new();
        let first = session.begin_turn("a").expect("admitted");
        session.finish_turn(first.turn_id, Ok(AssistantReply::answer_only("A")));
        let second = session.begin_turn("b").expect("admitted");

        let resolution =
            session.finish_turn(first.turn_id, Ok(AssistantReply::answer_only("late")));

        assert_eq!(resolution, TurnResolution::Stale);
        assert_eq!(session.entries().len(), 4);
        assert_eq!(session.pending_turn(), Some(second.turn_id));
    }

    #[test]
    fn reply_fields_are_committed_in_order() {
        let mut session = Session::new();
        let ticket = session.begin_turn("q").expect("admitted");
        session.finish_turn(ticket.turn_id, Ok(reply("X", Some("Y"), &["a", "b"])));

        let message = &session.entries()[2];
        assert_eq!(message.content(), "X");
        assert_eq!(message.thought(), Some("Y"));
        assert_eq!(message.related_tags(), ["a", "b"]);
    }

    #[test]
    fn assistant_count_matches_accepted_submissions() {
        let mut session = Session::new();
        let inputs = ["one", "", "two", "   ", "three"];
        let mut accepted = 0;
        for input in inputs {
            if let Some(ticket) = session.begin_turn(input) {
                accepted += 1;
                session.finish_turn(ticket.turn_id, Ok(AssistantReply::answer_only("ok")));
            }
        }
        let assistant_entries = session
            .entries()
            .iter()
            .filter(|message| message.is_assistant())
            .count();
        assert_eq!(assistant_entries - 1, accepted);
        assert_eq!(accepted, 3);
    }

    #[tokio::test]
    async fn tag_activation_submits_tag_text() {
        let client = ScriptedClient::new(vec![
            Ok(reply("answer", None, &["콘크리트", "흙손"])),
            Ok(AssistantReply::answer_only("about concrete")),
        ]);
        let mut session = Session::new();
        session.submit("자재 추천", &client).await;
        let (tagged, _) = session.store().last_assistant().expect("reply");

        session.set_draft("half typed");
        let resolution = session.submit_tag(tagged, 0, &client).await;

        assert_eq!(resolution, Some(TurnResolution::Answered));
        assert_eq!(session.entries()[3].content(), "콘크리트");
        assert_eq!(session.draft(), "");
        assert_eq!(
            client.sent(),
            vec!["자재 추천".to_string(), "콘크리트".to_string()]
        );
    }

    #[test]
    fn tag_activation_while_pending_is_noop() {
        let mut session = Session::new();
        let ticket = session.begin_turn("q").expect("admitted");
        session.finish_turn(ticket.turn_id, Ok(reply("a", None, &["tag"])));
        let (tagged, _) = session.store().last_assistant().expect("reply");

        session.begin_turn("next").expect("admitted");
        let before = session.entries().len();
        assert!(session.begin_tag_turn(tagged, 0).is_none());
        assert_eq!(session.entries().len(), before);
    }

    #[test]
    fn unknown_tag_index_is_ignored() {
        let mut session = Session::new();
        let greeting = session.store().iter().next().map(|(id, _)| id).unwrap();
        assert!(session.begin_tag_turn(greeting, 0).is_none());
        assert_eq!(session.entries().len(), 1);
    }

    #[test]
    fn disclosure_toggles_only_target_message() {
        let mut session = Session::new();
        for answer in ["A", "B"] {
            let ticket = session.begin_turn("q").expect("admitted");
            session.finish_turn(ticket.turn_id, Ok(reply(answer, Some("why"), &[])));
        }
        let ids: Vec<MessageId> = session
            .store()
            .iter()
            .filter(|(_, message)| message.thought().is_some())
            .map(|(id, _)| id)
            .collect();
        let (a, b) = (ids[0], ids[1]);

        assert!(!session.is_disclosure_open(a));
        assert!(session.toggle_disclosure(a));
        assert!(session.is_disclosure_open(a));
        assert!(!session.is_disclosure_open(b));
        assert!(session.toggle_disclosure(a));
        assert!(!session.is_disclosure_open(a));
        assert!(!session.is_disclosure_open(b));
    }

    #[test]
    fn disclosure_without_thought_is_noop() {
        let mut session = Session::new();
        let greeting = session.store().iter().next().map(|(id, _)| id).unwrap();
        assert!(!session.toggle_disclosure(greeting));
        assert!(!session.is_disclosure_open(greeting));
    }

    #[test]
    fn can_submit_tracks_draft_and_pending() {
        let mut session = Session::new();
        assert!(!session.can_submit());
        session.set_draft("   ");
        assert!(!session.can_submit());
        session.set_draft("hello");
        assert!(session.can_submit());
        session.begin_turn("other").expect("admitted");
        session.set_draft("hello");
        assert!(!session.can_submit());
    }
}
