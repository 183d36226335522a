use serde_json::json;

use super::*;
use crate::render::NoticeKind;
use crate::state::CurrentQuestion;

// =============================================================
// Doubles
// =============================================================

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Title(String),
    HostControls(bool),
    Connection(ConnectionStatus),
    Phase(Phase),
    Roster(Vec<RosterEntry>),
    Question(CurrentQuestion),
    AnswerSelected(bool),
    ClearTally,
    Tally(Tally),
    Notice(Notice),
}

#[derive(Default)]
struct RecordingRenderer {
    calls: Vec<Call>,
}

impl RecordingRenderer {
    fn notices(&self) -> Vec<&Notice> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl Renderer for RecordingRenderer {
    fn title(&mut self, title: &str) {
        self.calls.push(Call::Title(title.to_owned()));
    }
    fn host_controls(&mut self, visible: bool) {
        self.calls.push(Call::HostControls(visible));
    }
    fn connection(&mut self, status: ConnectionStatus) {
        self.calls.push(Call::Connection(status));
    }
    fn phase(&mut self, phase: Phase) {
        self.calls.push(Call::Phase(phase));
    }
    fn roster(&mut self, players: &[RosterEntry]) {
        self.calls.push(Call::Roster(players.to_vec()));
    }
    fn question(&mut self, question: &CurrentQuestion) {
        self.calls.push(Call::Question(question.clone()));
    }
    fn answer_selected(&mut self, answer: bool) {
        self.calls.push(Call::AnswerSelected(answer));
    }
    fn clear_tally(&mut self) {
        self.calls.push(Call::ClearTally);
    }
    fn tally(&mut self, tally: &Tally) {
        self.calls.push(Call::Tally(tally.clone()));
    }
    fn notice(&mut self, notice: Notice) {
        self.calls.push(Call::Notice(notice));
    }
}

/// Outbox whose channel has gone away.
struct ClosedOutbox;

impl Outbox for ClosedOutbox {
    fn send(&mut self, _event: ClientEvent) -> bool {
        false
    }
}

type TestView = ViewSync<RecordingRenderer, Vec<ClientEvent>>;

fn view(is_host: bool) -> TestView {
    let session = LaunchParams::new("g1", "p1", is_host).expect("valid launch");
    ViewSync::new(session, RecordingRenderer::default(), Vec::new())
}

fn deliver(view: &mut TestView, name: &str, data: serde_json::Value) {
    view.receive(&wire::Event::new(name, data));
}

fn ask(view: &mut TestView, id: i64) {
    let data = json!({"question": {"id": id, "text": format!("q{id}")}});
    deliver(view, "new_question", data);
}

fn tally_for(question_id: i64) -> serde_json::Value {
    json!({
        "question_id": question_id,
        "all_answers": [
            {"player_name": "A", "answer": true},
            {"player_name": "B", "answer": false}
        ]
    })
}

fn notice_messages(view: &TestView) -> Vec<String> {
    view.renderer()
        .notices()
        .into_iter()
        .map(|n| n.message.clone())
        .collect()
}

// =============================================================
// Construction and connection
// =============================================================

#[test]
fn new_renders_host_controls_for_role() {
    let host = view(true);
    let guest = view(false);
    assert!(host.renderer().calls.contains(&Call::HostControls(true)));
    assert!(guest.renderer().calls.contains(&Call::HostControls(false)));
}

#[test]
fn connect_announces_and_joins() {
    let mut v = view(false);
    v.on_connecting();
    v.on_connected();
    assert_eq!(v.state().connection, ConnectionStatus::Connected);
    let join = ClientEvent::JoinGame {
        game_id: "g1".to_owned(),
        player_id: "p1".to_owned(),
    };
    assert_eq!(v.outbox().as_slice(), &[join]);
    assert_eq!(notice_messages(&v), ["Connected to game server"]);
    assert_eq!(v.renderer().notices()[0].kind, NoticeKind::Success);
}

#[test]
fn every_reconnect_joins_again() {
    let mut v = view(false);
    v.on_connected();
    v.on_disconnected();
    v.on_connected();
    assert_eq!(v.outbox().len(), 2);
}

#[test]
fn disconnect_warns_only_from_connected() {
    let mut v = view(false);
    v.on_connecting();
    v.on_disconnected();
    assert!(v.renderer().notices().is_empty());

    v.on_connected();
    v.on_disconnected();
    let last = v.renderer().notices().pop().cloned();
    assert_eq!(last, Some(Notice::warning("Disconnected from game server")));
    assert_eq!(v.state().connection, ConnectionStatus::Disconnected);
}

#[test]
fn refused_connect_shows_server_message() {
    let mut v = view(false);
    v.on_refused("not allowed");
    assert_eq!(v.renderer().notices(), vec![&Notice::error("not allowed")]);
}

// =============================================================
// Roster
// =============================================================

#[test]
fn roster_replaces_player_list() {
    let mut v = view(false);
    let players = json!([
        {"id": 1, "name": "Alice", "is_host": true},
        {"id": 2, "name": "Bob", "is_host": false}
    ]);
    deliver(&mut v, "join_success", json!({"players": players}));
    let roster = &v.state().roster;
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0].name, "Alice");
    assert!(roster[0].is_host);
    assert!(!roster[1].is_host);
    let last = v.renderer().calls.last();
    assert!(matches!(last, Some(Call::Roster(p)) if p.len() == 2));

    deliver(&mut v, "room_update", json!({"players": [{"name": "Cy"}]}));
    assert_eq!(v.state().roster.len(), 1);
}

#[test]
fn joined_and_left_show_notices() {
    let mut v = view(false);
    let joined = json!({"player": {"name": "Dee"}, "players": [{"name": "Dee"}]});
    deliver(&mut v, "player_joined", joined);
    let left = json!({"username": "Dee", "players": []});
    deliver(&mut v, "player_left", left);
    assert_eq!(
        notice_messages(&v),
        ["Dee joined the game", "Dee left the game"]
    );
    assert!(v.state().roster.is_empty());
}

#[test]
fn joined_without_roster_keeps_current_list() {
    let mut v = view(false);
    deliver(&mut v, "room_update", json!({"players": [{"name": "Ann"}]}));
    deliver(&mut v, "joined", json!({"username": "Ben"}));
    assert_eq!(v.state().roster.len(), 1);
}

// =============================================================
// Questions
// =============================================================

#[test]
fn new_question_clears_tally_before_rendering_question() {
    let mut v = view(false);
    ask(&mut v, 1);
    v.submit_answer(true).expect("submit");
    deliver(&mut v, "answer_submitted", tally_for(1));
    assert!(v.state().tally.is_some());

    let before = v.renderer().calls.len();
    ask(&mut v, 2);
    let calls = &v.renderer().calls[before..];
    let clear = calls
        .iter()
        .position(|c| *c == Call::ClearTally)
        .expect("tally cleared");
    let question = calls
        .iter()
        .position(|c| matches!(c, Call::Question(_)))
        .expect("question rendered");
    assert!(clear < question);

    assert!(v.state().tally.is_none());
    assert_eq!(v.state().answer, crate::state::AnswerState::default());
}

#[test]
fn question_ordinal_falls_back_to_previous_plus_one() {
    let mut v = view(false);
    ask(&mut v, 1);
    ask(&mut v, 2);
    let numbered = json!({"question": {"id": 9, "text": "x"}, "question_number": 7});
    deliver(&mut v, "new_question", numbered);
    ask(&mut v, 10);
    let numbers: Vec<u32> = v
        .renderer()
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Question(q) => Some(q.number),
            _ => None,
        })
        .collect();
    assert_eq!(numbers, vec![1, 2, 7, 8]);
}

#[test]
fn question_total_comes_from_payload_or_http() {
    let mut v = view(false);
    v.apply_question_count(30);
    ask(&mut v, 1);
    let question = v.state().question.as_ref().expect("question");
    assert_eq!(question.counter_label(), "Question 1 of 30");

    let totalled = json!({"question": {"id": 2, "text": "x"}, "total_questions": 12});
    deliver(&mut v, "new_question", totalled);
    assert_eq!(v.state().question.as_ref().and_then(|q| q.total), Some(12));
}

#[test]
fn game_started_with_question_shows_first_question() {
    let mut v = view(false);
    let started = json!({"question": {"id": 5, "text": "been late"}});
    deliver(&mut v, "game_started", started);
    let q = v.state().question.as_ref().expect("question");
    assert_eq!(q.number, 1);
    assert_eq!(q.display_text(), "Never have I ever been late");
    assert_eq!(v.state().phase, Phase::Question);
}

#[test]
fn game_started_without_question_switches_view() {
    let mut v = view(false);
    deliver(&mut v, "game_started", json!({}));
    assert_eq!(v.state().phase, Phase::Question);
    assert!(v.state().question.is_none());
    assert!(v.renderer().calls.contains(&Call::ClearTally));
}

// =============================================================
// Answers
// =============================================================

#[test]
fn submit_twice_sends_once() {
    let mut v = view(false);
    ask(&mut v, 3);
    assert_eq!(v.submit_answer(false), Ok(()));
    assert_eq!(v.submit_answer(true), Err(ActionError::AlreadyAnswered));

    let submits: Vec<&ClientEvent> = v
        .outbox()
        .iter()
        .filter(|e| matches!(e, ClientEvent::SubmitAnswer { .. }))
        .collect();
    assert_eq!(
        submits,
        vec![&ClientEvent::SubmitAnswer {
            game_id: "g1".to_owned(),
            player_id: "p1".to_owned(),
            question_id: WireId::Number(3),
            answer: false,
        }]
    );
    assert_eq!(v.state().answer.selected, Some(false));
    let selected = v.renderer().count(|c| matches!(c, Call::AnswerSelected(_)));
    assert_eq!(selected, 1);
    assert!(v.renderer().notices().is_empty());
}

#[test]
fn submit_without_question_notices_and_sends_nothing() {
    let mut v = view(false);
    assert_eq!(v.submit_answer(true), Err(ActionError::NoActiveQuestion));
    assert!(v.outbox().is_empty());
    assert_eq!(notice_messages(&v), ["No active question"]);
}

#[test]
fn submit_without_question_id_is_rejected() {
    let mut v = view(false);
    deliver(&mut v, "new_question", json!({"question": "no id here"}));
    assert_eq!(v.submit_answer(true), Err(ActionError::NoActiveQuestion));
    assert!(v.outbox().is_empty());
}

#[test]
fn failed_send_leaves_answer_state_untouched() {
    let session = LaunchParams::new("g1", "p1", false).expect("valid launch");
    let mut v = ViewSync::new(session, RecordingRenderer::default(), ClosedOutbox);
    v.handle(ServerEvent::NewQuestion {
        question: Question {
            id: Some(WireId::Number(1)),
            text: "x".to_owned(),
            category: None,
        },
        number: None,
        total: None,
    });
    assert_eq!(v.submit_answer(true), Err(ActionError::ChannelClosed));
    assert!(!v.state().answer.has_answered);
    let last = v.renderer().notices().pop().cloned().expect("notice");
    assert_eq!(last.kind, NoticeKind::Warning);
    assert_eq!(last.message, "Not connected to game server");
}

// =============================================================
// Tally
// =============================================================

#[test]
fn tally_partitions_and_reveals() {
    let mut v = view(false);
    ask(&mut v, 1);
    deliver(&mut v, "answer_submitted", tally_for(1));
    let Some(Call::Tally(tally)) = v.renderer().calls.last() else {
        panic!("expected tally render");
    };
    assert_eq!(tally.have, vec!["A".to_owned()]);
    assert_eq!(tally.have_not, vec!["B".to_owned()]);
}

#[test]
fn stale_tally_is_discarded() {
    let mut v = view(false);
    ask(&mut v, 1);
    ask(&mut v, 2);
    deliver(&mut v, "answer_submitted", tally_for(1));
    assert!(v.state().tally.is_none());
    assert_eq!(v.renderer().count(|c| matches!(c, Call::Tally(_))), 0);
}

#[test]
fn untagged_tally_is_accepted() {
    let mut v = view(false);
    ask(&mut v, 1);
    let untagged = json!({"all_answers": [{"playerName": "A", "answer": false}]});
    deliver(&mut v, "answer_submitted", untagged);
    let tally = v.state().tally.as_ref().expect("tally");
    assert!(tally.have.is_empty());
    assert_eq!(tally.have_not, ["A"]);
}

// =============================================================
// Host actions
// =============================================================

#[test]
fn non_host_actions_never_send() {
    let mut v = view(false);
    ask(&mut v, 1);
    assert_eq!(v.start_game(), Err(ActionError::NotHost("start the game")));
    assert!(matches!(v.advance_question(), Err(ActionError::NotHost(_))));
    assert!(v.outbox().is_empty());
    assert_eq!(
        notice_messages(&v),
        [
            "Only the host can start the game",
            "Only the host can move to the next question",
        ]
    );
}

#[test]
fn host_starts_and_advances() {
    let mut v = view(true);
    v.start_game().expect("start");
    ask(&mut v, 4);
    v.advance_question().expect("advance");
    assert_eq!(
        v.outbox().as_slice(),
        &[
            ClientEvent::StartGame {
                game_id: "g1".to_owned(),
                player_id: "p1".to_owned(),
            },
            ClientEvent::NextQuestion {
                game_id: "g1".to_owned(),
                player_id: "p1".to_owned(),
                current_question_id: WireId::Number(4),
            },
        ]
    );
}

#[test]
fn advance_requires_current_question() {
    let mut v = view(true);
    assert_eq!(v.advance_question(), Err(ActionError::NoActiveQuestion));
    assert!(v.outbox().is_empty());
}

// =============================================================
// Game over
// =============================================================

#[test]
fn game_over_is_terminal_and_rendered_once() {
    let mut v = view(true);
    ask(&mut v, 1);
    deliver(&mut v, "game_over", json!({}));
    deliver(&mut v, "game_over", json!({}));
    ask(&mut v, 2);
    let untagged = json!({"all_answers": [{"player_name": "A", "answer": true}]});
    deliver(&mut v, "answer_submitted", untagged);

    assert_eq!(v.state().phase, Phase::Over);
    assert_eq!(v.renderer().count(|c| *c == Call::Phase(Phase::Over)), 1);
    let over = "Game over! You've gone through all the questions.";
    let announced = notice_messages(&v).iter().filter(|m| *m == over).count();
    assert_eq!(announced, 1);
    assert_eq!(v.state().current_question_id(), Some(&WireId::Number(1)));
    assert!(v.state().tally.is_none());

    assert_eq!(v.submit_answer(true), Err(ActionError::GameOver));
    assert_eq!(v.start_game(), Err(ActionError::GameOver));
    assert_eq!(v.advance_question(), Err(ActionError::GameOver));
    assert!(v.outbox().is_empty());
}

#[test]
fn roster_and_errors_still_render_after_game_over() {
    let mut v = view(false);
    deliver(&mut v, "game_over", json!({}));
    deliver(&mut v, "room_update", json!({"players": [{"name": "Ann"}]}));
    deliver(&mut v, "error", json!({"message": "Game not found"}));
    assert_eq!(v.state().roster.len(), 1);
    let last = v.renderer().notices().pop().cloned();
    assert_eq!(last, Some(Notice::error("Game not found")));
}

// =============================================================
// Errors and robustness
// =============================================================

#[test]
fn error_without_message_uses_fallback() {
    let mut v = view(false);
    deliver(&mut v, "error", json!({}));
    assert_eq!(notice_messages(&v), ["An error occurred"]);
}

#[test]
fn unknown_and_malformed_events_are_ignored() {
    let mut v = view(false);
    let before = v.renderer().calls.len();
    let status = json!({"status": "connected"});
    deliver(&mut v, "connection_response", status);
    deliver(&mut v, "new_question", json!({"nope": true}));
    deliver(&mut v, "room_update", json!({"players": 5}));
    assert_eq!(v.renderer().calls.len(), before);
    assert_eq!(*v.state(), GameState::default());
}

// =============================================================
// HTTP collaborator results
// =============================================================

#[test]
fn game_info_sets_title_and_roster() {
    let mut v = view(false);
    v.apply_game_info(GameInfo {
        game_modes: Some("classic,spicy".to_owned()),
        players: vec![RosterEntry {
            id: None,
            name: "Ann".to_owned(),
            is_host: true,
        }],
    });
    let title = "Never Have I Ever: Mixed Categories";
    assert!(v.renderer().calls.contains(&Call::Title(title.to_owned())));
    assert_eq!(v.state().title.as_deref(), Some(title));
    assert_eq!(v.state().roster.len(), 1);
}

#[test]
fn report_error_shows_notice() {
    let mut v = view(false);
    v.report_error("Failed to load game");
    assert_eq!(
        v.renderer().notices(),
        vec![&Notice::error("Failed to load game")]
    );
}
