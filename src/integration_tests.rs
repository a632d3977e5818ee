//! End-to-end tests over the UI <-> backend channel protocol, with the
//! network replaced by a scripted responder thread.

use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;

use crate::backend::chat_request_body;
use crate::events::{process_events, APOLOGY_MESSAGE};
use crate::message::Sender;
use crate::protocol::{BackendAction, UiEvent};
use crate::reveal::{RevealScheduler, REVEAL_CHAR_INTERVAL, REVEAL_START_DELAY};
use crate::state::ChatState;

/// Drive the reveal scheduler with a synthetic clock until it settles.
fn run_reveal_to_completion(state: &ChatState, scheduler: &mut RevealScheduler) -> Vec<usize> {
    let start = Instant::now();
    let latest = state
        .conversation
        .latest_bot()
        .map(|m| (m.id, m.formatted.as_str()));
    scheduler.sync(latest, start);

    let mut observed = Vec::new();
    let mut now = start;
    for _ in 0..10_000 {
        scheduler.tick(now);
        if let Some((id, _)) = latest {
            if let Some(session) = scheduler.session_for(id) {
                observed.push(session.revealed_chars);
                if !session.is_revealing {
                    break;
                }
            }
        }
        now += REVEAL_CHAR_INTERVAL;
    }
    observed
}

#[test]
fn test_end_to_end_send_and_reveal() {
    let (action_tx, action_rx) = unbounded::<BackendAction>();
    let (event_tx, event_rx) = unbounded::<UiEvent>();

    // Scripted endpoint: replies to one message and hangs up.
    let responder = std::thread::spawn(move || {
        match action_rx.recv_timeout(Duration::from_secs(2)) {
            Ok(BackendAction::SendMessage { text }) => {
                assert_eq!(text, "hello");
                assert_eq!(chat_request_body(&text).to_string(), r#"{"message":"hello"}"#);
                let _ = event_tx.send(UiEvent::BotResponse("Hi! ```py\nprint(1)\n```".into()));
            }
            other => panic!("expected SendMessage, got {:?}", other),
        }
    });

    // The UI side of a send: append the user message, mark busy, hand off.
    let mut state = ChatState::default();
    state.conversation.push(Sender::User, "hello".into(), vec![]);
    state.is_loading = true;
    action_tx
        .send(BackendAction::SendMessage { text: "hello".into() })
        .unwrap();
    responder.join().unwrap();

    process_events(&event_rx, &mut state);
    assert!(!state.is_loading);
    assert_eq!(state.conversation.len(), 2);

    let bot = state.conversation.latest_bot().expect("bot reply is latest");
    assert_eq!(bot.formatted, "Hi! <pre lang=\"py\">print(1)</pre>");

    // Reveal runs over the formatted string and ends with it in full.
    let mut scheduler = RevealScheduler::new();
    let observed = run_reveal_to_completion(&state, &mut scheduler);
    assert!(observed.windows(2).all(|w| w[0] <= w[1]));
    let session = scheduler.session_for(bot.id).unwrap();
    assert!(!session.is_revealing);
    assert_eq!(session.visible_prefix(), bot.formatted);
}

#[test]
fn test_end_to_end_failure_yields_apology() {
    let (action_tx, action_rx) = unbounded::<BackendAction>();
    let (event_tx, event_rx) = unbounded::<UiEvent>();

    let responder = std::thread::spawn(move || {
        let _ = action_rx.recv_timeout(Duration::from_secs(2));
        let _ = event_tx.send(UiEvent::RequestFailed("dns error: no such host".into()));
    });

    let mut state = ChatState::default();
    state.conversation.push(Sender::User, "hello".into(), vec![]);
    state.is_loading = true;
    action_tx
        .send(BackendAction::SendMessage { text: "hello".into() })
        .unwrap();
    responder.join().unwrap();

    process_events(&event_rx, &mut state);

    assert!(!state.is_loading);
    assert_eq!(state.conversation.len(), 2);
    let bot = state.conversation.latest_bot().unwrap();
    assert_eq!(bot.content, APOLOGY_MESSAGE);
    assert!(state.system_log.iter().any(|l| l.contains("no such host")));
}

#[test]
fn test_reveal_interrupted_by_second_response() {
    let mut state = ChatState::default();
    state.conversation.push(Sender::Bot, "first reply".into(), vec![]);
    let first_id = state.conversation.latest().unwrap().id;

    let start = Instant::now();
    let mut scheduler = RevealScheduler::new();
    scheduler.sync(Some((first_id, "first reply")), start);
    scheduler.tick(start + REVEAL_START_DELAY + REVEAL_CHAR_INTERVAL);
    let partial = scheduler.session_for(first_id).unwrap().revealed_chars;
    assert!(partial > 0 && partial < "first reply".len());

    // A second reply lands before the first finishes typing.
    state.conversation.push(Sender::Bot, "second".into(), vec![]);
    let latest = state
        .conversation
        .latest_bot()
        .map(|m| (m.id, m.formatted.as_str()));
    scheduler.sync(latest, start + Duration::from_millis(400));

    // The first session is gone for good; only the second advances.
    assert!(scheduler.session_for(first_id).is_none());
    scheduler.tick(start + Duration::from_millis(800));
    assert!(scheduler.session_for(first_id).is_none());
    let second = state.conversation.latest().unwrap();
    assert!(scheduler.session_for(second.id).unwrap().revealed_chars > 0);
}

#[test]
fn test_user_message_renders_without_reveal() {
    let mut state = ChatState::default();
    state.conversation.push(Sender::Bot, "earlier".into(), vec![]);
    state.conversation.push(Sender::User, "latest is mine".into(), vec![]);

    let mut scheduler = RevealScheduler::new();
    let latest = state
        .conversation
        .latest_bot()
        .map(|m| (m.id, m.formatted.as_str()));
    scheduler.sync(latest, Instant::now());

    // No session at all: every message shows its full cached markup.
    assert!(!scheduler.is_revealing());
    for msg in state.conversation.messages() {
        assert!(scheduler.session_for(msg.id).is_none());
    }
}
