//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::catalog::CatalogPreset;
use crate::message::{MessageKind, Sender};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ConvContext {
    ConvContext::new("test-session", Arc::new(CatalogPreset::Cse.catalog().unwrap()))
}

/// Drive one user event through both phases
fn run_turn(
    state: &ConvState,
    ctx: &ConvContext,
    event: Event,
) -> Result<(ConvState, Vec<Effect>), TransitionError> {
    let started = transition(state, ctx, event)?;
    let mut effects = started.effects;
    let done = transition(&started.new_state, ctx, Event::ReplyDue)?;
    effects.extend(done.effects);
    Ok((done.new_state, effects))
}

fn bot_text(effects: &[Effect]) -> Option<(&str, MessageKind)> {
    effects.iter().find_map(|e| match e {
        Effect::AppendMessage {
            sender: Sender::Bot,
            text,
            kind,
        } => Some((text.as_str(), *kind)),
        _ => None,
    })
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_dialog_state() -> impl Strategy<Value = DialogState> {
    prop_oneof![
        Just(DialogState::Idle),
        "[A-Za-z ]{1,20}".prop_map(|assumed_key| DialogState::AwaitingConfirmation { assumed_key }),
    ]
}

fn arb_reply() -> impl Strategy<Value = Reply> {
    ("[a-zA-Z ]{1,30}", any::<bool>()).prop_map(|(text, prompt)| {
        if prompt {
            Reply::confirmation_prompt(text)
        } else {
            Reply::normal(text)
        }
    })
}

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        arb_dialog_state().prop_map(|dialog| ConvState::Ready { dialog }),
        (arb_reply(), arb_dialog_state())
            .prop_map(|(reply, then)| ConvState::Replying { reply, then }),
    ]
}

fn arb_confirmation() -> impl Strategy<Value = Confirmation> {
    prop_oneof![Just(Confirmation::Yes), Just(Confirmation::No)]
}

/// Queries that cannot contain any alphabetic trigger
fn arb_unmatched_text() -> impl Strategy<Value = String> {
    "[0-9?!.]{1,5}[0-9 ?!.]{0,25}"
}

fn arb_quick_action_trigger() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Admission Process".to_string()),
        Just("Fee Structure".to_string()),
        Just("Course Duration".to_string()),
        Just("Placement Statistics".to_string()),
        Just("Faculty Information".to_string()),
        Just("Infrastructure".to_string()),
        "[A-Za-z ]{0,20}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_quick_action_trigger().prop_map(Event::quick_action),
        "[a-z ]{0,30}".prop_map(Event::free_text),
        arb_unmatched_text().prop_map(Event::free_text),
        arb_confirmation().prop_map(Event::confirm),
        Just(Event::ReplyDue),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: While a reply is in flight only its timer is accepted
    #[test]
    fn prop_replying_accepts_only_reply_due(
        reply in arb_reply(),
        then in arb_dialog_state(),
        event in arb_event(),
    ) {
        let state = ConvState::Replying { reply, then: then.clone() };
        let is_timer = event == Event::ReplyDue;
        match transition(&state, &test_context(), event) {
            Ok(result) => {
                prop_assert!(is_timer);
                prop_assert_eq!(result.new_state, ConvState::Ready { dialog: then });
            }
            Err(e) => {
                prop_assert!(!is_timer);
                prop_assert_eq!(e, TransitionError::ReplyPending);
            }
        }
    }

    // Invariant 2: Entering Replying always shows the user message first
    #[test]
    fn prop_user_message_precedes_reply(events in proptest::collection::vec(arb_event(), 0..20)) {
        let ctx = test_context();
        let mut state = ConvState::idle();

        for event in events {
            if let Ok(result) = transition(&state, &ctx, event) {
                if result.new_state.is_replying() && !state.is_replying() {
                    let user_first = matches!(
                        result.effects.first(),
                        Some(Effect::AppendMessage { sender: Sender::User, .. })
                    );
                    prop_assert!(user_first);
                    prop_assert!(result.effects.contains(&Effect::ScheduleReply));
                }
                if state.is_replying() {
                    prop_assert!(!result.new_state.is_replying());
                    let bot_first = matches!(
                        result.effects.first(),
                        Some(Effect::AppendMessage { sender: Sender::Bot, .. })
                    );
                    prop_assert!(bot_first);
                }
                state = result.new_state;
            }
        }
    }

    // Invariant 3: Every substring trigger answers with its declared response
    #[test]
    fn prop_substring_trigger_round_trip(index in 0usize..12, dialog in arb_dialog_state()) {
        let ctx = test_context();
        let entries: Vec<(&str, &str)> = ctx.catalog.substring_entries().collect();
        let (trigger, expected) = entries[index % entries.len()];

        let (state, effects) =
            run_turn(&ConvState::Ready { dialog }, &ctx, Event::free_text(trigger)).unwrap();
        prop_assert_eq!(bot_text(&effects), Some((expected, MessageKind::Normal)));
        prop_assert_eq!(state, ConvState::idle());
    }

    // Invariant 4: Unmatched free text always asks for confirmation
    #[test]
    fn prop_unmatched_text_prompts(text in arb_unmatched_text()) {
        let ctx = test_context();
        let (state, effects) =
            run_turn(&ConvState::idle(), &ctx, Event::free_text(text)).unwrap();
        prop_assert_eq!(
            bot_text(&effects),
            Some((ctx.catalog.fallback_text(), MessageKind::ConfirmationPrompt))
        );
        prop_assert_eq!(
            state.dialog(),
            &DialogState::AwaitingConfirmation { assumed_key: "Admission Process".to_string() }
        );
    }

    // Invariant 5: Confirmation always returns to idle
    #[test]
    fn prop_confirmation_returns_to_idle(
        text in arb_unmatched_text(),
        answer in arb_confirmation(),
    ) {
        let ctx = test_context();
        let (state, _) = run_turn(&ConvState::idle(), &ctx, Event::free_text(text)).unwrap();
        let (state, effects) = run_turn(&state, &ctx, Event::confirm(answer)).unwrap();

        let expected = match answer {
            Confirmation::Yes => ctx.catalog.lookup_exact("Admission Process").unwrap(),
            Confirmation::No => ctx.catalog.rephrase_text(),
        };
        prop_assert_eq!(bot_text(&effects), Some((expected, MessageKind::Normal)));
        prop_assert_eq!(state, ConvState::idle());
    }

    // Invariant 6: Quick actions ignore history
    #[test]
    fn prop_quick_action_independent_of_dialog(dialog in arb_dialog_state()) {
        let ctx = test_context();
        let (state, effects) =
            run_turn(&ConvState::Ready { dialog }, &ctx, Event::quick_action("Fee Structure"))
                .unwrap();
        prop_assert_eq!(
            bot_text(&effects),
            Some((ctx.catalog.lookup_exact("Fee Structure").unwrap(), MessageKind::Normal))
        );
        prop_assert_eq!(state, ConvState::idle());
    }

    // Invariant 7: Whitespace is never a message
    #[test]
    fn prop_blank_input_rejected(state in arb_state(), text in "[ \t\n]{0,10}") {
        let ctx = test_context();
        let free = transition(&state, &ctx, Event::free_text(text.clone()));
        let quick = transition(&state, &ctx, Event::quick_action(text));
        prop_assert!(free.is_err());
        prop_assert!(quick.is_err());
    }
}
