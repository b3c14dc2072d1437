use std::sync::{Arc, Mutex};

use duet_model::{ErrorKind, ModelMessage, Role};
use duet_test_model::{PresetResponse, TestModelProvider};

use super::Stage;
use crate::injection::{InjectionRule, InjectionTarget};
use crate::turn::{Side, Speaker};
use crate::{DuetBuilder, RunConfig, RunConfigBuilder};

fn provider_with(replies: &[&str]) -> TestModelProvider {
    let mut provider = TestModelProvider::default();
    for reply in replies {
        provider.add_response_step(PresetResponse::with_text(*reply));
    }
    provider
}

fn config(turns: u32) -> RunConfigBuilder {
    RunConfigBuilder::with_models("alpha", "beta")
        .with_system_prompt(Side::A, "sys A")
        .with_system_prompt(Side::B, "sys B")
        .with_initial_prompt("Hi")
        .with_turns(turns)
}

fn system(s: &str) -> ModelMessage {
    ModelMessage::System(s.to_owned())
}

fn user(s: &str) -> ModelMessage {
    ModelMessage::User(s.to_owned())
}

fn assistant(s: &str) -> ModelMessage {
    ModelMessage::Assistant(s.to_owned())
}

fn build(provider: &TestModelProvider, config: RunConfig) -> super::Duet {
    DuetBuilder::with_model_provider(provider.clone(), config).build()
}

#[tokio::test]
async fn test_initial_histories() {
    let provider = TestModelProvider::default();
    let duet = build(&provider, config(3).build().unwrap());
    assert_eq!(duet.history(Side::A).messages(), &[system("sys A"), user("Hi")]);
    assert_eq!(duet.history(Side::B).messages(), &[system("sys B")]);
    assert_eq!(duet.stage, Stage::Seeding);
}

#[tokio::test]
async fn test_zero_and_one_round_only_seed() {
    for turns in [0, 1] {
        let provider = provider_with(&["seed"]);
        let records = build(&provider, config(turns).build().unwrap())
            .run()
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].speaker(), &Speaker::User);
        assert_eq!(records[0].text(), "Hi");
        assert_eq!(records[1].speaker(), &Speaker::Model("alpha".to_owned()));
        assert_eq!(provider.requests().len(), 1);
    }
}

#[tokio::test]
async fn test_reply_count_and_counter() {
    for turns in 0..6u32 {
        let expected = 1 + 2 * u64::from(turns.saturating_sub(1));
        let replies: Vec<String> =
            (1..=expected).map(|i| format!("reply {i}")).collect();
        let replies: Vec<&str> = replies.iter().map(String::as_str).collect();
        let provider = provider_with(&replies);

        let mut duet = build(&provider, config(turns).build().unwrap());
        duet.drive().await.unwrap();

        assert_eq!(duet.completed_turns, expected);
        assert_eq!(duet.stage, Stage::Done);
        assert_eq!(
            duet.records.iter().filter(|r| r.is_reply()).count(),
            expected as usize
        );
        assert_eq!(provider.requests().len(), expected as usize);
        assert_eq!(provider.remaining_steps(), 0);
    }
}

#[tokio::test]
async fn test_alternation_and_diverging_histories() {
    let provider = provider_with(&["a1", "b1", "a2"]);
    let mut duet = build(&provider, config(2).build().unwrap());
    duet.drive().await.unwrap();

    let models: Vec<_> =
        provider.requests().into_iter().map(|r| r.model).collect();
    assert_eq!(models, vec!["alpha", "beta", "alpha"]);

    assert_eq!(
        duet.history(Side::A).messages(),
        &[
            system("sys A"),
            user("Hi"),
            assistant("a1"),
            user("b1"),
            assistant("a2"),
        ]
    );
    assert_eq!(
        duet.history(Side::B).messages(),
        &[system("sys B"), user("a1"), assistant("b1"), user("a2")]
    );

    let labels: Vec<_> = duet.records.iter().map(|r| r.label()).collect();
    assert_eq!(labels, vec!["User", "alpha", "beta", "alpha"]);
}

#[tokio::test]
async fn test_views_are_truncated_for_the_counterpart_only() {
    let provider = provider_with(&["first reply", "second reply", "third"]);
    let mut duet = build(
        &provider,
        config(2).with_history_max_chars(5).build().unwrap(),
    );
    duet.drive().await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests[1].messages, vec![system("sys B"), user("reply")]);
    assert_eq!(
        requests[2].messages,
        vec![
            system("sys A"),
            user("Hi"),
            assistant("first reply"),
            user("reply"),
        ]
    );
    assert_eq!(duet.history(Side::B).messages()[2], assistant("second reply"));
    assert_eq!(duet.history(Side::B).messages()[3], user("third"));

    // Records always carry the whole reply.
    assert_eq!(duet.records[1].text(), "first reply");
    assert_eq!(duet.records[2].text(), "second reply");
}

#[tokio::test]
async fn test_injection_into_both_histories() {
    let provider = provider_with(&["a1", "b1", "a2"]);
    let config = config(2)
        .with_injection(InjectionRule {
            after_turn: 1,
            target: InjectionTarget::Both,
            role: Role::System,
            content: "Stay on topic.".to_owned(),
        })
        .build()
        .unwrap();
    let mut duet = build(&provider, config);
    duet.drive().await.unwrap();

    let requests = provider.requests();
    assert_eq!(
        requests[1].messages,
        vec![system("sys B"), user("a1"), system("Stay on topic.")]
    );
    assert_eq!(
        requests[2].messages,
        vec![
            system("sys A"),
            user("Hi"),
            assistant("a1"),
            system("Stay on topic."),
            user("b1"),
        ]
    );

    let speakers: Vec<_> =
        duet.records.iter().map(|r| r.speaker().clone()).collect();
    assert_eq!(
        speakers,
        vec![
            Speaker::User,
            Speaker::Model("alpha".to_owned()),
            Speaker::Injection {
                role: Role::System,
                target: Side::A,
                model: "alpha".to_owned(),
            },
            Speaker::Injection {
                role: Role::System,
                target: Side::B,
                model: "beta".to_owned(),
            },
            Speaker::Model("beta".to_owned()),
            Speaker::Model("alpha".to_owned()),
        ]
    );
    assert_eq!(duet.records[2].text(), "Stay on topic.");
}

#[tokio::test]
async fn test_co_triggered_injections_keep_order() {
    let provider = provider_with(&["a1", "b1", "a2"]);
    let config = config(2)
        .with_injection(InjectionRule {
            after_turn: 2,
            target: InjectionTarget::A,
            role: Role::User,
            content: "first".to_owned(),
        })
        .with_injection(InjectionRule {
            after_turn: 2,
            target: InjectionTarget::A,
            role: Role::Assistant,
            content: String::new(),
        })
        .with_injection(InjectionRule {
            after_turn: 2,
            target: InjectionTarget::A,
            role: Role::Assistant,
            content: "second".to_owned(),
        })
        .build()
        .unwrap();
    let mut duet = build(&provider, config);
    duet.drive().await.unwrap();

    // After B's reply (turn 2) and before A answers.
    let a_request = &provider.requests()[2];
    assert_eq!(
        &a_request.messages[3..],
        &[user("b1"), user("first"), assistant("second")]
    );
    assert_eq!(duet.history(Side::B).len(), 4);
    assert_eq!(duet.records.len(), 6);
}

#[tokio::test]
async fn test_injection_after_last_turn_still_applies_once() {
    let provider = provider_with(&["a1"]);
    let config = config(1)
        .with_injection(InjectionRule {
            after_turn: 1,
            target: InjectionTarget::B,
            role: Role::User,
            content: "late".to_owned(),
        })
        .with_injection(InjectionRule {
            after_turn: 9,
            target: InjectionTarget::B,
            role: Role::User,
            content: "never".to_owned(),
        })
        .build()
        .unwrap();
    let mut duet = build(&provider, config);
    duet.drive().await.unwrap();

    assert_eq!(
        duet.history(Side::B).messages(),
        &[system("sys B"), user("a1"), user("late")]
    );
    assert_eq!(duet.records.len(), 3);
}

#[tokio::test]
async fn test_injection_at_turn_zero_never_fires() {
    let provider = provider_with(&["a1", "b1", "a2"]);
    let config = config(2)
        .with_injection(InjectionRule {
            after_turn: 0,
            target: InjectionTarget::Both,
            role: Role::System,
            content: "too early".to_owned(),
        })
        .build()
        .unwrap();
    let mut duet = build(&provider, config);
    duet.drive().await.unwrap();

    assert_eq!(duet.completed_turns, 3);
    assert!(duet.records.iter().all(|r| r.text() != "too early"));
    assert_eq!(
        duet.history(Side::B).messages(),
        &[system("sys B"), user("a1"), assistant("b1"), user("a2")]
    );
}

#[tokio::test]
async fn test_transport_failure_aborts_with_partial_records() {
    let mut provider = provider_with(&["a1"]);
    provider.add_response_step(PresetResponse::with_failure(
        ErrorKind::ConnectionRefused,
    ));
    provider.add_response_step(PresetResponse::with_text("unused"));

    let err = build(&provider, config(3).build().unwrap())
        .run()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConnectionRefused);
    assert_eq!(err.partial_turns().len(), 2);
    assert_eq!(provider.requests().len(), 2);
    assert_eq!(provider.remaining_steps(), 1);
    assert!(err.to_string().contains("Connection refused"));
}

#[tokio::test]
async fn test_on_turn_sees_every_record() {
    let provider = provider_with(&["a1", "b1", "a2"]);
    let seen = Arc::new(Mutex::new(vec![]));
    let records = DuetBuilder::with_model_provider(
        provider,
        config(2).build().unwrap(),
    )
    .on_turn({
        let seen = Arc::clone(&seen);
        move |record| seen.lock().unwrap().push(record.text().to_owned())
    })
    .build()
    .run()
    .await
    .unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen, vec!["Hi", "a1", "b1", "a2"]);
    assert_eq!(records.len(), seen.len());
}
