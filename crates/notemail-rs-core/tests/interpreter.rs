use notemail_rs_config::AssistantConfig;
use notemail_rs_core::{
    ChatSession, ChatState, ChatTurn, Command, InstructionDocument, Interpreter, Mailbox,
    NO_COMMANDS_OUTPUT, SemanticSettings, TurnError,
};
use notemail_rs_llm::ChatProvider;
use notemail_rs_protocol::Identity;
use notemail_rs_test_utils::{
    FailingLLM, FixedLLM, FlakyLLM, RecordingLLM, StubStore, stored_message,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn identity(name: &str) -> Identity {
    Identity::parse(name).expect("identity")
}

fn interpreter(store: &StubStore, llm: Arc<dyn ChatProvider>) -> Interpreter {
    let mailbox = Mailbox::new(
        Arc::new(store.clone()),
        None,
        SemanticSettings::default(),
    );
    Interpreter::new(
        mailbox,
        llm,
        InstructionDocument::builtin(),
        &AssistantConfig::default(),
    )
}

#[tokio::test]
async fn send_runs_as_session_identity() {
    let store = StubStore::new();
    let (llm, seen) = RecordingLLM::new([
        r#"{"commands": [{"action": "send", "params": {"sender": "mallory", "recipient": "bob", "message": "see you at noon"}}]}"#,
        "Sent your note to bob.",
    ]);
    let interpreter = interpreter(&store, Arc::new(llm));

    let report = interpreter
        .handle("tell bob I'll see him at noon", &identity("alice"))
        .await
        .expect("turn");

    let stored = store.messages();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].message.sender, "alice");
    assert_eq!(stored[0].message.recipient, "bob");
    assert_eq!(stored[0].message.body, "see you at noon");
    assert_eq!(report.output, "Mail sent successfully!\n\n");
    assert_eq!(report.summary, "Sent your note to bob.");

    let requests = seen.lock().clone();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].system, InstructionDocument::builtin().content);
    assert_eq!(requests[0].user, "tell bob I'll see him at noon");
    assert_eq!(requests[0].temperature, 0.0);
    assert_eq!(requests[1].temperature, 0.7);
}

#[tokio::test]
async fn summary_prompt_addresses_identity() {
    let store = StubStore::with_messages(vec![stored_message(
        "p1",
        "bob",
        "alice",
        "lunch?",
        Some(1.0),
    )]);
    let (llm, seen) = RecordingLLM::new([
        r#"{"commands": [{"action": "read", "params": {}}]}"#,
        "Bob asked about lunch.",
    ]);
    let interpreter = interpreter(&store, Arc::new(llm));

    let report = interpreter
        .handle("any mail?", &identity("alice"))
        .await
        .expect("turn");

    let requests = seen.lock().clone();
    let summary = &requests[1];
    assert!(
        summary
            .system
            .starts_with("You are a concise email assistant for alice. Address alice directly")
    );
    assert!(summary.user.starts_with("User prompt: any mail?\n\nCommand output:\n"));
    assert!(summary.user.contains(&report.output));
    assert!(
        summary
            .user
            .ends_with("Provide a concise, direct answer. Remember you're talking to alice.")
    );
    assert!(report.output.contains("from: bob\nlunch?\n"));
}

#[tokio::test]
async fn malformed_plan_runs_no_commands() {
    let store = StubStore::new();
    let (llm, seen) = RecordingLLM::new(["I think you want to read mail", "Nothing to do."]);
    let interpreter = interpreter(&store, Arc::new(llm));

    let report = interpreter
        .handle("read my mail", &identity("alice"))
        .await
        .expect("turn");

    assert!(report.plan.commands.is_empty());
    assert!(report.plan.warning.is_some());
    assert_eq!(report.output, NO_COMMANDS_OUTPUT);
    assert!(store.filters().is_empty());
    assert_eq!(seen.lock().len(), 2);
}

#[tokio::test]
async fn execute_reports_unknown_actions_and_blank_terms() {
    let store = StubStore::new();
    let interpreter = interpreter(&store, Arc::new(FixedLLM::new("ok")));

    let output = interpreter
        .execute(
            &[
                Command::Unknown("delete".to_string()),
                Command::Search {
                    keyword: "  ".to_string(),
                },
                Command::SemanticSearch {
                    query: String::new(),
                },
            ],
            &identity("alice"),
        )
        .await;

    assert_eq!(
        output,
        "Unknown action: delete\n\n\
         Please provide a valid search term.\n\n\
         Please provide a valid query.\n\n"
    );
    assert!(store.filters().is_empty());
}

#[tokio::test]
async fn semantic_command_without_index_reports_unavailable() {
    let store = StubStore::new();
    let interpreter = interpreter(&store, Arc::new(FixedLLM::new("ok")));

    let output = interpreter
        .execute(
            &[Command::SemanticSearch {
                query: "lunch".to_string(),
            }],
            &identity("alice"),
        )
        .await;

    assert!(output.starts_with("Error: semantic search is unavailable"));
}

#[tokio::test]
async fn chat_session_exits_on_exit_or_quit() {
    let store = StubStore::new();
    let interpreter = interpreter(&store, Arc::new(FixedLLM::new("ok")));

    let mut session = ChatSession::new(identity("alice"));
    assert_eq!(session.state(), ChatState::AwaitingUtterance);
    assert_eq!(session.submit(&interpreter, "   ").await, ChatTurn::Skipped);
    assert_eq!(session.submit(&interpreter, "QUIT").await, ChatTurn::Exited);
    assert_eq!(session.state(), ChatState::Exited);

    let mut session = ChatSession::new(identity("alice"));
    assert_eq!(session.submit(&interpreter, "Exit").await, ChatTurn::Exited);
}

#[tokio::test]
async fn chat_session_survives_model_failure() {
    let store = StubStore::new();
    let interpreter = interpreter(&store, Arc::new(FailingLLM));

    let mut session = ChatSession::new(identity("alice"));
    let turn = session.submit(&interpreter, "read my mail").await;

    let ChatTurn::Failed(reason) = turn else {
        panic!("expected failure, got {turn:?}");
    };
    assert!(reason.contains("503"));
    assert_eq!(session.state(), ChatState::AwaitingUtterance);
    assert_eq!(session.identity(), &identity("alice"));
}

#[tokio::test]
async fn chat_session_answers_with_report() {
    let store = StubStore::new();
    let (llm, _seen) = RecordingLLM::new([
        r#"{"commands": [{"action": "read", "params": {}}]}"#,
        "Your inbox is empty.",
    ]);
    let interpreter = interpreter(&store, Arc::new(llm));

    let mut session = ChatSession::new(identity("alice"));
    let turn = session.submit(&interpreter, "  check my inbox  ").await;

    let ChatTurn::Answered(report) = turn else {
        panic!("expected answer, got {turn:?}");
    };
    assert_eq!(report.plan.commands, vec![Command::Read]);
    assert_eq!(report.summary, "Your inbox is empty.");
    assert_eq!(
        store.filters(),
        vec![notemail_rs_store::MessageFilter::RecipientEquals(
            "alice".to_string()
        )]
    );
}

#[tokio::test]
async fn summary_failure_keeps_executed_output() {
    let store = StubStore::new();
    let llm = FlakyLLM::new([
        r#"{"commands": [{"action": "send", "params": {"recipient": "bob", "message": "hi"}}]}"#,
    ]);
    let interpreter = interpreter(&store, Arc::new(llm));

    let err = interpreter
        .handle("say hi to bob", &identity("alice"))
        .await
        .expect_err("summary should fail");

    let TurnError::Summary { plan, output, .. } = err else {
        panic!("expected summary failure, got {err:?}");
    };
    assert_eq!(plan.commands.len(), 1);
    assert_eq!(output, "Mail sent successfully!\n\n");
    assert_eq!(store.messages().len(), 1);
}

#[tokio::test]
async fn chat_session_reports_output_when_summary_fails() {
    let store = StubStore::new();
    let llm = FlakyLLM::new([
        r#"{"commands": [{"action": "send", "params": {"recipient": "bob", "message": "hi"}}]}"#,
    ]);
    let interpreter = interpreter(&store, Arc::new(llm));

    let mut session = ChatSession::new(identity("alice"));
    let turn = session.submit(&interpreter, "say hi to bob").await;

    let ChatTurn::Unsummarized {
        plan,
        output,
        reason,
    } = turn
    else {
        panic!("expected unsummarized turn, got {turn:?}");
    };
    assert_eq!(
        plan.commands,
        vec![Command::Send {
            recipient: "bob".to_string(),
            message: "hi".to_string()
        }]
    );
    assert_eq!(output, "Mail sent successfully!\n\n");
    assert_eq!(reason, "model api error (503): model unavailable");
    assert_eq!(session.state(), ChatState::AwaitingUtterance);
    assert_eq!(store.messages().len(), 1);
}

#[tokio::test]
async fn planning_failure_runs_nothing() {
    let store = StubStore::new();
    let interpreter = interpreter(&store, Arc::new(FailingLLM));

    let err = interpreter
        .handle("say hi to bob", &identity("alice"))
        .await
        .expect_err("planning should fail");

    assert!(matches!(err, TurnError::Planning(_)));
    assert!(store.messages().is_empty());
}
