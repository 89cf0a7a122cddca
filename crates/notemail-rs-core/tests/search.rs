use notemail_rs_core::{KeywordOutcome, Mailbox, SemanticOutcome, SemanticSettings};
use notemail_rs_protocol::Identity;
use notemail_rs_store::MessageFilter;
use notemail_rs_vector::{EmbedInputType, VectorIndex};
use notemail_rs_test_utils::{StubIndex, StubStore, flattened_match, stored_message};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn identity(name: &str) -> Identity {
    Identity::parse(name).expect("identity")
}

fn lunch_store() -> StubStore {
    StubStore::with_messages(vec![
        stored_message("p3", "Carol", "Dave", "unrelated", Some(3.0)),
        stored_message("p2", "Bob", "Alice", "yes 1pm", Some(2.0)),
        stored_message("p1", "Alice", "Bob", "lunch?", Some(1.0)),
    ])
}

fn mailbox(store: StubStore, index: Option<StubIndex>) -> Mailbox {
    Mailbox::new(
        Arc::new(store),
        index.map(|index| Arc::new(index) as Arc<dyn VectorIndex>),
        SemanticSettings::default(),
    )
}

#[tokio::test]
async fn keyword_search_returns_only_messages_involving_identity() {
    let store = lunch_store();
    let mailbox = mailbox(store.clone(), None);

    let outcome = mailbox.search("lunch", &identity("alice")).await;

    let results = outcome.results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source_id, "p1");
    assert_eq!(results[0].sender, "Alice");
    assert_eq!(results[0].recipient, "Bob");
    assert_eq!(results[0].body, "lunch?");
    assert_eq!(
        store.filters(),
        vec![MessageFilter::ContainsAny("lunch".to_string())]
    );
}

#[tokio::test]
async fn keyword_search_hides_other_users_messages() {
    let mailbox = mailbox(lunch_store(), None);

    let outcome = mailbox.search("unrelated", &identity("alice")).await;

    assert!(outcome.results().is_empty());
    assert_eq!(
        outcome,
        KeywordOutcome::NoneForIdentity {
            term: "unrelated".to_string(),
            identity: identity("alice"),
            total: 1,
        }
    );
    assert_eq!(
        outcome.to_string(),
        "Search results for 'unrelated' (1 messages):\n\n\
         No messages found containing 'unrelated' for user alice.\n"
    );
}

#[tokio::test]
async fn keyword_results_are_ordered_oldest_first() {
    let store = StubStore::with_messages(vec![
        stored_message("late", "Alice", "Bob", "lunch again", Some(20.0)),
        stored_message("undated", "Bob", "Alice", "lunch, no date", None),
        stored_message("early", "Alice", "Bob", "lunch first", Some(10.0)),
    ]);
    let mailbox = mailbox(store, None);

    let outcome = mailbox.search("lunch", &identity("ALICE")).await;

    let ids: Vec<&str> = outcome
        .results()
        .iter()
        .map(|result| result.source_id.as_str())
        .collect();
    assert_eq!(ids, vec!["undated", "early", "late"]);
}

#[tokio::test]
async fn keyword_search_reports_store_failure() {
    let mailbox = mailbox(StubStore::new().failing_query(), None);

    let outcome = mailbox.search("lunch", &identity("alice")).await;

    assert!(matches!(outcome, KeywordOutcome::Failed { .. }));
    assert!(
        outcome
            .to_string()
            .starts_with("Error searching messages for 'lunch':")
    );
}

#[tokio::test]
async fn semantic_search_without_index_is_unavailable() {
    let mailbox = mailbox(lunch_store(), None);

    let outcome = mailbox.semantic_search("lunch plans", "alice").await;

    assert_eq!(outcome, SemanticOutcome::Unavailable);
    assert!(outcome.results().is_empty());
    assert_eq!(
        outcome.to_string(),
        "Error: semantic search is unavailable (vector index not configured).\n"
    );
}

#[tokio::test]
async fn semantic_search_overfetches_and_filters_by_identity() {
    let index = StubIndex::with_matches(vec![
        flattened_match("m1", 0.95, "Carol", "Dave", "team lunch"),
        flattened_match("m2", 0.90, "Alice", "Bob", "lunch?"),
        flattened_match("m3", 0.80, "Dave", "Carol", "lunch at noon"),
        flattened_match("m4", 0.70, "Bob", "alice", "yes 1pm"),
    ]);
    let mailbox = mailbox(StubStore::new(), Some(index.clone()));

    let outcome = mailbox.semantic_search("lunch plans", "Alice").await;

    let ids: Vec<&str> = outcome
        .results()
        .iter()
        .map(|result| result.source_id.as_str())
        .collect();
    assert_eq!(ids, vec!["m2", "m4"]);
    assert_eq!(outcome.results()[0].score, Some(0.90));
    assert_eq!(index.queries(), vec![(9, "notion_mail".to_string())]);
    let embeds = index.embed_calls();
    assert_eq!(embeds.len(), 1);
    assert_eq!(embeds[0].0, vec!["lunch plans".to_string()]);
    assert_eq!(embeds[0].1, EmbedInputType::Query);
}

#[tokio::test]
async fn semantic_search_stops_at_top_k() {
    let matches = (0..6)
        .map(|n| flattened_match(&format!("m{n}"), 1.0 - n as f32 / 10.0, "alice", "bob", "hi"))
        .collect();
    let mailbox = mailbox(StubStore::new(), Some(StubIndex::with_matches(matches)));

    let outcome = mailbox.semantic_search("hi", "alice").await;

    let ids: Vec<&str> = outcome
        .results()
        .iter()
        .map(|result| result.source_id.as_str())
        .collect();
    assert_eq!(ids, vec!["m0", "m1", "m2"]);
}

#[tokio::test]
async fn semantic_search_skips_unparseable_metadata() {
    let mut broken = flattened_match("broken", 0.99, "alice", "bob", "x");
    broken.metadata = None;
    let index = StubIndex::with_matches(vec![
        broken,
        flattened_match("ok", 0.5, "alice", "bob", "real message"),
    ]);
    let mailbox = mailbox(StubStore::new(), Some(index));

    let outcome = mailbox.semantic_search("message", "alice").await;

    assert_eq!(outcome.results().len(), 1);
    assert_eq!(outcome.results()[0].source_id, "ok");
}

#[tokio::test]
async fn semantic_search_without_matches_names_the_identity() {
    let index = StubIndex::with_matches(vec![flattened_match("m1", 0.9, "carol", "dave", "x")]);
    let mailbox = mailbox(StubStore::new(), Some(index));

    let outcome = mailbox.semantic_search("anything", "alice").await;

    assert_eq!(
        outcome.to_string(),
        "Semantic search results for 'anything':\nNo matching messages found for user 'alice'.\n"
    );
}

#[tokio::test]
async fn semantic_search_requires_identity() {
    let index = StubIndex::new();
    let mailbox = mailbox(StubStore::new(), Some(index.clone()));

    let outcome = mailbox.semantic_search("anything", "   ").await;

    assert_eq!(
        outcome,
        SemanticOutcome::Failed("You must provide a username to perform semantic search.".to_string())
    );
    assert!(index.embed_calls().is_empty());
}

#[tokio::test]
async fn semantic_search_reports_query_failure() {
    let index = StubIndex::with_matches(vec![flattened_match("m1", 0.9, "alice", "bob", "lunch?")])
        .failing_query();
    let mailbox = mailbox(StubStore::new(), Some(index.clone()));

    let outcome = mailbox.semantic_search("lunch", "alice").await;

    assert!(matches!(outcome, SemanticOutcome::Failed(_)));
    assert!(outcome.results().is_empty());
    assert!(outcome.to_string().contains("query timed out upstream"));
    assert_eq!(index.embed_calls().len(), 1);
    assert_eq!(index.queries().len(), 1);
}

#[tokio::test]
async fn semantic_search_reports_embedding_failure() {
    let mailbox = mailbox(StubStore::new(), Some(StubIndex::new().failing_embed()));

    let outcome = mailbox.semantic_search("anything", "alice").await;

    assert!(matches!(outcome, SemanticOutcome::Failed(_)));
    assert!(
        outcome
            .to_string()
            .starts_with("Error performing semantic search:")
    );
}
