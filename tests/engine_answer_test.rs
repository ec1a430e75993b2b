use cdp_docs::classifier::KeywordRules;
use cdp_docs::engine::{AnswerStatus, Answerer, DocFetcher};
use cdp_docs::knowledge::KnowledgeBase;
use cdp_docs::network::{RecordingSleeper, RetryPolicy, StaticPageSource};
use std::sync::Arc;
use std::time::Duration;

// * Test Suite for the question-answering flow, fully offline

const EVENTS_URL: &str = "https://docs.mparticle.com/developers/events/";
const PROFILES_URL: &str = "https://docs.mparticle.com/guides/guides/user-profiles/";
const IDENTITY_URL: &str = "https://docs.mparticle.com/guides/identity/";
const AUDIENCES_URL: &str = "https://docs.mparticle.com/guides/platform-guide/audiences/";
const SDK_URL: &str = "https://docs.mparticle.com/developers/sdk/";

const EVENTS_QUESTION: &str = "How do I track custom events in mparticle?";

fn page(body: &str) -> String {
    format!(
        "<html><body><nav>Docs home</nav><article>{}</article><footer>Legal</footer></body></html>",
        body
    )
}

fn answerer_with(
    source: StaticPageSource,
    max_results: usize,
) -> (Answerer, Arc<StaticPageSource>, Arc<RecordingSleeper>) {
    let knowledge = Arc::new(KnowledgeBase::builtin().unwrap());
    let rules = KeywordRules::builtin(&knowledge).unwrap();
    let source = Arc::new(source);
    let sleeper = Arc::new(RecordingSleeper::new());
    let fetcher = DocFetcher::new(
        knowledge.clone(),
        source.clone(),
        sleeper.clone(),
        RetryPolicy::new(3, Duration::from_secs(2)),
    );
    (
        Answerer::new(knowledge, rules, fetcher, max_results),
        source,
        sleeper,
    )
}

// * The events page is down; the other sections score 1, 2, 0 and 1 for the question keywords
fn mparticle_without_events_page() -> StaticPageSource {
    StaticPageSource::new()
        .with_page(PROFILES_URL, &page("<p>Profiles hold custom attributes.</p>"))
        .with_page(IDENTITY_URL, &page("<p>We track events for identity resolution.</p>"))
        .with_page(AUDIENCES_URL, &page("<p>Build cohorts here.</p>"))
        .with_page(SDK_URL, &page("<p>Initialize with custom options.</p>"))
}

#[tokio::test]
async fn test_direct_section_answer() {
    let (answerer, source, sleeper) = answerer_with(
        StaticPageSource::new().with_page(
            "https://segment.com/docs/connections/sources/",
            &page("<h2>Sources</h2><p>Create a source from the workspace catalog.</p>"),
        ),
        3,
    );

    let response = answerer
        .answer_question("How do I set up a source in Segment?")
        .await;

    assert_eq!(response.status, AnswerStatus::Success);
    assert_eq!(response.platform.as_deref(), Some("segment"));
    assert_eq!(response.section.as_deref(), Some("sources"));
    assert!(response.sections.is_none());
    assert!(response
        .answer
        .starts_with("From Segment documentation on sources:\n\n"));
    assert!(response.answer.contains("Create a source from the workspace catalog."));
    assert!(!response.answer.contains("Docs home"));
    assert!(!response.answer.contains("Legal"));
    assert_eq!(source.calls().len(), 1);
    assert!(sleeper.naps().is_empty());
}

#[tokio::test]
async fn test_inferred_platform_answer() {
    let (answerer, _, _) = answerer_with(
        StaticPageSource::new().with_page(
            "https://segment.com/docs/privacy/",
            &page("<p>GDPR deletion requests are processed per workspace.</p>"),
        ),
        3,
    );

    let response = answerer.answer_question("What is GDPR compliance?").await;

    assert_eq!(response.status, AnswerStatus::Success);
    assert_eq!(response.platform.as_deref(), Some("segment"));
    assert_eq!(response.section.as_deref(), Some("privacy"));
}

#[tokio::test]
async fn test_failed_direct_fetch_falls_back_to_search() {
    let (answerer, source, sleeper) = answerer_with(mparticle_without_events_page(), 3);

    let response = answerer.answer_question(EVENTS_QUESTION).await;

    assert_eq!(response.status, AnswerStatus::Success);
    assert_eq!(response.platform.as_deref(), Some("mparticle"));
    assert!(response.section.is_none());
    assert_eq!(
        response.sections,
        Some(vec![
            "identity".to_string(),
            "profiles".to_string(),
            "sdk".to_string()
        ])
    );
    assert!(response
        .answer
        .starts_with("Here's what I found in Mparticle documentation:\n\n--- IDENTITY ---\n"));
    assert!(response.answer.contains("--- PROFILES ---\n"));
    assert!(response.answer.contains("Profiles hold custom attributes."));
    assert!(!response.answer.contains("--- AUDIENCES ---"));

    // * Three attempts on the direct fetch, three more during the sweep
    assert_eq!(source.calls_to(EVENTS_URL), 6);
    assert_eq!(sleeper.naps(), vec![Duration::from_secs(2); 4]);
}

#[tokio::test]
async fn test_search_results_are_capped() {
    let (answerer, _, _) = answerer_with(mparticle_without_events_page(), 2);

    let response = answerer.answer_question(EVENTS_QUESTION).await;

    assert_eq!(
        response.sections,
        Some(vec!["identity".to_string(), "profiles".to_string()])
    );
}

#[tokio::test]
async fn test_sections_are_fetched_in_declaration_order() {
    let (answerer, source, _) = answerer_with(mparticle_without_events_page(), 3);

    answerer.answer_question(EVENTS_QUESTION).await;

    let sweep: Vec<String> = source.calls().into_iter().skip(3).collect();
    assert_eq!(
        sweep,
        vec![
            PROFILES_URL.to_string(),
            EVENTS_URL.to_string(),
            EVENTS_URL.to_string(),
            EVENTS_URL.to_string(),
            IDENTITY_URL.to_string(),
            AUDIENCES_URL.to_string(),
            SDK_URL.to_string(),
        ]
    );
}

#[tokio::test]
async fn test_not_found_when_nothing_is_reachable() {
    let (answerer, source, sleeper) = answerer_with(StaticPageSource::new(), 3);

    let response = answerer.answer_question(EVENTS_QUESTION).await;

    assert_eq!(response.status, AnswerStatus::NotFound);
    assert_eq!(response.platform.as_deref(), Some("mparticle"));
    assert_eq!(
        response.answer,
        format!(
            "I couldn't find specific information about '{}' in the mparticle documentation. Please try rephrasing your question or check the official documentation directly.",
            EVENTS_QUESTION
        )
    );
    // * Direct attempt plus five sections, three attempts each
    assert_eq!(source.calls().len(), 18);
    assert_eq!(sleeper.naps().len(), 12);
}

#[tokio::test]
async fn test_not_found_when_nothing_scores() {
    let source = StaticPageSource::new()
        .with_page(PROFILES_URL, &page("<p>Nothing relevant.</p>"))
        .with_page(SDK_URL, &page("<p>Still nothing.</p>"));
    let (answerer, _, _) = answerer_with(source, 3);

    let response = answerer.answer_question(EVENTS_QUESTION).await;

    assert_eq!(response.status, AnswerStatus::NotFound);
    assert!(response.sections.is_none());
}

#[tokio::test]
async fn test_empty_direct_page_falls_back_to_search() {
    let source = mparticle_without_events_page().with_page(EVENTS_URL, "<html><body>  </body></html>");
    let (answerer, source, _) = answerer_with(source, 3);

    let response = answerer.answer_question(EVENTS_QUESTION).await;

    assert_eq!(response.status, AnswerStatus::Success);
    assert!(response.sections.is_some());
    // * Empty pages are not retried
    assert_eq!(source.calls_to(EVENTS_URL), 2);
}

#[tokio::test]
async fn test_unclassified_question_lists_platforms() {
    let (answerer, source, _) = answerer_with(StaticPageSource::new(), 3);

    let response = answerer.answer_question("hello there").await;

    assert_eq!(response.status, AnswerStatus::Info);
    assert_eq!(
        response.platforms,
        Some(vec![
            "segment".to_string(),
            "mparticle".to_string(),
            "lytics".to_string(),
            "zeotap".to_string()
        ])
    );
    assert!(response
        .answer
        .starts_with("I currently support questions about Segment, mParticle, Lytics, and Zeotap."));
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn test_fixed_messages_keep_brand_spelling() {
    let (answerer, _, _) = answerer_with(StaticPageSource::new(), 3);

    let info = answerer.answer_question("hello there").await;
    assert_eq!(
        info.answer,
        "I currently support questions about Segment, mParticle, Lytics, and Zeotap. Try asking about sources, destinations, events, user profiles, audiences, APIs, or integrations!"
    );

    let rejected = answerer.answer_question("").await;
    assert_eq!(
        rejected.answer,
        "Please ask a question about CDP platforms like Segment, mParticle, Lytics, or Zeotap."
    );
    assert!(!info.answer.contains("Mparticle"));
}

#[tokio::test]
async fn test_blank_question_is_rejected() {
    let (answerer, source, _) = answerer_with(StaticPageSource::new(), 3);

    for question in ["", "   \n\t"] {
        let response = answerer.answer_question(question).await;
        assert_eq!(response.status, AnswerStatus::Error);
        assert_eq!(response.error.as_deref(), Some("No question provided"));
        assert!(response.answer.contains("Segment, mParticle, Lytics, or Zeotap"));
    }
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn test_response_json_shape() {
    let (answerer, _, _) = answerer_with(mparticle_without_events_page(), 3);

    let json: serde_json::Value =
        serde_json::from_str(&answerer.answer_question(EVENTS_QUESTION).await.to_json()).unwrap();

    assert_eq!(json["status"], "success");
    assert_eq!(json["platform"], "mparticle");
    assert_eq!(json["sections"][0], "identity");
    assert!(json.get("section").is_none());
    assert!(json.get("error").is_none());
}
