use pretty_assertions::assert_eq;
use std::sync::Arc;
use vocab_quest::{
    ai::{mock::synthetic_record, EnrichmentService, GeminiEnrichmentClient, MockEnrichmentClient},
    app::{App, AppServices},
    article::{board::SlotTap, StudyState, StudyView},
    games::{Advance, Game},
    library::WordLibrary,
    models::{GameKind, SavedStory, WordGroup},
    result::{summarize, Headline},
    session::{LearningPath, Mode, Screen, Session},
    speech::MockSpeech,
    store::{JsonFileStore, MemoryStore, RecordStore, LIBRARY_FILE},
    Error,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn session_with_words(words: &str) -> Session {
    let mut session = Session::with_seed(11);
    session.choose_path(LearningPath::Custom).unwrap();
    session
        .submit_words(words, &MockEnrichmentClient::new())
        .await
        .unwrap();
    session.finish_flashcards().unwrap();
    session
}

#[tokio::test]
async fn test_quiz_flow_reaches_perfect_result() {
    let mut session = session_with_words("apple, banana, cherry, grape").await;
    session.select_game(GameKind::Quiz).unwrap();

    loop {
        let Some((Game::Quiz(engine), _)) = session.game_mut() else {
            panic!("expected quiz");
        };
        let correct = engine.current().unwrap().correct_option().unwrap();
        engine.answer(correct);
        if let Advance::Finished(_) = engine.advance() {
            break;
        }
    }

    let stats = session.finish_game().unwrap().clone();
    assert_eq!((stats.score, stats.total), (4, 4));

    let summary = summarize(&stats);
    assert_eq!(summary.message, "Perfect Score! You're a Genius!");
    assert_eq!(
        summary.headline,
        Headline::Scored {
            percentage: 100,
            score: 4,
            total: 4
        }
    );
    assert_eq!(summary.review.len(), 4);
}

#[tokio::test]
async fn test_every_game_starts_from_the_hub() {
    let mut session = session_with_words("apple, banana").await;
    for kind in GameKind::ALL {
        session.select_game(kind).unwrap();
        assert_eq!(session.mode().game(), Some(kind));
        session.exit_to_hub().unwrap();
    }
    assert!(session.stats().is_none());
}

#[tokio::test]
async fn test_article_study_board_and_cloze() {
    let mut session = Session::with_seed(3);
    session.choose_path(LearningPath::Article).unwrap();
    session
        .submit_article("The comet crossed the sky. A comet is rare! Astronomers cheered.")
        .unwrap();
    if let Some(selection) = session.selection_mut() {
        selection.toggle_word("comet");
        selection.toggle_word("Astronomers");
    }
    session
        .study_selection(&MockEnrichmentClient::new())
        .await
        .unwrap();

    let Some((study, rng)) = session.study_mut() else {
        panic!("expected study");
    };
    assert_eq!(study.state(), &StudyState::Ready);
    let context = study.current_context().unwrap();
    assert!(context.iter().any(|s| s.highlighted && s.text == "comet"));

    study.set_view(StudyView::Matching, rng).unwrap();
    let board = study.board_mut().unwrap();
    let slots = board.slots().to_vec();
    let first = slots.iter().position(Option::is_some).unwrap();
    let key = slots[first].as_ref().unwrap().pair_key.clone();
    let second = (0..slots.len())
        .find(|&i| i != first && slots[i].as_ref().is_some_and(|t| t.pair_key == key))
        .unwrap();

    board.tap(first);
    let SlotTap::Matched { first, second, .. } = board.tap(second) else {
        panic!("expected a match");
    };
    board.clear_match(first, second, rng);
    assert_eq!(board.match_count(), 1);

    study.set_view(StudyView::Cloze, rng).unwrap();
    let cloze = study.cloze_mut().unwrap();
    let answers: Vec<(usize, String)> = cloze
        .blanks()
        .iter()
        .map(|&t| (t, cloze.tokens()[t].text.to_uppercase()))
        .collect();
    assert_eq!(answers.len(), 3);
    for (token, word) in &answers {
        assert!(cloze.fill(*token, word));
    }
    assert!(cloze.check().unwrap().iter().all(|r| r.is_correct()));
}

#[tokio::test]
async fn test_failed_study_data_shows_failure() {
    let mut session = Session::with_seed(3);
    session.choose_path(LearningPath::Article).unwrap();
    session
        .submit_article("Tides rise and fall with the moon.")
        .unwrap();
    if let Some(selection) = session.selection_mut() {
        selection.toggle_word("tides");
    }
    session
        .study_selection(&MockEnrichmentClient::new().with_failure("overloaded"))
        .await
        .unwrap();

    let Screen::ArticleStudy(study) = session.screen() else {
        panic!("expected study");
    };
    assert!(matches!(study.state(), StudyState::Failed(msg) if msg.contains("overloaded")));
    assert!(session.last_error().is_some());
}

#[tokio::test]
async fn test_library_on_disk_feeds_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let ai = MockEnrichmentClient::new();
    let library = WordLibrary::new(
        Arc::new(JsonFileStore::<WordGroup>::in_dir(dir.path(), LIBRARY_FILE)),
        Arc::new(ai.clone()),
    );
    let group = library.create("Travel", "passport, ticket").await.unwrap();
    library.append_words(group.id, "visa, Ticket").await.unwrap();

    let reopened: JsonFileStore<WordGroup> = JsonFileStore::in_dir(dir.path(), LIBRARY_FILE);
    let groups = reopened.list().await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].words.len(), 3);

    let mut session = Session::with_seed(5);
    session.choose_path(LearningPath::Custom).unwrap();
    session.open_library().unwrap();
    session.play_group(groups[0].words.clone()).unwrap();
    session.finish_flashcards().unwrap();
    session.select_game(GameKind::Scramble).unwrap();
    assert_eq!(session.words()[2].word, "visa");
}

#[tokio::test]
async fn test_story_saved_through_the_app() {
    let stories: Arc<MemoryStore<SavedStory>> = Arc::new(MemoryStore::new());
    let mut app = App::with_services(
        AppServices {
            ai: Arc::new(MockEnrichmentClient::new()),
            groups: Arc::new(MemoryStore::new()),
            stories: stories.clone(),
            speech: Box::new(MockSpeech::new()),
        },
        Session::with_seed(1),
        "en-US".to_string(),
    );

    for line in ["custom", "apple, pear", "games", "story", "style 3", "generate"] {
        app.handle(line).await;
    }
    let out = app.handle("save").await;
    assert!(out.iter().any(|l| l.starts_with("Saved")));

    let saved = stories.list().await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].style, "Sci-Fi (科幻)");
    assert_eq!(saved[0].related_words, vec!["apple", "pear"]);

    app.handle("stories").await;
    app.handle("delete 1").await;
    assert!(stories.list().await.unwrap().is_empty());
    let Screen::StoryGenerator(desk) = app.session().screen() else {
        panic!("expected story desk");
    };
    assert!(desk.draft().is_none());
}

#[tokio::test]
async fn test_gemini_client_drives_a_session() {
    let server = MockServer::start().await;
    let records = vec![synthetic_record("ephemeral"), synthetic_record("lucid")];
    let body = serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": serde_json::to_string(&records).unwrap() }]
            }
        }]
    });
    Mock::given(method("POST"))
        .and(path("/v1beta/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiEnrichmentClient::new("key".to_string(), "test-model".to_string())
        .with_base_url(server.uri());
    let mut session = Session::with_seed(2);
    session.choose_path(LearningPath::Custom).unwrap();
    session.submit_words("ephemeral\nlucid", &client).await.unwrap();

    assert_eq!(session.mode(), Mode::Flashcard);
    assert_eq!(session.words(), records.as_slice());
}

#[tokio::test]
async fn test_gemini_failure_leaves_setup_intact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = GeminiEnrichmentClient::new("key".to_string(), "test-model".to_string())
        .with_base_url(server.uri())
        .with_retries(0, std::time::Duration::ZERO);
    let mut session = Session::with_seed(2);
    session.choose_path(LearningPath::Custom).unwrap();

    let err = session.submit_words("ephemeral", &client).await.unwrap_err();
    assert!(err.is_enrichment_failure());
    assert_eq!(session.mode(), Mode::Setup);
    assert!(session.words().is_empty());

    let direct = client.enrich(&["x".to_string()]).await;
    assert!(matches!(direct, Err(Error::AiProvider(_))));
}
