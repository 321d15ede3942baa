use std::sync::Arc;

use services::{
    Clock, Notification, QuizCatalogService, QuizLoopService, QuizResults, RecordingNotifier,
};
use storage::{Storage, StorageError};
use study_core::model::QuizId;
use study_core::quiz::{QuizEngine, QuizSessionError};
use study_core::time::fixed_now;

fn loop_service(
    storage: &Storage,
    notifier: Arc<RecordingNotifier>,
) -> (QuizLoopService, QuizCatalogService) {
    let results = QuizResults::new();
    let quiz_loop = QuizLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::clone(&storage.quizzes),
        notifier,
        results.clone(),
    );
    let catalog = QuizCatalogService::new(Arc::clone(&storage.quizzes), results);
    (quiz_loop, catalog)
}

#[tokio::test]
async fn full_quiz_run_records_one_result() {
    let storage = Storage::with_fixtures(Clock::fixed(fixed_now())).unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let (quiz_loop, catalog) = loop_service(&storage, notifier.clone());
    let mut engine = QuizEngine::new();

    let view = quiz_loop.start(&mut engine, QuizId::new(3)).await.unwrap();
    assert_eq!(view.title, "React Basics");
    assert_eq!(view.position_label(), "Question 1 / 2");
    assert!(!view.can_advance);

    // Nothing selected yet.
    let err = quiz_loop.advance(&mut engine).unwrap_err();
    assert!(matches!(
        err,
        services::QuizServiceError::Session(QuizSessionError::PrematureAdvance { question: 0 })
    ));

    engine.select_answer(0).unwrap();
    let step = quiz_loop.advance(&mut engine).unwrap();
    assert!(step.completed.is_none());
    assert_eq!(step.view.index, 1);
    assert_eq!(step.view.advance_label(), "Finish");

    engine.select_answer(2).unwrap();
    let done = quiz_loop.advance(&mut engine).unwrap();
    let score = done.completed.unwrap();
    assert_eq!((score.correct(), score.total(), score.percentage()), (1, 2, 50));
    assert!(done.view.is_terminal);

    // Advancing a finished quiz is rejected and does not notify again.
    assert!(quiz_loop.advance(&mut engine).is_err());
    let sent = notifier.drain();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].description(),
        "You scored 1 / 2 (50%) on React Basics."
    );
    assert!(matches!(&sent[0], Notification::QuizCompleted { quiz_id, .. } if *quiz_id == QuizId::new(3)));

    let result = quiz_loop.results().get(QuizId::new(3)).unwrap();
    assert_eq!(result.attempts, 1);
    assert_eq!(result.score.percentage(), 50);

    let cards = catalog.list_cards().await.unwrap();
    let react = cards.iter().find(|c| c.id == QuizId::new(3)).unwrap();
    assert_eq!(react.action_label(), "Retake Quiz");
    assert_eq!(react.score_percent, Some(50));
    let ml = cards.iter().find(|c| c.id == QuizId::new(1)).unwrap();
    assert_eq!(ml.action_label(), "Start Quiz");
}

#[tokio::test]
async fn retake_starts_fresh_attempt() {
    let storage = Storage::with_fixtures(Clock::fixed(fixed_now())).unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let (quiz_loop, _) = loop_service(&storage, notifier.clone());
    let mut engine = QuizEngine::new();

    quiz_loop.start(&mut engine, QuizId::new(2)).await.unwrap();
    engine.select_answer(1).unwrap();
    let first = quiz_loop.advance(&mut engine).unwrap();
    assert_eq!(first.completed.unwrap().percentage(), 100);
    let first_attempt = first.view.attempt_id;

    let view = quiz_loop.retake(&mut engine).unwrap();
    assert_eq!(view.index, 0);
    assert_eq!(view.selected, None);
    assert!(!view.is_terminal);
    assert_ne!(view.attempt_id, first_attempt);

    engine.select_answer(0).unwrap();
    let second = quiz_loop.advance(&mut engine).unwrap();
    assert_eq!(second.completed.unwrap().percentage(), 0);

    let result = quiz_loop.results().get(QuizId::new(2)).unwrap();
    assert_eq!(result.attempts, 2);
    assert_eq!(result.score.percentage(), 0);
    assert_eq!(notifier.drain().len(), 2);
}

#[tokio::test]
async fn unknown_quiz_and_exit() {
    let storage = Storage::with_fixtures(Clock::fixed(fixed_now())).unwrap();
    let (quiz_loop, _) = loop_service(&storage, Arc::new(RecordingNotifier::new()));
    let mut engine = QuizEngine::new();

    let err = quiz_loop.start(&mut engine, QuizId::new(99)).await.unwrap_err();
    assert!(matches!(
        err,
        services::QuizServiceError::Storage(StorageError::NotFound)
    ));
    assert!(!engine.is_active());

    quiz_loop.start(&mut engine, QuizId::new(1)).await.unwrap();
    quiz_loop.exit(&mut engine);
    assert!(!engine.is_active());
    assert!(matches!(
        quiz_loop.retake(&mut engine),
        Err(services::QuizServiceError::Session(QuizSessionError::NotStarted))
    ));
}
