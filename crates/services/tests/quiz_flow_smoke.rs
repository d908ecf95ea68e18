use chrono::Duration;
use quiz_core::catalog::QuestionCatalog;
use quiz_core::learning::LearningMode;
use quiz_core::metrics::{MasteryTier, MetricsConfig};
use quiz_core::time::fixed_now;
use services::{Clock, QuizSession};

fn play_through(mode: LearningMode, mut answer_correctly: impl FnMut(usize) -> bool) -> QuizSession {
    let catalog = QuestionCatalog::builtin().unwrap();
    let mut session =
        QuizSession::new(catalog, MetricsConfig::default(), mode, Clock::fixed(fixed_now())).unwrap();

    let mut turn = 0;
    while !session.is_finished() {
        let question = session.current_question().unwrap();
        let label = if answer_correctly(turn) {
            question.correct_option().to_string()
        } else {
            question
                .options()
                .keys()
                .find(|k| k.as_str() != question.correct_option())
                .unwrap()
                .clone()
        };
        session.clock_mut().advance(Duration::seconds(12));
        session.submit_answer(&label).unwrap();
        session.advance().unwrap();
        turn += 1;
    }
    session
}

#[test]
fn perfect_study_run_earns_the_expected_achievements() {
    let session = play_through(LearningMode::Study, |_| true);
    let metrics = session.metrics();

    assert_eq!(metrics.total_answered() as usize, session.catalog().len());
    assert_eq!(metrics.best_streak(), metrics.total_answered());
    assert_eq!(metrics.mastery_tier(), MasteryTier::Expert);
    assert_eq!(metrics.time_efficiency(), 1.0);

    for id in ["first_victory", "accuracy_master", "perfectionist", "efficient", "consistent"] {
        assert!(session.achievements().is_unlocked(id), "{id} locked");
    }
    assert!(!session.achievements().is_unlocked("scholar"));
    assert!(!session.achievements().is_unlocked("speed_demon"));
}

#[test]
fn slipping_run_reports_negative_velocity() {
    let session = play_through(LearningMode::Study, |turn| turn < 6 || turn % 2 == 0);
    let metrics = session.metrics();

    assert_eq!(metrics.total_answered(), 12);
    assert_eq!(metrics.total_correct(), 9);
    assert!(metrics.learning_velocity() < 0.0);

    let report = session.report();
    assert_eq!(report.correct, 9);
    assert_eq!(report.mastery_tier, MasteryTier::Intermediate);
    assert_eq!(report.elapsed_seconds, 144.0);
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["mode"], "study");
    assert_eq!(json["performance"]["best_streak"], 7);
}

#[test]
fn quiz_mode_serves_every_question_once() {
    let session = play_through(LearningMode::Quiz, |_| true);
    let mut served: Vec<_> = session.history().iter().map(|e| e.question_id).collect();
    served.sort();
    let mut expected = session.catalog().ids();
    expected.sort();
    assert_eq!(served, expected);
}
