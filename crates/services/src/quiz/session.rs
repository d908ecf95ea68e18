use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use quiz_core::achievements::{
    AchievementDefinition, AchievementEngine, AchievementProgress, builtin_achievements,
};
use quiz_core::catalog::QuestionCatalog;
use quiz_core::learning::{DifficultyAdvisor, LearningMode, ModeSettings};
use quiz_core::metrics::{MetricsConfig, SessionMetrics, category_accuracy};
use quiz_core::model::{AnswerEvent, QuestionId, QuestionRecord};
use quiz_core::session::SessionState;
use quiz_core::time::seconds_between;
use quiz_core::{Clock, InvalidInputError};
use storage::ProgressSnapshot;

use super::order::plan_order;
use super::progress::QuizProgress;
use crate::error::QuizError;
use crate::report::{EarnedAchievement, SessionReport};

//
// ─── ANSWER FEEDBACK ───────────────────────────────────────────────────────────
//

/// What the player sees right after submitting an answer.
#[derive(Debug, Clone)]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub correct: bool,
    pub selected: String,
    pub correct_option: String,
    /// Explanatory text attached to the selected option.
    pub option_explanation: String,
    /// Question-level explanation, shown for wrong answers and in detailed modes.
    pub explanation: Option<String>,
    pub time_taken_seconds: f64,
    pub streak: u32,
    pub new_achievements: Vec<AchievementDefinition>,
    pub is_last: bool,
}

//
// ─── TURN ──────────────────────────────────────────────────────────────────────
//

/// Per-question state; replaced whenever the quiz moves to another question.
#[derive(Debug, Clone)]
struct Turn {
    started_at: DateTime<Utc>,
    hints_revealed: usize,
    attempts: u32,
    last_correct: Option<bool>,
    retry_open: bool,
}

impl Turn {
    fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            hints_revealed: 0,
            attempts: 0,
            last_correct: None,
            retry_open: false,
        }
    }

    fn accepts_answer(&self) -> bool {
        self.attempts == 0 || self.retry_open
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through over a question catalog.
///
/// Owns the answer history, the achievement state and the question order, and
/// steps through the catalog one question at a time. All timestamps come from
/// the session's `Clock`.
pub struct QuizSession {
    session_id: Uuid,
    catalog: QuestionCatalog,
    mode: LearningMode,
    settings: ModeSettings,
    advisor: DifficultyAdvisor,
    clock: Clock,
    state: SessionState,
    achievements: AchievementEngine,
    order: Vec<QuestionId>,
    position: usize,
    turn: Turn,
}

impl QuizSession {
    /// Start a session with the built-in achievement table.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyCatalog` for an empty catalog.
    pub fn new(
        catalog: QuestionCatalog,
        config: MetricsConfig,
        mode: LearningMode,
        clock: Clock,
    ) -> Result<Self, QuizError> {
        let rules = builtin_achievements(catalog.len());
        Self::with_achievements(catalog, rules, config, mode, clock)
    }

    /// Start a session with a custom achievement table.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyCatalog` for an empty catalog and
    /// `QuizError::Catalog` if the rule table has duplicate or blank ids.
    pub fn with_achievements(
        catalog: QuestionCatalog,
        rules: Vec<AchievementDefinition>,
        config: MetricsConfig,
        mode: LearningMode,
        clock: Clock,
    ) -> Result<Self, QuizError> {
        if catalog.is_empty() {
            return Err(QuizError::EmptyCatalog);
        }
        let achievements = AchievementEngine::new(rules)?;
        let settings = mode.settings();
        let now = clock.now();
        let order = plan_order(&catalog, settings.question_order, &[]);
        info!(%mode, questions = catalog.len(), "quiz session started");

        Ok(Self {
            session_id: Uuid::new_v4(),
            catalog,
            mode,
            settings,
            advisor: DifficultyAdvisor::default(),
            clock,
            state: SessionState::new(config, now),
            achievements,
            order,
            position: 0,
            turn: Turn::new(now),
        })
    }

    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    #[must_use]
    pub fn mode(&self) -> LearningMode {
        self.mode
    }

    #[must_use]
    pub fn settings(&self) -> &ModeSettings {
        &self.settings
    }

    #[must_use]
    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Mutable access to the clock, e.g. to advance a fixed clock in tests.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    #[must_use]
    pub fn metrics(&self) -> &SessionMetrics {
        self.state.metrics()
    }

    #[must_use]
    pub fn history(&self) -> &[AnswerEvent] {
        self.state.history()
    }

    #[must_use]
    pub fn achievements(&self) -> &AchievementEngine {
        &self.achievements
    }

    /// Question order for this run.
    #[must_use]
    pub fn order(&self) -> &[QuestionId] {
        &self.order
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.current_id().and_then(|id| self.catalog.get(id))
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.position >= self.order.len()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.order.len();
        let current_answered = !self.is_finished() && self.turn.attempts > 0;
        let answered = self.position.min(total) + usize::from(current_answered);
        QuizProgress {
            position: self.position.min(total),
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.is_finished(),
        }
    }

    /// Number of hints already shown for the current question.
    #[must_use]
    pub fn hints_revealed(&self) -> usize {
        self.turn.hints_revealed
    }

    /// Whether the current mode offers hints at the player's present accuracy.
    #[must_use]
    pub fn hints_available(&self) -> bool {
        let metrics = self.state.metrics();
        self.advisor
            .hints_available(&self.settings, metrics.accuracy(), metrics.total_answered())
    }

    /// Show the next hint of the current question.
    ///
    /// Returns `None` once every hint has been shown. Revealing any hint marks
    /// the next submission as hint-assisted.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` after the last question,
    /// `QuizError::HintsDisabled` when the mode withholds hints and
    /// `QuizError::AlreadyAnswered` when no answer is pending.
    pub fn reveal_hint(&mut self) -> Result<Option<&str>, QuizError> {
        let id = self.current_id().ok_or(QuizError::Completed)?;
        if !self.hints_available() {
            return Err(QuizError::HintsDisabled);
        }
        if !self.turn.accepts_answer() {
            return Err(QuizError::AlreadyAnswered(id));
        }
        let question = self.catalog.require(id)?;
        let Some(hint) = question.hints().get(self.turn.hints_revealed) else {
            return Ok(None);
        };
        self.turn.hints_revealed += 1;
        debug!(question = %id, revealed = self.turn.hints_revealed, "hint revealed");
        Ok(Some(hint.as_str()))
    }

    /// Answer the current question, timing it from when the question was shown.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` after the last question,
    /// `QuizError::AlreadyAnswered` unless a retry is open, and
    /// `QuizError::InvalidInput` for a label the question does not offer.
    pub fn submit_answer(&mut self, label: &str) -> Result<AnswerFeedback, QuizError> {
        self.submit(label, None)
    }

    /// Answer the current question with a host-measured duration.
    ///
    /// # Errors
    ///
    /// As [`QuizSession::submit_answer`], plus `QuizError::InvalidInput` for a
    /// negative or non-finite duration.
    pub fn submit_answer_timed(
        &mut self,
        label: &str,
        time_taken_seconds: f64,
    ) -> Result<AnswerFeedback, QuizError> {
        self.submit(label, Some(time_taken_seconds))
    }

    fn submit(&mut self, label: &str, time_taken: Option<f64>) -> Result<AnswerFeedback, QuizError> {
        let id = self.current_id().ok_or(QuizError::Completed)?;
        if !self.turn.accepts_answer() {
            return Err(QuizError::AlreadyAnswered(id));
        }

        let question = self.catalog.require(id)?;
        let correct = question.is_correct(label)?;
        let now = self.clock.now();
        let time_taken = time_taken.unwrap_or_else(|| seconds_between(self.turn.started_at, now));
        let hint_used = self.turn.hints_revealed > 0;
        let retried = self.turn.attempts > 0;

        self.state
            .record_answer(id, correct, time_taken, hint_used, retried, now)?;
        self.turn.attempts += 1;
        self.turn.last_correct = Some(correct);
        self.turn.retry_open = false;

        let new_achievements = self
            .achievements
            .check(self.state.metrics(), self.state.history());
        for def in &new_achievements {
            info!(
                achievement = %def.id(),
                points = def.points(),
                rarity = %def.rarity(),
                "achievement unlocked"
            );
        }

        let metrics = self.state.metrics();
        debug!(
            question = %id,
            correct,
            time_taken,
            hint_used,
            retried,
            streak = metrics.current_streak(),
            "answer recorded"
        );

        let explanation = if self.settings.detailed_explanations || !correct {
            question.explanation().map(str::to_string)
        } else {
            None
        };

        Ok(AnswerFeedback {
            question_id: id,
            correct,
            selected: label.to_string(),
            correct_option: question.correct_option().to_string(),
            option_explanation: question.option_text(label).unwrap_or_default().to_string(),
            explanation,
            time_taken_seconds: time_taken,
            streak: metrics.current_streak(),
            new_achievements,
            is_last: self.position + 1 >= self.order.len(),
        })
    }

    /// Whether [`QuizSession::retry_current`] would reopen the current question.
    #[must_use]
    pub fn can_retry(&self) -> bool {
        !self.is_finished()
            && self.turn.last_correct == Some(false)
            && !self.turn.retry_open
            && self
                .settings
                .retry_limit
                .is_none_or(|limit| self.turn.attempts.saturating_sub(1) < limit)
    }

    /// Reopen the current question after a wrong answer.
    ///
    /// The next submission is recorded with `retried = true` and timed from now.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotAnswered` before the first submission,
    /// `QuizError::AlreadyCorrect` after a correct one and
    /// `QuizError::RetryLimitReached` once the mode's retries are used up.
    pub fn retry_current(&mut self) -> Result<(), QuizError> {
        let id = self.current_id().ok_or(QuizError::Completed)?;
        match self.turn.last_correct {
            None => return Err(QuizError::NotAnswered(id)),
            Some(true) => return Err(QuizError::AlreadyCorrect(id)),
            Some(false) => {}
        }
        if self.turn.retry_open {
            return Ok(());
        }
        let retries_used = self.turn.attempts.saturating_sub(1);
        if let Some(limit) = self.settings.retry_limit.filter(|&limit| retries_used >= limit) {
            return Err(QuizError::RetryLimitReached {
                question_id: id,
                limit,
            });
        }
        self.turn.retry_open = true;
        self.turn.started_at = self.clock.now();
        debug!(question = %id, retries_used, "retry opened");
        Ok(())
    }

    /// Move to the next question. Returns it, or `None` when the run is over.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` after the last question and
    /// `QuizError::NotAnswered` if the current question has no answer yet.
    pub fn advance(&mut self) -> Result<Option<&QuestionRecord>, QuizError> {
        let id = self.current_id().ok_or(QuizError::Completed)?;
        if self.turn.attempts == 0 {
            return Err(QuizError::NotAnswered(id));
        }
        self.position += 1;
        self.turn = Turn::new(self.clock.now());
        if self.is_finished() {
            info!(
                answered = self.state.metrics().total_answered(),
                points = self.achievements.total_points(),
                "quiz completed"
            );
        }
        Ok(self.current_question())
    }

    /// Start over: clears history, metrics and achievements, draws a new order
    /// and a new session id.
    pub fn restart(&mut self) {
        let now = self.clock.now();
        self.state.reset(now);
        self.achievements.reset();
        self.order = plan_order(&self.catalog, self.settings.question_order, &[]);
        self.position = 0;
        self.turn = Turn::new(now);
        self.session_id = Uuid::new_v4();
        info!(mode = %self.mode, "quiz session restarted");
    }

    /// Fractional progress towards one achievement.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidInput` for an unknown achievement id.
    pub fn achievement_progress(&self, id: &str) -> Result<AchievementProgress, QuizError> {
        Ok(self
            .achievements
            .get_progress(id, self.state.metrics(), self.state.history())?)
    }

    /// Wall-clock seconds since the session (re)started.
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.state.elapsed_seconds(self.clock.now())
    }

    #[must_use]
    pub fn report(&self) -> SessionReport {
        let metrics = self.state.metrics();
        let now = self.clock.now();
        SessionReport {
            session_id: self.session_id,
            mode: self.mode,
            started_at: self.state.started_at(),
            generated_at: now,
            elapsed_seconds: self.state.elapsed_seconds(now),
            questions_total: self.order.len(),
            answered: metrics.total_answered(),
            correct: metrics.total_correct(),
            mastery_tier: metrics.mastery_tier(),
            performance: metrics.performance_report(),
            categories: category_accuracy(self.state.history(), &self.catalog),
            achievements: self
                .achievements
                .earned()
                .into_iter()
                .map(EarnedAchievement::from)
                .collect(),
            total_points: self.achievements.total_points(),
        }
    }

    /// Capture the persistable state, stamped with the clock's current time.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::new(
            self.state.metrics().clone(),
            self.state.history().to_vec(),
            self.achievements.unlocked_ids().clone(),
            self.clock.now(),
        )
    }

    /// Adopt a persisted snapshot.
    ///
    /// The history is authoritative and metrics are rebuilt from it. The run
    /// starts again from the first question of a freshly planned order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` if the history names a question missing from
    /// the catalog or carries an invalid duration, or if an unlocked id is not in
    /// the achievement table. The session is unchanged on error.
    pub fn restore(&mut self, snapshot: ProgressSnapshot) -> Result<(), InvalidInputError> {
        let ProgressSnapshot {
            metrics,
            history,
            unlocked_achievement_ids,
            ..
        } = snapshot;

        let mut checked = HashSet::new();
        for event in &history {
            if checked.insert(event.question_id) && !self.catalog.contains(event.question_id) {
                return Err(InvalidInputError::UnknownQuestion(event.question_id));
            }
        }

        if history.is_empty() && metrics.total_answered() > 0 {
            warn!(
                answered = metrics.total_answered(),
                "snapshot has no answer history; counters start from zero"
            );
        }

        let now = self.clock.now();
        let mut state = self.state.clone();
        state.restore(history, now)?;
        let mut achievements = self.achievements.clone();
        achievements.restore(unlocked_achievement_ids)?;

        self.order = plan_order(&self.catalog, self.settings.question_order, state.history());
        self.state = state;
        self.achievements = achievements;
        self.position = 0;
        self.turn = Turn::new(now);
        info!(
            answered = self.state.metrics().total_answered(),
            unlocked = self.achievements.unlocked_ids().len(),
            "progress restored"
        );
        Ok(())
    }

    fn current_id(&self) -> Option<QuestionId> {
        self.order.get(self.position).copied()
    }
}
