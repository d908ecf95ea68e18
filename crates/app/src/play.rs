use std::io::Write;

use quiz_core::model::QuestionRecord;
use services::{AnswerFeedback, ProgressService, QuizSession, SessionReport};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::SavePolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Next,
    Hint,
    Retry,
    Save,
    Stats,
    Help,
    Quit,
}

impl Command {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "" | "n" | "next" => Some(Self::Next),
            "h" | "hint" => Some(Self::Hint),
            "r" | "retry" => Some(Self::Retry),
            "s" | "save" => Some(Self::Save),
            "p" | "stats" => Some(Self::Stats),
            "?" | "help" => Some(Self::Help),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Options in menu order, each paired with the letter the player types.
fn lettered_options(question: &QuestionRecord) -> impl Iterator<Item = (char, &str)> {
    ('A'..='Z').zip(question.options().keys().map(String::as_str))
}

/// Map player input to an option key, by menu letter or by the option's own
/// name, ignoring case.
fn resolve_choice<'q>(question: &'q QuestionRecord, input: &str) -> Option<&'q str> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let mut letter = [0; 4];
    lettered_options(question)
        .find(|(l, key)| {
            input.eq_ignore_ascii_case(l.encode_utf8(&mut letter)) || key.eq_ignore_ascii_case(input)
        })
        .map(|(_, key)| key)
}

/// Run the interactive loop until the catalog is exhausted, the player quits,
/// or stdin closes. An explicit save switches `policy` to saving on exit.
pub(crate) async fn play(
    session: &mut QuizSession,
    progress: &ProgressService,
    policy: &mut SavePolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_help();

    let mut shown = None;
    while !session.is_finished() {
        let position = session.progress().position;
        if shown != Some(position) {
            print_question(session);
            shown = Some(position);
        }

        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        // Option choices take precedence over commands.
        let choice = session
            .current_question()
            .and_then(|q| resolve_choice(q, &line))
            .map(str::to_owned);
        if let Some(key) = choice {
            match session.submit_answer(&key) {
                Ok(feedback) => print_feedback(session, &feedback),
                Err(err) => println!("{err}"),
            }
            continue;
        }

        match Command::parse(&line) {
            Some(Command::Next) => {
                if let Err(err) = session.advance() {
                    println!("{err}");
                }
            }
            Some(Command::Hint) => match session.reveal_hint() {
                Ok(Some(hint)) => println!("Hint: {hint}"),
                Ok(None) => println!("No more hints for this mission."),
                Err(err) => println!("{err}"),
            },
            Some(Command::Retry) => match session.retry_current() {
                Ok(()) => println!("Try again."),
                Err(err) => println!("{err}"),
            },
            Some(Command::Save) => match progress.save(session).await {
                Ok(saved_at) => {
                    *policy = SavePolicy::OnExit;
                    println!("Progress saved at {saved_at}.");
                }
                Err(err) => println!("Save failed: {err}"),
            },
            Some(Command::Stats) => print_stats(session),
            Some(Command::Help) => print_help(),
            Some(Command::Quit) => break,
            None => println!("Unrecognised input {:?}; type ? for help.", line.trim()),
        }
    }

    Ok(())
}

fn print_help() {
    println!();
    println!("Answer with an option letter (A, B, ...) or its name. Other commands:");
    println!("  h hint    r retry    n / Enter next    p stats    s save    q quit    ? help");
}

fn print_question(session: &QuizSession) {
    let Some(question) = session.current_question() else {
        return;
    };
    let progress = session.progress();
    println!();
    println!(
        "Mission {}/{} [{} - {}]",
        progress.position + 1,
        progress.total,
        question.category(),
        question.difficulty()
    );
    println!("{}", question.title());
    println!("{}", question.prompt());
    for (letter, key) in lettered_options(question) {
        println!("  {letter}) {key}");
    }
    if session.hints_available() && !question.hints().is_empty() {
        println!("({} hints available)", question.hints().len());
    }
}

fn print_feedback(session: &QuizSession, feedback: &AnswerFeedback) {
    if feedback.correct {
        println!("Correct! {}", feedback.option_explanation);
    } else {
        println!(
            "Not quite. {} The answer was {}.",
            feedback.option_explanation, feedback.correct_option
        );
    }
    if let Some(explanation) = &feedback.explanation {
        println!("{explanation}");
    }
    println!(
        "Time {:.1}s, streak {}.",
        feedback.time_taken_seconds, feedback.streak
    );
    for def in &feedback.new_achievements {
        println!(
            "Achievement unlocked: {} ({}, +{} points)",
            def.display_name(),
            def.rarity(),
            def.points()
        );
    }

    if session.can_retry() {
        println!("Type r to retry, or press Enter to continue.");
    } else if feedback.is_last {
        println!("Press Enter to finish.");
    } else {
        println!("Press Enter for the next mission.");
    }
}

fn print_stats(session: &QuizSession) {
    let metrics = session.metrics();
    let achievements = session.achievements();
    println!(
        "Answered {} ({} correct), accuracy {:.0}%, streak {} (best {}), tier {}.",
        metrics.total_answered(),
        metrics.total_correct(),
        metrics.accuracy() * 100.0,
        metrics.current_streak(),
        metrics.best_streak(),
        metrics.mastery_tier()
    );
    println!(
        "Achievements {}/{}, {} points.",
        achievements.unlocked_ids().len(),
        achievements.definitions().len(),
        achievements.total_points()
    );
}

pub(crate) fn print_summary(report: &SessionReport) {
    let perf = &report.performance;
    println!();
    println!("Session summary ({} mode)", report.mode);
    println!(
        "  answered {} of {} missions, {} correct",
        report.answered, report.questions_total, report.correct
    );
    println!(
        "  accuracy {:.0}% ({}), best streak {}",
        perf.accuracy * 100.0,
        report.mastery_tier,
        perf.best_streak
    );
    println!(
        "  average time {:.1}s, time efficiency {:.2}, hint efficiency {:.2}",
        perf.average_time, perf.time_efficiency, perf.hint_efficiency
    );
    println!(
        "  consistency {:.2}, learning velocity {:+.2}",
        perf.consistency, perf.learning_velocity
    );
    for category in &report.categories {
        if let Some(accuracy) = category.accuracy() {
            println!(
                "  {}: {}/{} ({:.0}%)",
                category.category,
                category.correct,
                category.answered,
                accuracy * 100.0
            );
        }
    }
    if report.achievements.is_empty() {
        println!("  no achievements yet");
    } else {
        for earned in &report.achievements {
            println!("  * {} ({}, {} points)", earned.name, earned.rarity, earned.points);
        }
    }
    println!("  total points {}", report.total_points);
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::catalog::QuestionCatalog;
    use quiz_core::learning::LearningMode;
    use quiz_core::metrics::MetricsConfig;
    use quiz_core::time::fixed_clock;

    fn new_session() -> QuizSession {
        let catalog = QuestionCatalog::builtin().unwrap();
        QuizSession::new(catalog, MetricsConfig::default(), LearningMode::Study, fixed_clock())
            .unwrap()
    }

    #[test]
    fn menu_letter_answers_the_current_mission() {
        let mut session = new_session();
        let question = session.current_question().unwrap();
        let correct = question.correct_option().to_owned();
        let letter = lettered_options(question)
            .find(|(_, key)| *key == correct)
            .map(|(letter, _)| letter.to_ascii_lowercase().to_string())
            .unwrap();

        let key = resolve_choice(question, &letter).unwrap().to_owned();
        assert_eq!(key, correct);

        let feedback = session.submit_answer(&key).unwrap();
        assert!(feedback.correct);
        assert_eq!(session.history().len(), 1);
        assert!(session.advance().is_ok());
    }

    #[test]
    fn option_name_is_accepted_in_any_case() {
        let session = new_session();
        let question = session.current_question().unwrap();
        let correct = question.correct_option();
        let typed = format!("  {}  ", correct.to_uppercase());
        assert_eq!(resolve_choice(question, &typed), Some(correct));
    }

    #[test]
    fn menu_letters_do_not_shadow_commands() {
        let session = new_session();
        for question in session.catalog().iter() {
            for input in ["", "n", "h", "r", "s", "p", "q", "?"] {
                assert_eq!(resolve_choice(question, input), None, "{input:?}");
            }
            assert!(resolve_choice(question, "Z").is_none());
        }
    }

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(Command::parse(""), Some(Command::Next));
        assert_eq!(Command::parse(" Hint "), Some(Command::Hint));
        assert_eq!(Command::parse("r"), Some(Command::Retry));
        assert_eq!(Command::parse("?"), Some(Command::Help));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
        assert_eq!(Command::parse("maybe"), None);
    }
}
