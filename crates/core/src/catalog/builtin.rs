//! Embedded mission table about artificial-intelligence concepts.

use crate::model::{Difficulty, QuestionDraft, QuestionId};

struct Entry {
    id: u32,
    title: &'static str,
    prompt: &'static str,
    concept: &'static str,
    options: &'static [(&'static str, &'static str)],
    answer: &'static str,
    hints: &'static [&'static str],
    explanation: &'static str,
    category: &'static str,
    difficulty: Difficulty,
    objectives: &'static [&'static str],
}

const MISSIONS: &[Entry] = &[
    // ─── Phases of AI ───
    Entry {
        id: 1,
        title: "Mission 1: The Machine that Learns (ML)",
        prompt: "A machine looks at many past examples, like photos of cats and dogs, to guess what comes next. Which kind of AI uses past data to learn and make predictions?",
        concept: "AI that learns from examples",
        options: &[
            ("Machine Learning", "Like learning from your mistakes: the machine studies many examples on its own."),
            ("Deep Learning", "Machine learning with many stacked layers, like a giant brain."),
            ("Generative AI", "This AI creates new things instead of learning to predict from the past."),
        ],
        answer: "Machine Learning",
        hints: &["Think about examples from the past", "It does not create new things"],
        explanation: "Machine learning is the base of modern AI: models learn patterns from historical data.",
        category: "ai_phases",
        difficulty: Difficulty::Easy,
        objectives: &["Understand basic ML", "Tell AI families apart"],
    },
    Entry {
        id: 2,
        title: "Mission 2: The Machine's Brain (DL)",
        prompt: "A giant brain looks at thousands of photos to find tiny details humans miss. Which kind of AI uses many layers to understand complicated things?",
        concept: "AI with a many-layered brain",
        options: &[
            ("Simple Neural Network", "A small brain that cannot see very complicated patterns."),
            ("Deep Learning", "A brain with many layers that finds hidden patterns in large data."),
            ("Artificial General Intelligence", "AI in general, not the layered kind."),
        ],
        answer: "Deep Learning",
        hints: &["Many layers", "Like a giant brain"],
        explanation: "Deep learning uses deep neural networks, inspired by the brain, to process complex information.",
        category: "ai_phases",
        difficulty: Difficulty::Easy,
        objectives: &["Understand deep learning", "Understand neural networks"],
    },
    Entry {
        id: 3,
        title: "Mission 3: The Creative Machine (GenAI)",
        prompt: "You ask a machine to draw an animal that never existed or write a brand-new story. Which kind of AI creates new things that look human-made?",
        concept: "AI that invents new things",
        options: &[
            ("Deep Learning", "Analyzes and understands things but does not create them."),
            ("Generative AI", "Like a magical artist: creates drawings, stories and music."),
            ("Machine Learning", "Learns from examples but does not invent new things."),
        ],
        answer: "Generative AI",
        hints: &["It creates new things", "Like an artist"],
        explanation: "Generative AI learns patterns well enough to produce original images, text and sound.",
        category: "ai_phases",
        difficulty: Difficulty::Easy,
        objectives: &["Understand generative AI"],
    },
    // ─── Taxonomy ───
    Entry {
        id: 4,
        title: "Mission 4: Quick Reaction (Reactive)",
        prompt: "A guard robot sees danger and reacts instantly without remembering past dangers. Which kind of AI acts only on what it sees right now?",
        concept: "AI that reacts in the moment",
        options: &[
            ("Memory AI", "Remembers the past to decide."),
            ("Reactive AI", "Like a reflex: uses only current information."),
            ("Theory of Mind AI", "Understands what others feel; far more advanced."),
        ],
        answer: "Reactive AI",
        hints: &["No memory of the past", "Instant reaction"],
        explanation: "Reactive AI responds only to current stimuli with no stored history, like a reflex.",
        category: "ai_taxonomy",
        difficulty: Difficulty::Normal,
        objectives: &["Understand reactive AI"],
    },
    Entry {
        id: 5,
        title: "Mission 5: The Car that Remembers a Little (Limited Memory)",
        prompt: "A toy car remembers the last few seconds to avoid crashing into other cars. Which kind of AI keeps short-lived memories to decide better?",
        concept: "AI that remembers for a short while",
        options: &[
            ("Self-Aware AI", "Knows itself; very advanced."),
            ("Limited Memory AI", "Remembers recent events, like glancing back before crossing."),
            ("Theory of Mind AI", "Understands what others think; not what is needed here."),
        ],
        answer: "Limited Memory AI",
        hints: &["Remembers for a short time", "Like looking back"],
        explanation: "Limited memory AI keeps brief temporal context to improve immediate decisions.",
        category: "ai_taxonomy",
        difficulty: Difficulty::Normal,
        objectives: &["Understand limited memory", "Understand temporal state"],
    },
    Entry {
        id: 6,
        title: "Mission 6: The Robot Doctor (Expert Systems)",
        prompt: "A robot knows as much as a doctor about one illness and follows special rules to decide. Which kind of AI copies a human expert using rules?",
        concept: "AI that imitates experts",
        options: &[
            ("Language Understanding", "Understands what you say, but is not a doctor."),
            ("Expert Systems", "Encodes how experts think as rules."),
            ("Computer Vision", "Looks at images and video."),
        ],
        answer: "Expert Systems",
        hints: &["Special rules", "Like a robot doctor"],
        explanation: "Expert systems encode human expert knowledge as rules to solve narrow problems.",
        category: "ai_taxonomy",
        difficulty: Difficulty::Normal,
        objectives: &["Understand expert systems"],
    },
    // ─── Learning types ───
    Entry {
        id: 7,
        title: "Mission 7: Learning with Help (Supervised)",
        prompt: "You teach a machine to spot junk mail by giving it examples already marked as junk or not. Which learning uses examples with known answers?",
        concept: "Learning from labelled answers",
        options: &[
            ("Unsupervised Learning", "Finds patterns alone without answers."),
            ("Supervised Learning", "Like studying with a teacher who has the answers."),
            ("Reinforcement Learning", "Learns by trial, reward and punishment."),
        ],
        answer: "Supervised Learning",
        hints: &["Correct answers are known", "Studying with a teacher"],
        explanation: "Supervised learning trains predictive models on labelled data.",
        category: "learning_types",
        difficulty: Difficulty::Normal,
        objectives: &["Understand supervised learning"],
    },
    Entry {
        id: 8,
        title: "Mission 8: Secret Groups (Unsupervised)",
        prompt: "You want to group friends by how they play, but nobody says which groups exist. Which learning lets the machine discover hidden groups on its own?",
        concept: "Discovering hidden patterns",
        options: &[
            ("Supervised Learning", "Needs the answers in advance."),
            ("Unsupervised Learning", "Finds groups and structure with no labels."),
            ("Reinforcement Learning", "Learns from rewards, not from grouping."),
        ],
        answer: "Unsupervised Learning",
        hints: &["No labels", "Groups appear by themselves"],
        explanation: "Unsupervised learning discovers structure such as clusters in unlabelled data.",
        category: "learning_types",
        difficulty: Difficulty::Normal,
        objectives: &["Understand clustering"],
    },
    Entry {
        id: 9,
        title: "Mission 9: Learning by Playing (Reinforcement)",
        prompt: "A robot learns a video game by trying moves and collecting points or losing lives. Which learning improves through rewards and penalties?",
        concept: "Learning from rewards",
        options: &[
            ("Reinforcement Learning", "Trial and error guided by rewards."),
            ("Supervised Learning", "Learns from labelled examples."),
            ("Unsupervised Learning", "Finds groups without feedback."),
        ],
        answer: "Reinforcement Learning",
        hints: &["Points and penalties", "Trial and error"],
        explanation: "Reinforcement learning agents maximise cumulative reward by interacting with an environment.",
        category: "learning_types",
        difficulty: Difficulty::Hard,
        objectives: &["Understand reward-driven learning"],
    },
    // ─── Model metrics ───
    Entry {
        id: 10,
        title: "Mission 10: Missing No Problems (Recall)",
        prompt: "A disease detector must catch every sick patient, even at the cost of some false alarms. Which metric measures how many real positives were found?",
        concept: "Catching every positive",
        options: &[
            ("Precision", "Of the alarms raised, how many were right."),
            ("Recall", "Of the real positives, how many were caught."),
            ("Accuracy", "Overall share of right answers."),
        ],
        answer: "Recall",
        hints: &["Do not let any case slip", "Real positives found"],
        explanation: "Recall (sensitivity) is TP / (TP + FN): the share of actual positives detected.",
        category: "ml_metrics",
        difficulty: Difficulty::Hard,
        objectives: &["Tell recall from precision"],
    },
    Entry {
        id: 11,
        title: "Mission 11: Annoying False Alarms (Precision)",
        prompt: "A spam filter should almost never flag a real email as spam. Which metric measures how many flagged items were truly positive?",
        concept: "Trusting the alarms",
        options: &[
            ("Precision", "Of the flagged items, how many were truly positive."),
            ("Recall", "How many positives were found overall."),
            ("F1 Score", "Balances precision and recall."),
        ],
        answer: "Precision",
        hints: &["Fewer false alarms", "Trust what is flagged"],
        explanation: "Precision is TP / (TP + FP): the share of positive predictions that were right.",
        category: "ml_metrics",
        difficulty: Difficulty::Hard,
        objectives: &["Understand precision"],
    },
    Entry {
        id: 12,
        title: "Mission 12: Choosing What Matters (Lasso)",
        prompt: "A model has too many variables and you want it to drop the useless ones automatically. Which regression pushes some coefficients exactly to zero?",
        concept: "Regularisation that selects variables",
        options: &[
            ("Lasso Regression (L1)", "L1 penalty can zero out coefficients."),
            ("Ridge Regression (L2)", "L2 penalty shrinks but rarely zeroes coefficients."),
            ("Logistic Regression", "Classifies yes/no outcomes."),
        ],
        answer: "Lasso Regression (L1)",
        hints: &["Some weights become exactly zero", "Absolute-value penalty"],
        explanation: "Lasso adds an L1 penalty, which performs feature selection by zeroing coefficients.",
        category: "ml_algorithms",
        difficulty: Difficulty::Expert,
        objectives: &["Understand L1 regularisation"],
    },
];

/// Drafts for every embedded mission, in declared order.
pub(crate) fn drafts() -> Vec<QuestionDraft> {
    MISSIONS
        .iter()
        .map(|entry| QuestionDraft {
            id: QuestionId::new(entry.id),
            title: entry.title.to_string(),
            prompt: entry.prompt.to_string(),
            concept: entry.concept.to_string(),
            options: entry
                .options
                .iter()
                .map(|(label, text)| ((*label).to_string(), (*text).to_string()))
                .collect(),
            correct_option: entry.answer.to_string(),
            hints: entry.hints.iter().map(|h| (*h).to_string()).collect(),
            explanation: Some(entry.explanation.to_string()),
            category: entry.category.to_string(),
            difficulty: entry.difficulty,
            learning_objectives: entry.objectives.iter().map(|o| (*o).to_string()).collect(),
        })
        .collect()
}
