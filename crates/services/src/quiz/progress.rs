/// Aggregated view of quiz progress, useful for a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    /// Zero-based index of the question being played.
    pub position: usize,
    pub total: usize,
    /// Questions whose turn has at least one submitted answer.
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}
