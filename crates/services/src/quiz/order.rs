use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::catalog::QuestionCatalog;
use quiz_core::learning::QuestionOrder;
use quiz_core::metrics::{CategoryAccuracy, category_accuracy};
use quiz_core::model::{AnswerEvent, QuestionId};

/// Build the play order for a run over `catalog`.
///
/// `history` only matters for `WeakestFirst`, which serves categories with the
/// lowest accuracy first. Unanswered categories count as weakest; ties keep
/// catalog order.
pub(crate) fn plan_order(
    catalog: &QuestionCatalog,
    order: QuestionOrder,
    history: &[AnswerEvent],
) -> Vec<QuestionId> {
    match order {
        QuestionOrder::Sequential => catalog.ids(),
        QuestionOrder::Random => {
            let mut ids = catalog.ids();
            ids.shuffle(&mut rng());
            ids
        }
        QuestionOrder::WeakestFirst => {
            let mut rows = category_accuracy(history, catalog);
            rows.sort_by(|a, b| weakness_key(a).total_cmp(&weakness_key(b)));
            rows.iter()
                .flat_map(|row| catalog.by_category(&row.category).map(|q| q.id()))
                .collect()
        }
    }
}

fn weakness_key(row: &CategoryAccuracy) -> f64 {
    row.accuracy().unwrap_or(-1.0)
}
