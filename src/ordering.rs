use crate::types::{GroupAggregate, Measure, SortMode};
use std::cmp::Ordering;

/// Put aggregates into display order.
///
/// `AsEntered` follows `reference` (the user's selection order); entries of
/// `reference` without an aggregate are skipped and aggregates missing from
/// `reference` are appended in their incoming order. The other two modes are
/// stable sorts on `measure`, so ties keep their incoming order.
pub fn order(
    aggregates: Vec<GroupAggregate>,
    mode: SortMode,
    measure: Measure,
    reference: &[String],
) -> Vec<GroupAggregate> {
    match mode {
        SortMode::AsEntered => {
            let mut remaining: Vec<Option<GroupAggregate>> =
                aggregates.into_iter().map(Some).collect();
            let mut out = Vec::with_capacity(remaining.len());
            for name in reference {
                let slot = remaining
                    .iter_mut()
                    .find(|g| g.as_ref().is_some_and(|g| &g.key == name));
                if let Some(g) = slot.and_then(Option::take) {
                    out.push(g);
                }
            }
            out.extend(remaining.into_iter().flatten());
            out
        }
        SortMode::Ascending => {
            let mut v = aggregates;
            v.sort_by_key(|g| g.value(measure));
            v
        }
        SortMode::Descending => {
            let mut v = aggregates;
            v.sort_by(|a, b| b.value(measure).cmp(&a.value(measure)));
            v
        }
    }
}

/// Highest fatality rate first; groups with an undefined rate go last.
pub fn rank_by_fatality_rate(aggregates: Vec<GroupAggregate>) -> Vec<GroupAggregate> {
    let mut v = aggregates;
    v.sort_by(|a, b| match (a.fatality_rate, b.fatality_rate) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    v
}
