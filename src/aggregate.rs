use crate::types::{Dataset, GroupAggregate, GroupKey, Record};
use std::collections::HashMap;

/// Sum incidents, fatalities and total victims per group.
///
/// Only records whose `key` value is in `selected` take part; an empty
/// selection yields no groups. Groups come back in the order their key
/// first appears in `records`.
pub fn aggregate<'a, I>(records: I, key: GroupKey, selected: &[String]) -> Vec<GroupAggregate>
where
    I: IntoIterator<Item = &'a Record>,
{
    if selected.is_empty() {
        return Vec::new();
    }

    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<GroupAggregate> = Vec::new();
    for r in records {
        let k = r.key(key);
        if !selected.iter().any(|s| s == k) {
            continue;
        }
        let i = *index.entry(k).or_insert_with(|| {
            groups.push(GroupAggregate::empty(k));
            groups.len() - 1
        });
        let g = &mut groups[i];
        g.incidents += r.incidents;
        g.fatalities += r.fatalities;
        g.total_victims += r.total_victims();
    }
    groups
}

/// Sub-region sums restricted to one region, then to the selected
/// sub-regions of it.
pub fn aggregate_sub_regions(
    dataset: &Dataset,
    region: &str,
    selected: &[String],
) -> Vec<GroupAggregate> {
    aggregate(
        dataset.records().iter().filter(|r| r.region == region),
        GroupKey::SubRegion,
        selected,
    )
}

/// `fatalities / incidents * 100`, undefined when there were no incidents.
pub fn fatality_rate(fatalities: u64, incidents: u64) -> Option<f64> {
    if incidents == 0 {
        return None;
    }
    Some(fatalities as f64 / incidents as f64 * 100.0)
}

/// Per-region sums over the whole dataset with the fatality rate filled in.
pub fn fatality_rates(dataset: &Dataset) -> Vec<GroupAggregate> {
    let regions = dataset.regions();
    aggregate(dataset.records(), GroupKey::Region, &regions)
        .into_iter()
        .map(|mut g| {
            g.fatality_rate = fatality_rate(g.fatalities, g.incidents);
            g
        })
        .collect()
}
