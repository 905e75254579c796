use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tabled::Tabled;

pub const COL_REGION: &str = "시도";
pub const COL_SUB_REGION: &str = "시군구";
pub const COL_INCIDENTS: &str = "사고건수";
pub const COL_FATALITIES: &str = "사망자수";
pub const COL_SERIOUS: &str = "중상자수";
pub const COL_MINOR: &str = "경상자수";
pub const COL_REPORTED: &str = "부상신고자수";

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_REGION,
    COL_SUB_REGION,
    COL_INCIDENTS,
    COL_FATALITIES,
    COL_SERIOUS,
    COL_MINOR,
    COL_REPORTED,
];

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "시도")]
    pub region: Option<String>,
    #[serde(rename = "시군구")]
    pub sub_region: Option<String>,
    #[serde(rename = "사고건수")]
    pub incidents: Option<String>,
    #[serde(rename = "사망자수")]
    pub fatalities: Option<String>,
    #[serde(rename = "중상자수")]
    pub serious_injuries: Option<String>,
    #[serde(rename = "경상자수")]
    pub minor_injuries: Option<String>,
    #[serde(rename = "부상신고자수")]
    pub reported_injuries: Option<String>,
}

/// Counts parsed from one row, before the derived column is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRow {
    pub region: String,
    pub sub_region: String,
    pub incidents: u64,
    pub fatalities: u64,
    pub serious_injuries: u64,
    pub minor_injuries: u64,
    pub reported_injuries: u64,
}

/// One row of the dataset with its derived total-victims column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub region: String,
    pub sub_region: String,
    pub incidents: u64,
    pub fatalities: u64,
    pub serious_injuries: u64,
    pub minor_injuries: u64,
    pub reported_injuries: u64,
    total_victims: u64,
}

impl Record {
    pub fn annotated(row: CountRow) -> Self {
        let total_victims =
            row.fatalities + row.serious_injuries + row.minor_injuries + row.reported_injuries;
        Self {
            region: row.region,
            sub_region: row.sub_region,
            incidents: row.incidents,
            fatalities: row.fatalities,
            serious_injuries: row.serious_injuries,
            minor_injuries: row.minor_injuries,
            reported_injuries: row.reported_injuries,
            total_victims,
        }
    }

    pub fn total_victims(&self) -> u64 {
        self.total_victims
    }

    pub fn key(&self, key: GroupKey) -> &str {
        match key {
            GroupKey::Region => &self.region,
            GroupKey::SubRegion => &self.sub_region,
        }
    }
}

/// The loaded table. Built once at startup and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct regions in first-appearance order.
    pub fn regions(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.region.as_str()))
    }

    /// Distinct sub-regions of `region` in first-appearance order.
    pub fn sub_regions(&self, region: &str) -> Vec<String> {
        distinct(
            self.records
                .iter()
                .filter(|r| r.region == region)
                .map(|r| r.sub_region.as_str()),
        )
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.records.iter().any(|r| r.region == region)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|seen| seen == v) {
            out.push(v.to_string());
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Region,
    SubRegion,
}

/// A numeric column that can be charted and sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, ValueEnum)]
pub enum Measure {
    #[default]
    #[strum(serialize = "총 피해자수")]
    TotalVictims,
    #[strum(serialize = "사고건수")]
    Incidents,
    #[strum(serialize = "사망자수")]
    Fatalities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, ValueEnum)]
pub enum SortMode {
    #[default]
    #[strum(serialize = "입력 순서대로")]
    #[value(name = "entered")]
    AsEntered,
    #[strum(serialize = "오름차순")]
    #[value(name = "asc")]
    Ascending,
    #[strum(serialize = "내림차순")]
    #[value(name = "desc")]
    Descending,
}

/// Per-group sums for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAggregate {
    pub key: String,
    pub incidents: u64,
    pub fatalities: u64,
    pub total_victims: u64,
    /// Only filled in by the fatality-rate view. `None` there means the
    /// group has no recorded incidents.
    pub fatality_rate: Option<f64>,
}

impl GroupAggregate {
    pub fn empty(key: &str) -> Self {
        Self {
            key: key.to_string(),
            incidents: 0,
            fatalities: 0,
            total_victims: 0,
            fatality_rate: None,
        }
    }

    pub fn value(&self, measure: Measure) -> u64 {
        match measure {
            Measure::TotalVictims => self.total_victims,
            Measure::Incidents => self.incidents,
            Measure::Fatalities => self.fatalities,
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ComparisonRow {
    #[serde(rename = "지역")]
    #[tabled(rename = "지역")]
    pub group: String,
    #[serde(rename = "사고건수")]
    #[tabled(rename = "사고건수")]
    pub incidents: String,
    #[serde(rename = "사망자수")]
    #[tabled(rename = "사망자수")]
    pub fatalities: String,
    #[serde(rename = "총 피해자수")]
    #[tabled(rename = "총 피해자수")]
    pub total_victims: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct FatalityRateRow {
    #[serde(rename = "순위")]
    #[tabled(rename = "순위")]
    pub rank: usize,
    #[serde(rename = "시도")]
    #[tabled(rename = "시도")]
    pub region: String,
    #[serde(rename = "사고건수")]
    #[tabled(rename = "사고건수")]
    pub incidents: String,
    #[serde(rename = "사망자수")]
    #[tabled(rename = "사망자수")]
    pub fatalities: String,
    #[serde(rename = "사망률(%)")]
    #[tabled(rename = "사망률(%)")]
    pub fatality_rate: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_row(region: &str, sub: &str, counts: [u64; 5]) -> CountRow {
        CountRow {
            region: region.to_string(),
            sub_region: sub.to_string(),
            incidents: counts[0],
            fatalities: counts[1],
            serious_injuries: counts[2],
            minor_injuries: counts[3],
            reported_injuries: counts[4],
        }
    }

    #[test]
    fn total_victims_is_sum_of_four_counts() {
        let r = Record::annotated(count_row("서울", "종로구", [10, 1, 2, 5, 1]));
        assert_eq!(r.total_victims(), 9);
        assert_eq!(
            r.total_victims(),
            r.fatalities + r.serious_injuries + r.minor_injuries + r.reported_injuries
        );
    }

    #[test]
    fn regions_and_sub_regions_keep_first_appearance_order() {
        let ds = Dataset::new(vec![
            Record::annotated(count_row("부산", "중구", [1, 0, 0, 0, 0])),
            Record::annotated(count_row("서울", "종로구", [1, 0, 0, 0, 0])),
            Record::annotated(count_row("부산", "서구", [1, 0, 0, 0, 0])),
            Record::annotated(count_row("서울", "중구", [1, 0, 0, 0, 0])),
        ]);
        assert_eq!(ds.regions(), vec!["부산", "서울"]);
        assert_eq!(ds.sub_regions("부산"), vec!["중구", "서구"]);
        assert_eq!(ds.sub_regions("서울"), vec!["종로구", "중구"]);
        assert!(ds.sub_regions("대구").is_empty());
        assert!(!ds.has_region("대구"));
    }

    #[test]
    fn measure_labels_match_column_names() {
        assert_eq!(Measure::TotalVictims.to_string(), "총 피해자수");
        assert_eq!(Measure::Incidents.to_string(), COL_INCIDENTS);
        assert_eq!(Measure::Fatalities.to_string(), COL_FATALITIES);
        assert_eq!(SortMode::Descending.to_string(), "내림차순");
    }
}
