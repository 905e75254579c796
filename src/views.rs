// The four dashboard screens.
//
// `render` is a pure function of the dataset and a `ViewSelection`; it
// returns a description of what to show, which `output` then prints.

use crate::aggregate::{aggregate, aggregate_sub_regions, fatality_rates};
use crate::chart::{ChartBar, ChartSpec};
use crate::error::{DashboardError, Result};
use crate::ordering::{order, rank_by_fatality_rate};
use crate::types::{
    ComparisonRow, Dataset, FatalityRateRow, GroupAggregate, GroupKey, Measure, SortMode,
    COL_FATALITIES,
};
use crate::util::{format_int, format_number, format_rate};
use strum::{Display, EnumIter};

/// Menu entries, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum View {
    #[strum(serialize = "홈")]
    Home,
    #[strum(serialize = "시도별 비교")]
    RegionComparison,
    #[strum(serialize = "시군구별 비교")]
    SubRegionComparison,
    #[strum(serialize = "사망률 분석")]
    FatalityRate,
}

/// User choices for a comparison screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonParams {
    pub measure: Measure,
    pub sort: SortMode,
    /// `None` selects every group; `Some(vec![])` selects nothing. The
    /// order given here is the "as entered" order.
    pub groups: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSelection {
    Home,
    RegionComparison(ComparisonParams),
    SubRegionComparison {
        region: String,
        params: ComparisonParams,
    },
    FatalityRate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeContent {
    pub title: &'static str,
    pub intro: &'static str,
    pub features: Vec<(View, &'static str)>,
    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonView {
    pub title: String,
    pub chart_title: String,
    pub key: GroupKey,
    pub measure: Measure,
    /// Already in display order.
    pub rows: Vec<GroupAggregate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopRegion {
    pub region: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingView {
    pub title: String,
    pub rows: Vec<GroupAggregate>,
    pub top: Option<TopRegion>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutput {
    Home(HomeContent),
    Comparison(ComparisonView),
    FatalityRanking(RankingView),
}

impl ViewOutput {
    /// File stem used when exporting this view.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Home(_) => "home",
            Self::Comparison(v) => match v.key {
                GroupKey::Region => "region_comparison",
                GroupKey::SubRegion => "sub_region_comparison",
            },
            Self::FatalityRanking(_) => "fatality_rate",
        }
    }
}

pub fn render(dataset: &Dataset, selection: &ViewSelection) -> Result<ViewOutput> {
    let out = match selection {
        ViewSelection::Home => ViewOutput::Home(home()),
        ViewSelection::RegionComparison(params) => {
            ViewOutput::Comparison(region_comparison(dataset, params))
        }
        ViewSelection::SubRegionComparison { region, params } => {
            ViewOutput::Comparison(sub_region_comparison(dataset, region, params)?)
        }
        ViewSelection::FatalityRate => ViewOutput::FatalityRanking(fatality_ranking(dataset)),
    };
    log::debug!("rendered {} view", out.slug());
    Ok(out)
}

fn home() -> HomeContent {
    HomeContent {
        title: "교통사고 데이터 분석 대시보드",
        intro: "2024년 한국도로교통공단 교통사고 통계를 기반으로 전국 시도 및 시군구별 교통사고 현황을 분석하고 시각화합니다.",
        features: vec![
            (
                View::RegionComparison,
                "전국 각 시도의 사고 건수, 사망자수, 피해자수 비교",
            ),
            (
                View::SubRegionComparison,
                "특정 시도의 시군구별 교통사고 현황 분석",
            ),
            (View::FatalityRate, "사고 대비 사망자 비율로 위험 지역 파악"),
        ],
        hint: "메뉴에서 분석 항목을 선택하세요!",
    }
}

fn region_comparison(dataset: &Dataset, params: &ComparisonParams) -> ComparisonView {
    let groups = params.groups.clone().unwrap_or_else(|| dataset.regions());
    let aggregates = aggregate(dataset.records(), GroupKey::Region, &groups);
    log::debug!("{} of {} regions selected", aggregates.len(), groups.len());
    ComparisonView {
        title: "시도별 교통사고 통계 비교".to_string(),
        chart_title: format!("시도별 {} 비교", params.measure),
        key: GroupKey::Region,
        measure: params.measure,
        rows: order(aggregates, params.sort, params.measure, &groups),
    }
}

fn sub_region_comparison(
    dataset: &Dataset,
    region: &str,
    params: &ComparisonParams,
) -> Result<ComparisonView> {
    if !dataset.has_region(region) {
        return Err(DashboardError::UnknownRegion(region.to_string()));
    }
    let groups = params
        .groups
        .clone()
        .unwrap_or_else(|| dataset.sub_regions(region));
    let aggregates = aggregate_sub_regions(dataset, region, &groups);
    Ok(ComparisonView {
        title: "시군구별 교통사고 비교".to_string(),
        chart_title: format!("{region} 시군구별 {} 비교", params.measure),
        key: GroupKey::SubRegion,
        measure: params.measure,
        rows: order(aggregates, params.sort, params.measure, &groups),
    })
}

fn fatality_ranking(dataset: &Dataset) -> RankingView {
    let rows = rank_by_fatality_rate(fatality_rates(dataset));
    let top = rows.first().and_then(|g| {
        g.fatality_rate.map(|rate| TopRegion {
            region: g.key.clone(),
            rate,
        })
    });
    RankingView {
        title: "시도별 사망률 분석".to_string(),
        rows,
        top,
    }
}

impl ComparisonView {
    pub fn table_rows(&self) -> Vec<ComparisonRow> {
        self.rows
            .iter()
            .map(|g| ComparisonRow {
                group: g.key.clone(),
                incidents: format_int(g.incidents),
                fatalities: format_int(g.fatalities),
                total_victims: format_int(g.total_victims),
            })
            .collect()
    }

    pub fn chart(&self) -> ChartSpec {
        ChartSpec {
            title: self.chart_title.clone(),
            value_label: self.measure.to_string(),
            heat_label: COL_FATALITIES.to_string(),
            bars: self
                .rows
                .iter()
                .map(|g| {
                    let v = g.value(self.measure);
                    ChartBar {
                        label: g.key.clone(),
                        value: v as f64,
                        value_text: format_int(v),
                        heat: g.fatalities as f64,
                    }
                })
                .collect(),
        }
    }
}

impl RankingView {
    pub fn table_rows(&self) -> Vec<FatalityRateRow> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, g)| FatalityRateRow {
                rank: i + 1,
                region: g.key.clone(),
                incidents: format_int(g.incidents),
                fatalities: format_int(g.fatalities),
                fatality_rate: format_rate(g.fatality_rate),
            })
            .collect()
    }

    pub fn chart(&self) -> ChartSpec {
        ChartSpec {
            title: "시도별 사망률".to_string(),
            value_label: "사망률(%)".to_string(),
            heat_label: "사망률(%)".to_string(),
            bars: self
                .rows
                .iter()
                .map(|g| {
                    let rate = g.fatality_rate.unwrap_or(0.0);
                    ChartBar {
                        label: g.key.clone(),
                        value: rate,
                        value_text: format_rate(g.fatality_rate),
                        heat: rate,
                    }
                })
                .collect(),
        }
    }

    /// One-line callout for the highest-rate region.
    pub fn highlight(&self) -> Option<String> {
        self.top.as_ref().map(|t| {
            format!(
                "사망률이 가장 높은 지역: {} ({}%)",
                t.region,
                format_number(t.rate, 2)
            )
        })
    }
}
