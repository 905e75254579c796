// Command-line configuration.

use crate::error::Result;
use crate::loader::{resolve_encoding, LoadOptions};
use crate::types::{Measure, SortMode};
use crate::views::{ComparisonParams, ViewSelection};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "한국도로교통공단_시도 시군구별 교통사고 통계_20241231.csv";

/// Explore regional traffic-accident statistics from the terminal.
///
/// Without a subcommand an interactive menu is shown.
#[derive(Debug, Parser)]
#[command(name = "accident_dashboard", version)]
pub struct Args {
    /// Path to the accident statistics CSV.
    #[arg(long, global = true, default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Encodings to try, in order (e.g. `cp949`, `utf-8`).
    #[arg(long = "encoding", global = true, value_delimiter = ',', default_values = ["euc-kr", "utf-8"])]
    pub encodings: Vec<String>,

    /// Fail on the first row with a non-numeric count instead of skipping it.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Also write each rendered table to this directory as CSV and JSON.
    #[arg(long, global = true)]
    pub export: Option<PathBuf>,

    /// Maximum bar length in terminal cells.
    #[arg(long, global = true, default_value_t = 40)]
    pub chart_width: usize,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the introduction screen.
    Home,
    /// Compare regions (시도).
    Regions(ComparisonArgs),
    /// Compare the sub-regions (시군구) of one region.
    SubRegions {
        /// Region whose sub-regions are compared.
        #[arg(long)]
        region: String,
        #[command(flatten)]
        comparison: ComparisonArgs,
    },
    /// Rank regions by fatalities per 100 incidents.
    FatalityRate,
}

#[derive(Debug, ClapArgs)]
pub struct ComparisonArgs {
    #[arg(long, value_enum, default_value_t = Measure::TotalVictims)]
    pub measure: Measure,

    #[arg(long, value_enum, default_value_t = SortMode::AsEntered)]
    pub sort: SortMode,

    /// Groups to include, in the order used by `--sort entered`. Defaults to all.
    #[arg(long, value_delimiter = ',', conflicts_with = "none")]
    pub select: Option<Vec<String>>,

    /// Select no groups at all.
    #[arg(long)]
    pub none: bool,
}

impl ComparisonArgs {
    fn params(&self) -> ComparisonParams {
        let groups = if self.none {
            Some(Vec::new())
        } else {
            self.select.clone()
        };
        ComparisonParams {
            measure: self.measure,
            sort: self.sort,
            groups,
        }
    }
}

impl Args {
    pub fn load_options(&self) -> Result<LoadOptions> {
        let encodings = self
            .encodings
            .iter()
            .map(|label| resolve_encoding(label))
            .collect::<Result<Vec<_>>>()?;
        Ok(LoadOptions {
            encodings,
            strict: self.strict,
        })
    }

    /// The view requested on the command line, if any.
    pub fn selection(&self) -> Option<ViewSelection> {
        let command = self.command.as_ref()?;
        Some(match command {
            Command::Home => ViewSelection::Home,
            Command::Regions(c) => ViewSelection::RegionComparison(c.params()),
            Command::SubRegions { region, comparison } => ViewSelection::SubRegionComparison {
                region: region.clone(),
                params: comparison.params(),
            },
            Command::FatalityRate => ViewSelection::FatalityRate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_dashboard() {
        let args = Args::parse_from(["accident_dashboard"]);
        assert_eq!(args.data, PathBuf::from(DEFAULT_DATA_PATH));
        assert!(args.selection().is_none());
        let opts = args.load_options().unwrap();
        assert_eq!(opts.encodings, vec![encoding_rs::EUC_KR, encoding_rs::UTF_8]);
        assert!(!opts.strict);
    }

    #[test]
    fn parses_region_comparison() {
        let args = Args::parse_from([
            "accident_dashboard",
            "regions",
            "--measure",
            "fatalities",
            "--sort",
            "desc",
            "--select",
            "부산,서울",
        ]);
        assert_eq!(
            args.selection(),
            Some(ViewSelection::RegionComparison(ComparisonParams {
                measure: Measure::Fatalities,
                sort: SortMode::Descending,
                groups: Some(vec!["부산".to_string(), "서울".to_string()]),
            }))
        );
    }

    #[test]
    fn none_flag_selects_nothing() {
        let args = Args::parse_from(["accident_dashboard", "sub-regions", "--region", "서울", "--none"]);
        match args.selection() {
            Some(ViewSelection::SubRegionComparison { region, params }) => {
                assert_eq!(region, "서울");
                assert_eq!(params.groups, Some(vec![]));
            }
            other => panic!("unexpected selection: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::parse_from([
            "accident_dashboard",
            "fatality-rate",
            "--encoding",
            "utf-8",
            "--strict",
        ]);
        assert_eq!(args.selection(), Some(ViewSelection::FatalityRate));
        let opts = args.load_options().unwrap();
        assert_eq!(opts.encodings, vec![encoding_rs::UTF_8]);
        assert!(opts.strict);
    }

    #[test]
    fn rejects_unknown_encoding() {
        let args = Args::parse_from(["accident_dashboard", "--encoding", "klingon"]);
        assert!(args.load_options().is_err());
    }
}
