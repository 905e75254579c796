// Entry point and interactive menu.
//
// The CSV is loaded once at startup; a missing or undecodable file stops
// the program before any view is shown. After that every menu choice builds
// a `ViewSelection`, renders it against the loaded dataset and prints it.
mod aggregate;
mod chart;
mod config;
mod error;
mod loader;
mod ordering;
mod output;
mod types;
mod util;
mod views;

use clap::Parser;
use config::Args;
use dialoguer::{MultiSelect, Select};
use error::Result;
use strum::IntoEnumIterator;
use types::{Dataset, Measure, SortMode};
use views::{ComparisonParams, View, ViewSelection};

const EXIT_LABEL: &str = "종료";

fn init_logger() {
    pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .try_init()
        .ok();
}

/// Load the dataset and print a short summary of what happened.
fn handle_load(args: &Args) -> Result<Dataset> {
    let options = args.load_options()?;
    let (dataset, report) = loader::load(&args.data, &options)?;
    println!(
        "Processing dataset... ({} rows loaded, encoding {})",
        util::format_int(report.loaded_rows),
        report.encoding
    );
    if report.malformed_rows > 0 {
        println!(
            "Note: {} of {} rows skipped due to non-numeric counts.",
            util::format_int(report.malformed_rows),
            util::format_int(report.total_rows)
        );
    }
    Ok(dataset)
}

/// Render one selection, print it, and export it if requested.
fn show(dataset: &Dataset, selection: &ViewSelection, args: &Args) -> Result<()> {
    let view = views::render(dataset, selection)?;
    output::print_view(&view, args.chart_width);
    if let Some(dir) = &args.export {
        for path in output::export_view(&view, dir)? {
            println!("(table exported to {})", path.display());
        }
    }
    Ok(())
}

fn prompt_measure_and_sort() -> Result<(Measure, SortMode)> {
    let measures: Vec<Measure> = Measure::iter().collect();
    let idx = Select::new()
        .with_prompt("y축으로 표시할 데이터 선택")
        .items(&measures)
        .default(0)
        .interact()?;
    let modes: Vec<SortMode> = SortMode::iter().collect();
    let sort_idx = Select::new()
        .with_prompt("정렬 방식 선택")
        .items(&modes)
        .default(0)
        .interact()?;
    Ok((measures[idx], modes[sort_idx]))
}

/// Multi-select with everything checked; returns the picked names in list order.
fn prompt_groups(prompt: &str, options: &[String]) -> Result<Vec<String>> {
    if options.is_empty() {
        return Ok(Vec::new());
    }
    let defaults = vec![true; options.len()];
    let picked = MultiSelect::new()
        .with_prompt(prompt)
        .items(options)
        .defaults(&defaults)
        .interact()?;
    Ok(picked.into_iter().map(|i| options[i].clone()).collect())
}

/// `None` when the chosen screen has nothing to pick from.
fn prompt_selection(dataset: &Dataset, view: View) -> Result<Option<ViewSelection>> {
    Ok(Some(match view {
        View::Home => ViewSelection::Home,
        View::RegionComparison => {
            let (measure, sort) = prompt_measure_and_sort()?;
            let groups = prompt_groups("비교할 시도를 선택하세요", &dataset.regions())?;
            ViewSelection::RegionComparison(ComparisonParams {
                measure,
                sort,
                groups: Some(groups),
            })
        }
        View::SubRegionComparison => {
            let regions = dataset.regions();
            if regions.is_empty() {
                return Ok(None);
            }
            let (measure, sort) = prompt_measure_and_sort()?;
            let idx = Select::new()
                .with_prompt("시도를 선택하세요")
                .items(&regions)
                .default(0)
                .interact()?;
            let region = regions[idx].clone();
            let groups =
                prompt_groups("비교할 시군구를 선택하세요", &dataset.sub_regions(&region))?;
            ViewSelection::SubRegionComparison {
                region,
                params: ComparisonParams {
                    measure,
                    sort,
                    groups: Some(groups),
                },
            }
        }
        View::FatalityRate => ViewSelection::FatalityRate,
    }))
}

fn run_interactive(dataset: &Dataset, args: &Args) -> Result<()> {
    let mut labels: Vec<String> = View::iter().map(|v| v.to_string()).collect();
    labels.push(EXIT_LABEL.to_string());
    loop {
        println!();
        let idx = Select::new()
            .with_prompt("메뉴를 선택하세요")
            .items(&labels)
            .default(0)
            .interact()?;
        let Some(view) = View::iter().nth(idx) else {
            println!("Exiting the program.");
            return Ok(());
        };
        let Some(selection) = prompt_selection(dataset, view)? else {
            println!("No regions loaded; nothing to compare.");
            continue;
        };
        show(dataset, &selection, args)?;
    }
}

fn run(args: &Args) -> Result<()> {
    let dataset = handle_load(args)?;
    if dataset.is_empty() {
        log::warn!("{} contains no usable rows", args.data.display());
    }
    match args.selection() {
        Some(selection) => show(&dataset, &selection, args),
        None => run_interactive(&dataset, args),
    }
}

fn main() {
    init_logger();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_options_means_nothing_selected() {
        let picked = prompt_groups("비교할 시도를 선택하세요", &[]).unwrap();
        assert!(picked.is_empty());
    }

    #[test]
    fn sub_region_screen_is_skipped_without_regions() {
        let selection = prompt_selection(&Dataset::default(), View::SubRegionComparison);
        assert!(matches!(selection, Ok(None)));
    }

    #[test]
    fn empty_dataset_renders_empty_region_comparison() {
        let groups = prompt_groups("비교할 시도를 선택하세요", &Dataset::default().regions()).unwrap();
        let selection = ViewSelection::RegionComparison(ComparisonParams {
            groups: Some(groups),
            ..ComparisonParams::default()
        });
        match views::render(&Dataset::default(), &selection).unwrap() {
            views::ViewOutput::Comparison(v) => assert!(v.rows.is_empty()),
            other => panic!("unexpected view: {other:?}"),
        }
    }
}
