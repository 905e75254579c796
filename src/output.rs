use crate::chart;
use crate::error::Result;
use crate::views::{HomeContent, ViewOutput};
use console::Style;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style as TableStyle, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn table_string<T: Tabled + Clone>(rows: &[T]) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(rows.to_vec())
        .with(TableStyle::markdown())
        .to_string()
}

fn print_heading(title: &str) {
    println!("\n{}", Style::new().bold().apply_to(title));
    println!("{}\n", "-".repeat(40));
}

fn print_home(home: &HomeContent) {
    print_heading(home.title);
    println!("{}\n", home.intro);
    println!("주요 기능 안내");
    for (view, text) in &home.features {
        println!("- {view} : {text}");
    }
    println!("\n{}\n", Style::new().green().apply_to(home.hint));
}

/// Print a view as a table followed by its bar chart.
pub fn print_view(view: &ViewOutput, chart_width: usize) {
    match view {
        ViewOutput::Home(home) => print_home(home),
        ViewOutput::Comparison(v) => {
            print_heading(&v.title);
            println!("{}\n", table_string(&v.table_rows()));
            println!("{}", chart::render(&v.chart(), chart_width));
        }
        ViewOutput::FatalityRanking(v) => {
            print_heading(&v.title);
            println!("{}\n", table_string(&v.table_rows()));
            println!("{}", chart::render(&v.chart(), chart_width));
            if let Some(line) = v.highlight() {
                println!("{}\n", Style::new().green().bold().apply_to(line));
            }
        }
    }
}

/// Write the view's table to `<dir>/<slug>.csv` and `<dir>/<slug>.json`.
///
/// The home screen has no table; nothing is written for it.
pub fn export_view(view: &ViewOutput, dir: &Path) -> Result<Vec<PathBuf>> {
    if matches!(view, ViewOutput::Home(_)) {
        return Ok(Vec::new());
    }
    std::fs::create_dir_all(dir)?;
    let csv_path = dir.join(format!("{}.csv", view.slug()));
    let json_path = dir.join(format!("{}.json", view.slug()));
    match view {
        ViewOutput::Home(_) => {}
        ViewOutput::Comparison(v) => {
            let rows = v.table_rows();
            write_csv(&csv_path, &rows)?;
            write_json(&json_path, &rows)?;
        }
        ViewOutput::FatalityRanking(v) => {
            let rows = v.table_rows();
            write_csv(&csv_path, &rows)?;
            write_json(&json_path, &rows)?;
        }
    }
    log::info!("exported {} and {}", csv_path.display(), json_path.display());
    Ok(vec![csv_path, json_path])
}
