// Horizontal bar charts for the terminal.
//
// Bars are drawn in exactly the order they are given, so the chart always
// matches the table above it. Colour comes from a separate "heat" value
// mapped onto a light-to-dark red scale.
use console::{measure_text_width, Style};

/// 256-colour codes from light pink to dark red.
const REDS: [u8; 6] = [224, 217, 210, 203, 160, 124];
const BAR_CHAR: char = '█';

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
    pub value_text: String,
    pub heat: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    /// What the bar length measures.
    pub value_label: String,
    /// What the colour measures.
    pub heat_label: String,
    pub bars: Vec<ChartBar>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarLine {
    pub label: String,
    pub length: usize,
    pub value_text: String,
    pub shade: usize,
}

/// Compute bar lengths (`0..=width`) and shade indices (`0..REDS.len()`).
///
/// Any positive value gets at least one cell so small groups stay visible.
pub fn layout(bars: &[ChartBar], width: usize) -> Vec<BarLine> {
    let max_value = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    let max_heat = bars.iter().map(|b| b.heat).fold(0.0_f64, f64::max);

    bars.iter()
        .map(|b| {
            let length = if max_value <= 0.0 || b.value <= 0.0 {
                0
            } else {
                ((b.value / max_value) * width as f64).round().max(1.0) as usize
            };
            let shade = if max_heat <= 0.0 || b.heat <= 0.0 {
                0
            } else {
                let scaled = (b.heat / max_heat) * (REDS.len() - 1) as f64;
                (scaled.round() as usize).min(REDS.len() - 1)
            };
            BarLine {
                label: b.label.clone(),
                length: length.min(width),
                value_text: b.value_text.clone(),
                shade,
            }
        })
        .collect()
}

pub fn render(spec: &ChartSpec, width: usize) -> String {
    let mut out = String::new();
    out.push_str(&Style::new().bold().apply_to(&spec.title).to_string());
    out.push('\n');
    if spec.bars.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let lines = layout(&spec.bars, width);
    let label_width = lines
        .iter()
        .map(|l| measure_text_width(&l.label))
        .max()
        .unwrap_or(0);
    for line in &lines {
        let pad = label_width - measure_text_width(&line.label);
        let bar: String = std::iter::repeat(BAR_CHAR).take(line.length).collect();
        let style = Style::new().color256(REDS[line.shade]);
        out.push_str(&format!(
            "{}{} | {} {}\n",
            line.label,
            " ".repeat(pad),
            style.apply_to(bar),
            line.value_text
        ));
    }
    out.push_str(&format!(
        "(bar: {}, colour: {})\n",
        spec.value_label, spec.heat_label
    ));
    out
}
