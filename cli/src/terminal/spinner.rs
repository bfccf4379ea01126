use colored::*;
use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::colors;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

/// Turns `span` into a spinner line. It shows while the span is entered and
/// clears when the span closes.
pub fn attach(span: &Span, msg: &str) {
    span.pb_set_style(&style());
    span.pb_set_message(msg);
}

pub fn report_probe_progress(span: &Span, idx: usize, total: usize, candidate: &str) {
    let counter = format!("{}/{}", idx + 1, total).color(colors::ACCENT).bold();
    span.pb_set_message(&format!("Probing {} ({counter})", candidate.color(colors::ADDRESS)));
}
