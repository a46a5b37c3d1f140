use eframe::egui::{Color32, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints};

use crate::data::model::Catalog;
use crate::state::AppState;

/// How many rows the preview table shows.
const PREVIEW_ROWS: usize = 10;

/// Histogram bin count for movie durations.
const DURATION_BINS: usize = 30;

// ---------------------------------------------------------------------------
// Central panel – overview, preview table and the chart column
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let catalog = match &state.catalog {
        Some(c) => c,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a catalog file to explore it  (File → Open…)");
            });
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            overview(ui, catalog, state);
            ui.separator();
            titles_by_type(ui, state);
            ui.separator();
            titles_per_year(ui, state);
            ui.separator();
            top_countries(ui, state);
            ui.separator();
            rating_distribution(ui, state);

            // The two type-specific charts disappear when the view holds no
            // matching rows, instead of rendering an empty plot.
            if !state.aggregates.movie_durations.is_empty() {
                ui.separator();
                movie_duration_histogram(ui, state);
            }
            if !state.aggregates.tv_season_counts.is_empty() {
                ui.separator();
                tv_season_counts(ui, state);
            }
        });
}

// ---------------------------------------------------------------------------
// Overview + preview table
// ---------------------------------------------------------------------------

fn overview(ui: &mut Ui, catalog: &Catalog, state: &AppState) {
    ui.heading("Dataset Overview");
    ui.label(format!("Number of titles: {}", state.aggregates.row_count));
    ui.add_space(4.0);
    preview_table(ui, catalog, &state.visible_indices);
}

fn preview_table(ui: &mut Ui, catalog: &Catalog, indices: &[usize]) {
    use egui_extras::{Column, TableBuilder};

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::remainder().at_least(160.0))
        .column(Column::auto())
        .column(Column::remainder())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for name in ["Title", "Type", "Country", "Year", "Rating", "Genres"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for &idx in indices.iter().take(PREVIEW_ROWS) {
                let t = &catalog.titles[idx];
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(&t.title);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(&t.kind);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(t.country.as_deref().unwrap_or(""));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(t.release_year.to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(t.rating.as_deref().unwrap_or(""));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(t.listed_in.as_deref().unwrap_or(""));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn titles_by_type(ui: &mut Ui, state: &AppState) {
    ui.heading("Titles by Type");

    let labels: Vec<String> = state.aggregates.by_type.keys().cloned().collect();
    let bars: Vec<Bar> = state
        .aggregates
        .by_type
        .iter()
        .enumerate()
        .map(|(i, (kind, &count))| {
            let mut bar = Bar::new(i as f64, count as f64).width(0.6).name(kind);
            if let Some(colors) = &state.type_colors {
                bar = bar.fill(colors.color_for(kind));
            }
            bar
        })
        .collect();

    Plot::new("titles_by_type")
        .height(220.0)
        .y_axis_label("Count")
        .x_axis_formatter(category_formatter(labels))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });

    insight(
        ui,
        "Movies dominate the catalog, reflecting a strategy built around one-off productions.",
    );
}

fn titles_per_year(ui: &mut Ui, state: &AppState) {
    ui.heading("Titles Released Over Time");

    let points: PlotPoints = state
        .aggregates
        .by_year
        .iter()
        .map(|&(year, count)| [year as f64, count as f64])
        .collect();

    let line = Line::new(points)
        .name("titles")
        .color(Color32::LIGHT_BLUE)
        .width(2.0);

    Plot::new("titles_per_year")
        .height(220.0)
        .x_axis_label("Year")
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(line);
        });

    insight(
        ui,
        "Releases grew steadily until 2019, with a dip in 2020 likely due to pandemic production delays.",
    );
}

fn top_countries(ui: &mut Ui, state: &AppState) {
    ui.heading("Top 10 Countries");
    horizontal_count_chart(
        ui,
        "top_countries",
        &state.aggregates.top_countries,
        Color32::LIGHT_BLUE,
    );
    insight(
        ui,
        "The United States leads the library by a wide margin, with India and the United Kingdom also major contributors.",
    );
}

fn rating_distribution(ui: &mut Ui, state: &AppState) {
    ui.heading("Rating Distribution");
    horizontal_count_chart(
        ui,
        "rating_distribution",
        &state.aggregates.rating_distribution,
        Color32::KHAKI,
    );
    insight(
        ui,
        "TV-MA and TV-14 are the most common ratings, so most content targets teens and adults.",
    );
}

fn movie_duration_histogram(ui: &mut Ui, state: &AppState) {
    ui.heading("Movie Duration Distribution");

    let durations = &state.aggregates.movie_durations;
    let min = durations.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = durations.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    // All identical values collapse into a single full-width bin.
    let span = (max - min).max(1.0);
    let bin_width = span / DURATION_BINS as f64;

    let mut bins = vec![0usize; DURATION_BINS];
    for &d in durations {
        let idx = (((d - min) / bin_width) as usize).min(DURATION_BINS - 1);
        bins[idx] += 1;
    }

    let bars: Vec<Bar> = bins
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(i, &count)| {
            let center = min + (i as f64 + 0.5) * bin_width;
            Bar::new(center, count as f64)
                .width(bin_width)
                .fill(Color32::LIGHT_GREEN)
        })
        .collect();

    Plot::new("movie_durations")
        .height(220.0)
        .x_axis_label("Minutes")
        .y_axis_label("Movies")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });

    insight(
        ui,
        "Most movies run 80 to 120 minutes, in line with standard feature lengths.",
    );
}

fn tv_season_counts(ui: &mut Ui, state: &AppState) {
    ui.heading("TV Show Seasons Count");

    let bars: Vec<Bar> = state
        .aggregates
        .tv_season_counts
        .iter()
        .map(|(&seasons, &count)| {
            Bar::new(seasons as f64, count as f64)
                .width(0.6)
                .fill(Color32::LIGHT_RED)
        })
        .collect();

    Plot::new("tv_season_counts")
        .height(220.0)
        .x_axis_label("Seasons")
        .y_axis_label("Shows")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });

    insight(
        ui,
        "TV shows tend to have one or two seasons, showing a preference for limited runs.",
    );
}

// ---------------------------------------------------------------------------
// Shared chart helpers
// ---------------------------------------------------------------------------

/// Horizontal bar chart of `(label, count)` pairs, highest count on top.
fn horizontal_count_chart(ui: &mut Ui, id: &str, counts: &[(String, usize)], color: Color32) {
    let n = counts.len();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::new((n - 1 - i) as f64, *count as f64)
                .width(0.6)
                .name(label)
                .fill(color)
        })
        .collect();

    // Labels indexed bottom-to-top to match the bar positions.
    let labels: Vec<String> = counts.iter().rev().map(|(l, _)| l.clone()).collect();

    Plot::new(id.to_string())
        .height((40 * n.max(3)) as f32)
        .x_axis_label("Count")
        .y_axis_formatter(category_formatter(labels))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

/// Axis formatter mapping integer positions to category labels.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String + 'static {
    move |mark, _range| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels
            .get(rounded as usize)
            .cloned()
            .unwrap_or_default()
    }
}

fn insight(ui: &mut Ui, text: &str) {
    ui.add_space(2.0);
    ui.label(format!("Insight: {text}"));
    ui.add_space(4.0);
}
