use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Plot};

use ipl_dashboard::color::bar_colors;
use ipl_dashboard::data::aggregate::{Orientation, Ranking};
use ipl_dashboard::state::AppState;

// ---------------------------------------------------------------------------
// Ranking chart (central panel)
// ---------------------------------------------------------------------------

/// Render the selected view as a bar chart.
pub fn ranking_chart(ui: &mut Ui, state: &AppState) {
    if state.is_halted() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Data could not be loaded. Restart to try again.");
        });
        return;
    }

    let Some(ranking) = &state.ranking else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Pick a view from the selector above");
        });
        return;
    };

    ui.heading(ranking.title);

    let horizontal = ranking.orientation == Orientation::Horizontal;
    let n = ranking.entries.len();

    // Horizontal charts put the top entry at the top of the axis.
    let position = move |i: usize| -> f64 {
        if horizontal {
            (n - 1 - i) as f64
        } else {
            i as f64
        }
    };

    let bars: Vec<Bar> = ranking
        .entries
        .iter()
        .zip(bar_colors(ranking))
        .enumerate()
        .map(|(i, ((label, value), color))| {
            Bar::new(position(i), *value)
                .name(label)
                .fill(color)
                .width(0.7)
        })
        .collect();

    let mut chart = BarChart::new(bars).name(ranking.value_column);
    if horizontal {
        chart = chart.horizontal();
    }

    let (x_label, y_label) = if horizontal {
        (ranking.value_column, ranking.label_column)
    } else {
        (ranking.label_column, ranking.value_column)
    };

    let mut plot = Plot::new("ranking_plot")
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    let names = category_names(ranking);
    plot = if horizontal {
        plot.y_axis_formatter(move |mark, _range| category_tick(&names, mark))
    } else {
        plot.x_axis_formatter(move |mark, _range| category_tick(&names, mark))
    };

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(chart);
    });
}

/// Category names indexed by bar position.
fn category_names(ranking: &Ranking) -> Vec<String> {
    let mut names: Vec<String> = ranking.entries.iter().map(|(l, _)| l.clone()).collect();
    if ranking.orientation == Orientation::Horizontal {
        names.reverse();
    }
    names
}

fn category_tick(names: &[String], mark: GridMark) -> String {
    let rounded = mark.value.round();
    if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    names.get(rounded as usize).cloned().unwrap_or_default()
}
