use eframe::egui::{self, Color32, RichText, Ui};

use ipl_dashboard::config::WINDOW_TITLE;
use ipl_dashboard::data::aggregate::View;
use ipl_dashboard::data::model::Table;
use ipl_dashboard::state::AppState;

// ---------------------------------------------------------------------------
// Top bar – title and view selector
// ---------------------------------------------------------------------------

/// Render the title, the view selector, row counts and any status message.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(WINDOW_TITLE);
        ui.separator();

        let mut chosen = None;
        ui.add_enabled_ui(!state.is_halted(), |ui: &mut Ui| {
            ui.label("View:");
            egui::ComboBox::from_id_salt("view")
                .selected_text(state.view.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for view in View::ALL {
                        if ui
                            .selectable_label(state.view == view, view.label())
                            .clicked()
                        {
                            chosen = Some(view);
                        }
                    }
                });
        });
        if let Some(view) = chosen {
            state.select_view(view);
        }

        if let Some(summary) = state.summary() {
            ui.separator();
            ui.label(summary);
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – what was loaded
// ---------------------------------------------------------------------------

/// Row and column counts of both datasets.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Datasets");
    ui.separator();

    let Some(session) = &state.session else {
        ui.label("Nothing loaded.");
        return;
    };

    dataset_summary(ui, "Matches", &session.matches);
    ui.add_space(6.0);
    dataset_summary(ui, "Deliveries", &session.deliveries);
}

fn dataset_summary(ui: &mut Ui, name: &str, table: &Table) {
    egui::CollapsingHeader::new(RichText::new(name).strong())
        .id_salt(name)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(format!("{} rows", table.len()));
            ui.label(format!("{} columns", table.columns().len()));
            for col in table.columns() {
                ui.monospace(col);
            }
        });
}
