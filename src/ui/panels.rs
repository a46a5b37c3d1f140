use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Facet;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let catalog = match &state.catalog {
        Some(c) => c.clone(),
        None => {
            ui.label("No catalog loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Release-year range ----
            ui.strong("Release year");
            let (mut low, mut high) = state.selection.year_range;
            let mut year_changed = false;
            year_changed |= ui
                .add(egui::Slider::new(&mut low, catalog.year_min..=catalog.year_max).text("from"))
                .changed();
            year_changed |= ui
                .add(egui::Slider::new(&mut high, catalog.year_min..=catalog.year_max).text("to"))
                .changed();
            if year_changed {
                state.set_year_range(low, high);
            }
            ui.separator();

            // ---- Per-facet filter widgets (collapsible) ----
            for facet in Facet::ALL {
                let domain = catalog.domain(facet);

                // Show count of selected / total in the header
                let n_selected = state.selection.facet(facet).len();
                let n_total = domain.len();
                let header_text = format!("{}  ({n_selected}/{n_total})", facet.label());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(facet.label())
                    .default_open(facet == Facet::Type)
                    .show(ui, |ui: &mut Ui| {
                        // Select all / none buttons
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(facet);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(facet);
                            }
                        });

                        for value in domain {
                            let mut checked = state.selection.facet(facet).contains(value);
                            if ui.checkbox(&mut checked, value).changed() {
                                state.toggle_value(facet, value);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(catalog) = &state.catalog {
            ui.label(format!(
                "{} titles loaded, {} matching",
                catalog.len(),
                state.visible_indices.len()
            ));
        }

        if state.loading {
            ui.separator();
            ui.label("Loading…");
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open catalog")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
