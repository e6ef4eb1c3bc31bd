use std::time::Instant;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use pfas_map::color::legend_entries;
use pfas_map::data::loader::load_samples;
use pfas_map::data::thresholds::{SampleType, chemical_label};
use pfas_map::geo::load_boundaries;
use pfas_map::state::AppState;

use super::to_color32;

// ---------------------------------------------------------------------------
// Left side panel – legend and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: legend, chemical checkboxes, date range.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    legend(ui);
    ui.add_space(8.0);

    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for sample_type in SampleType::ALL {
                chemical_group(ui, state, sample_type);
            }
            ui.separator();
            date_range(ui, state);
            ui.separator();
            about(ui);
        });
}

/// Swatches for each legend bucket.
fn legend(ui: &mut Ui) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.strong("% of chemical threshold");
        for (color, label) in legend_entries() {
            ui.horizontal(|ui: &mut Ui| {
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(20.0, 20.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 0.0, to_color32(color));
                ui.label(label);
            });
        }
    });
}

/// One collapsible checkbox group per sample type.
fn chemical_group(ui: &mut Ui, state: &mut AppState, sample_type: SampleType) {
    let chemicals = sample_type.chemicals();
    let n_selected = state
        .selection
        .get(&sample_type)
        .map_or(0, |selected| selected.len());
    let header_text = format!("{sample_type}  ({n_selected}/{})", chemicals.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(sample_type.name())
        .default_open(sample_type == SampleType::DrinkingWater)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(sample_type, Instant::now());
                }
                if ui.small_button("None").clicked() {
                    state.select_none(sample_type, Instant::now());
                }
            });

            for &(chemical, threshold) in chemicals {
                let mut checked = state
                    .selection
                    .get(&sample_type)
                    .is_some_and(|selected| selected.contains(chemical));
                let label = chemical_label(sample_type, chemical, threshold);
                if ui.checkbox(&mut checked, label).changed() {
                    state.toggle_chemical(sample_type, chemical, Instant::now());
                }
            }
        });
}

/// Start/end pickers, clamped to the dataset's dates.
fn date_range(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Test date range");

    let (Some(mut range), Some(bounds)) = (state.date_range, state.date_bounds()) else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        changed |= ui
            .add(DatePickerButton::new(&mut range.start).id_salt("date_start"))
            .changed();
        ui.label("to");
        changed |= ui
            .add(DatePickerButton::new(&mut range.end).id_salt("date_end"))
            .changed();
    });
    if changed {
        state.set_date_range(range, Instant::now());
    }

    if ui.small_button("Reset").clicked() {
        state.set_date_range(bounds, Instant::now());
    }
    ui.small(format!("Samples from {} to {}", bounds.start, bounds.end));
}

const EPA_PFAS_URL: &str = "https://www.epa.gov/sdwa/and-polyfluoroalkyl-substances-pfas";
const DEP_SCREENING_URL: &str =
    "https://www.maine.gov/dep/spills/topics/pfas/Maine%20PFAS%20Screening%20Levels_Rev_12_4_23.pdf";
const DEP_DATA_URL: &str = "https://www.maine.gov/dep/spills/topics/pfas/#Data";

/// What the map shows and where the thresholds come from.
fn about(ui: &mut Ui) {
    egui::CollapsingHeader::new(RichText::new("About this map").strong())
        .id_salt("about")
        .show(ui, |ui: &mut Ui| {
            ui.label(
                "Readings of PFAS chemicals gathered by the Maine Department of \
                 Environmental Protection (DEP), shown as a percentage of their \
                 Maximum Contaminant Level (MCL) or Remedial Action Guideline (RAG).",
            );
            ui.label(
                "Each town is coloured by its reading with the highest percentage of \
                 its chemical and sample type's threshold, among the chemicals and \
                 dates selected above.",
            );

            ui.add_space(4.0);
            ui.strong("Thresholds");
            ui.label(
                "Drinking water MCLs for PFOA, PFOS, PFHxS, PFNA and HFPO-DA are set by \
                 the EPA. Maine DEP also sets a residential standard for the sum of six \
                 PFAS (PFOS + PFOA + PFHpA + PFNA + PFHxS + PFDA).",
            );
            ui.label(
                "Milk, meat and fish tissue (filet) use Maine DEP RAGs. Soil guidelines \
                 depend on where the soil is found; the \"Park User\" levels are used \
                 for every soil sample (ng/g).",
            );

            ui.add_space(4.0);
            ui.strong("Sources");
            ui.hyperlink_to("EPA: Per- and Polyfluoroalkyl Substances", EPA_PFAS_URL);
            ui.hyperlink_to("Maine PFAS Screening Levels (Dec 2023)", DEP_SCREENING_URL);
            ui.hyperlink_to("Maine DEP PFAS sample data", DEP_DATA_URL);
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open samples…").clicked() {
                open_samples_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open town boundaries…").clicked() {
                open_towns_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(store) = &state.store {
            let n_towns = state.readings.as_ref().map_or(0, |r| r.len());
            ui.label(format!(
                "{} samples loaded, {} towns shown",
                store.len(),
                n_towns
            ));
        }

        if state.is_settling() {
            ui.separator();
            ui.spinner().on_hover_text(format!(
                "Map updates {} ms after the last filter change",
                state.debounce_delay().as_millis()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_samples_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open PFAS sample table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match load_samples(&path) {
            Ok(store) => state.set_dataset(store),
            Err(e) => {
                log::error!("Failed to load samples: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn open_towns_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open town boundaries")
        .add_filter("GeoJSON", &["geojson", "json"])
        .pick_file();

    if let Some(path) = file {
        match load_boundaries(&path) {
            Ok(towns) => state.set_towns(towns),
            Err(e) => {
                log::error!("Failed to load town boundaries: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
