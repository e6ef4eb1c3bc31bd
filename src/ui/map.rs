use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_plot::{Plot, PlotPoints, Polygon};
use pfas_map::color::classify;
use pfas_map::data::aggregate::TownReadings;
use pfas_map::data::model::TownAttributes;
use pfas_map::geo::TownBoundaries;
use pfas_map::state::AppState;

use super::to_color32;

/// Polygon fill opacity over the base map.
const FILL_ALPHA: f32 = 0.7;

const TABLE_COLUMNS: [&str; 7] = [
    "Town",
    "% of threshold",
    "Chemical",
    "Concentration",
    "Units",
    "Sample type",
    "Date",
];

// ---------------------------------------------------------------------------
// Town map (central panel)
// ---------------------------------------------------------------------------

/// Render the choropleth, or a table of readings when no boundaries are loaded.
pub fn town_map(ui: &mut Ui, state: &AppState) {
    if state.store.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a sample table to view readings  (File → Open samples…)");
        });
        return;
    }

    let Some(readings) = &state.readings else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No towns match the current filters.");
        });
        return;
    };

    match &state.towns {
        Some(towns) => choropleth(ui, towns, readings),
        None => {
            let hint = "Load town boundaries (File → Open town boundaries…) to see the map.";
            ui.label(RichText::new(hint).italics());
            ui.separator();
            readings_table(ui, readings);
        }
    }
}

fn choropleth(ui: &mut Ui, towns: &TownBoundaries, readings: &TownReadings) {
    let features = towns.join(readings);

    let response = Plot::new("town_map")
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for feature in &features {
                let fill = to_color32(feature.fill).gamma_multiply(FILL_ALPHA);
                for ring in &feature.shape.rings {
                    let points: PlotPoints = ring.iter().copied().collect();
                    let polygon = Polygon::new(points)
                        .name(&feature.shape.town)
                        .fill_color(fill)
                        .stroke(Stroke::new(0.5, Color32::BLACK));
                    plot_ui.polygon(polygon);
                }
            }

            // Town under the pointer, for the tooltip.
            plot_ui.pointer_coordinate().and_then(|p| {
                features
                    .iter()
                    .position(|f| f.shape.contains([p.x, p.y]))
            })
        });

    if let Some(hovered) = response.inner {
        let attrs = features[hovered].reading.record.attributes();
        response.response.on_hover_ui(|ui: &mut Ui| {
            tooltip(ui, &attrs);
        });
    }
}

/// The attribute bag as an alias/value grid.
fn tooltip(ui: &mut Ui, attrs: &TownAttributes) {
    egui::Grid::new("town_tooltip")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            for (alias, value) in attrs.rows() {
                ui.strong(alias);
                ui.label(value);
                ui.end_row();
            }
        });
}

/// Fallback view: one row per town, with its legend swatch.
fn readings_table(ui: &mut Ui, readings: &TownReadings) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("readings_table")
                .striped(true)
                .num_columns(8)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("");
                    for alias in TABLE_COLUMNS {
                        ui.strong(alias);
                    }
                    ui.end_row();

                    for reading in readings.iter() {
                        let attrs = reading.record.attributes();
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
                        ui.painter()
                            .rect_filled(rect, 0.0, to_color32(classify(attrs.threshold_pct)));
                        ui.label(&attrs.town);
                        let pct = attrs.threshold_pct.map_or("n/a".to_string(), |p| p.to_string());
                        ui.label(pct);
                        ui.label(&attrs.parameter);
                        ui.label(attrs.concentration.to_string());
                        ui.label(&attrs.units);
                        ui.label(&attrs.sample_type);
                        ui.label(&attrs.sample_date);
                        ui.end_row();
                    }
                });
        });
}
