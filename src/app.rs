use std::time::Instant;

use eframe::egui;
use pfas_map::state::AppState;

use crate::ui::{map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PfasMapApp {
    pub state: AppState,
}

impl PfasMapApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PfasMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply a settled filter edit before drawing.
        self.state.poll(Instant::now());

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: legend and filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::town_map(ui, &self.state);
        });

        // Wake up when a pending edit is due, even without input.
        if let Some(wait) = self.state.next_deadline(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}
