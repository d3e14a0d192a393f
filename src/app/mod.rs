//! `StudioApp` — the top-level egui application state.
//!
//! This module declares the `StudioApp` struct and its `Default` impl.
//! All methods are split across the sibling sub-modules:
//!
//! - `analysis` — debounced input, async analyze lifecycle, cancellation
//! - `panels`   — toolbar, input editor, sentiment metrics, error banner
//! - `canvas`   — tree viewport rendering and interaction

pub mod analysis;
pub mod canvas;
pub mod panels;

use std::sync::mpsc;

use eframe::egui;

use resonance::net::analyze::{Analysis, AnalyzeError, DEFAULT_ENDPOINT};
use resonance::viz::TreeView;

// ─── Application state ───────────────────────────────────────────────────────

pub struct StudioApp {
    pub text_input: String,
    pub endpoint: String,
    pub analysis: Option<Analysis>,
    pub error: Option<String>,
    pub loading: bool,
    pub dark_mode: bool,
    /// Time of the most recent edit still waiting out the debounce window.
    pub pending_edit: Option<f64>,
    /// Text of the last request actually sent.
    pub analyzed_text: String,
    /// Sequence number of the latest request; stale results are dropped.
    pub request_seq: u64,
    pub analyze_rx: Option<mpsc::Receiver<(u64, Result<Analysis, AnalyzeError>)>>,
    pub view: TreeView,
    /// Hierarchy index currently under the pointer, if any.
    pub hovered: Option<usize>,
}

impl Default for StudioApp {
    fn default() -> Self {
        Self {
            text_input: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            analysis: None,
            error: None,
            loading: false,
            dark_mode: true,
            pending_edit: None,
            analyzed_text: String::new(),
            request_seq: 0,
            analyze_rx: None,
            view: TreeView::new(800.0, 600.0),
            hovered: None,
        }
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        ctx.set_visuals(if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
        self.check_analysis(now);
        self.tick_debounce(ctx, now);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui, now);
        });

        if self.error.is_some() {
            egui::TopBottomPanel::top("error_banner").show(ctx, |ui| {
                self.draw_error_banner(ui);
            });
        }

        egui::SidePanel::left("input_panel")
            .default_width(340.0)
            .show(ctx, |ui| {
                self.draw_input_panel(ui, now);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui, ctx, now);
        });
    }
}
