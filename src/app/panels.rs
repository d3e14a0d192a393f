//! Toolbar, input editor, and sentiment panels for `StudioApp`.

use eframe::egui;

use super::StudioApp;

const SAMPLE_TEXTS: &[(&str, &str)] = &[
    (
        "Upbeat",
        "Alice loves the bright new library in Amsterdam. The reading rooms \
         are wonderful, and the friendly staff always recommend fantastic books.",
    ),
    (
        "Gloomy",
        "The old factory by the river has been abandoned for years. Broken \
         windows, rusting machines, and a terrible smell greet the rare visitor.",
    ),
];

impl StudioApp {
    /// Render the top toolbar strip.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui, now: f64) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);
            ui.label(egui::RichText::new("Resonance").strong());
            ui.separator();

            let has_tree = self.view.has_tree();
            if ui.add_enabled(has_tree, egui::Button::new("Expand All")).clicked() {
                self.view.expand_all(now);
            }
            if ui.add_enabled(has_tree, egui::Button::new("Collapse All")).clicked() {
                self.view.collapse_all(now);
            }
            if ui.add_enabled(has_tree, egui::Button::new("Center")).clicked() {
                self.view.center_tree(now);
            }
            if ui.button("Clear").clicked() {
                self.text_input.clear();
                self.analyzed_text.clear();
                self.analysis = None;
                self.error = None;
                self.pending_edit = None;
                self.loading = false;
                self.analyze_rx = None;
                self.request_seq += 1;
                self.view.clear_tree(now);
            }

            ui.separator();
            ui.label("Endpoint:");
            ui.add_sized(
                [260.0, 24.0],
                egui::TextEdit::singleline(&mut self.endpoint)
                    .font(egui::TextStyle::Monospace),
            );

            // Dark mode toggle
            let dark_label = if self.dark_mode { "\u{263E}" } else { "\u{2600}" };
            if ui.button(dark_label).clicked() {
                self.dark_mode = !self.dark_mode;
            }

            if self.loading {
                ui.spinner();
            }
        });
    }

    /// Render the dismissable error strip under the toolbar.
    pub fn draw_error_banner(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);
            if ui.button("\u{2715}").clicked() {
                self.error = None;
            }
            if let Some(error) = &self.error {
                ui.colored_label(egui::Color32::from_rgb(235, 87, 87), error.as_str());
            }
        });
    }

    /// Render the text editor and the sentiment metrics below it.
    pub fn draw_input_panel(&mut self, ui: &mut egui::Ui, now: f64) {
        ui.add_space(6.0);
        ui.label(egui::RichText::new("Input Text").strong());

        let response = ui.add_sized(
            [ui.available_width(), 200.0],
            egui::TextEdit::multiline(&mut self.text_input)
                .hint_text("Type or paste text to analyze..."),
        );
        if response.changed() {
            self.mark_edit(now);
        }

        ui.horizontal(|ui| {
            for (label, text) in SAMPLE_TEXTS {
                if ui.small_button(*label).clicked() {
                    self.text_input = (*text).to_string();
                    self.mark_edit(now);
                }
            }
        });

        ui.separator();
        self.draw_sentiment(ui);
    }

    fn draw_sentiment(&self, ui: &mut egui::Ui) {
        let Some(analysis) = &self.analysis else {
            ui.weak("No analysis yet.");
            return;
        };
        let s = &analysis.sentiment;

        let (mood, color) = if s.polarity > 0.1 {
            ("Positive", egui::Color32::from_rgb(95, 190, 120))
        } else if s.polarity < -0.1 {
            ("Negative", egui::Color32::from_rgb(235, 87, 87))
        } else {
            ("Neutral", egui::Color32::from_rgb(150, 150, 158))
        };

        ui.horizontal(|ui| {
            ui.label("Sentiment:");
            ui.colored_label(color, format!("{} ({:+.3})", mood, s.polarity));
        });

        ui.add(
            egui::ProgressBar::new(s.subjectivity as f32)
                .text(format!("Subjectivity {:.0}%", s.subjectivity * 100.0)),
        );
        ui.add(
            egui::ProgressBar::new(s.confidence as f32)
                .text(format!("Confidence {:.0}%", s.confidence * 100.0)),
        );

        ui.add_space(4.0);
        egui::Grid::new("analysis_stats").num_columns(2).show(ui, |ui| {
            ui.label("Words");
            ui.label(analysis.word_count.to_string());
            ui.end_row();
            ui.label("Sentences");
            ui.label(analysis.sentence_count.to_string());
            ui.end_row();
            ui.label("Entities");
            ui.label(analysis.entities.len().to_string());
            ui.end_row();
            ui.label("Relationships");
            ui.label(analysis.relationships.len().to_string());
            ui.end_row();
        });
    }
}
