//! Analysis lifecycle for `StudioApp`.
//!
//! Covers the debounced input window, the background request thread, and
//! stale-result rejection: every request carries a sequence number and only
//! the latest one may touch the tree or surface an error.

use std::sync::mpsc;

use eframe::egui;

use resonance::net::analyze::analyze_text;

use super::StudioApp;

/// Seconds of typing silence before a request fires.
pub const DEBOUNCE_SECS: f64 = 0.6;

impl StudioApp {
    /// Note an input edit; the request fires once the window elapses.
    pub fn mark_edit(&mut self, now: f64) {
        self.pending_edit = Some(now);
    }

    /// Fire the pending request when the debounce window has elapsed.
    pub fn tick_debounce(&mut self, ctx: &egui::Context, now: f64) {
        let Some(edited) = self.pending_edit else {
            return;
        };
        let remaining = DEBOUNCE_SECS - (now - edited);
        if remaining > 0.0 {
            ctx.request_repaint_after(std::time::Duration::from_secs_f64(remaining.max(0.01)));
            return;
        }
        self.pending_edit = None;

        let text = self.text_input.trim().to_string();
        if text == self.analyzed_text {
            return;
        }
        if text.is_empty() {
            // Nothing to analyze: drop straight to the empty state.
            self.analyzed_text.clear();
            self.analysis = None;
            self.error = None;
            self.loading = false;
            self.analyze_rx = None;
            self.request_seq += 1;
            self.view.clear_tree(now);
            return;
        }
        self.start_analysis(ctx, text);
    }

    /// Kick off a background request. Any in-flight request is superseded:
    /// its result will carry a stale sequence number and be dropped.
    pub fn start_analysis(&mut self, ctx: &egui::Context, text: String) {
        self.request_seq += 1;
        let seq = self.request_seq;
        self.loading = true;
        self.analyzed_text = text.clone();

        let (tx, rx) = mpsc::channel();
        self.analyze_rx = Some(rx);

        let endpoint = self.endpoint.clone();
        let ctx = ctx.clone();
        log::debug!("analysis request #{} ({} chars)", seq, text.len());

        std::thread::spawn(move || {
            let result = analyze_text(&endpoint, &text);
            let _ = tx.send((seq, result));
            ctx.request_repaint();
        });
    }

    /// Poll the result channel and apply whatever arrives, unless it has
    /// been superseded in the meantime.
    pub fn check_analysis(&mut self, now: f64) {
        let Some(rx) = &self.analyze_rx else {
            return;
        };
        let Ok((seq, result)) = rx.try_recv() else {
            return;
        };
        if seq != self.request_seq {
            // Superseded: never surfaces, never touches the tree.
            log::debug!("dropping stale analysis result #{}", seq);
            return;
        }
        self.analyze_rx = None;
        self.loading = false;

        match result {
            Ok(analysis) => {
                log::debug!(
                    "analysis #{}: {} entities, {} relationships",
                    seq,
                    analysis.entities.len(),
                    analysis.relationships.len()
                );
                self.view.update_tree(analysis.tree_data.as_ref(), now);
                self.analysis = Some(analysis);
                self.error = None;
            }
            Err(e) => {
                // Keep the last good tree and metrics on screen.
                self.error = Some(e.to_string());
            }
        }
    }
}
