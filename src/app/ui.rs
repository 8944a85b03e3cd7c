use super::{HealthStatus, ResultView, UploadController};
use crate::upload::{SelectedFile, SUPPORTED_EXTENSIONS};
use eframe::egui::{self, Align2, Color32, RichText};
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const ERROR_RED: Color32 = Color32::from_rgb(220, 50, 50);
const OK_GREEN: Color32 = Color32::from_rgb(0, 180, 0);

impl UploadController {
    pub fn render(&mut self, ctx: &egui::Context) {
        let view = self.view();
        let blocked = self.notice.is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(20.0);
                    self.render_header(ui);
                    ui.add_space(20.0);

                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            if ui.button("📄 Select File").clicked() {
                                self.pick_file();
                            }
                            match &view.selected_label {
                                Some(label) => ui.label(format!("Selected: {}", label)),
                                None => ui.label(
                                    RichText::new("No file selected")
                                        .color(ui.visuals().weak_text_color()),
                                ),
                            };
                        });
                    });

                    ui.add_space(20.0);

                    ui.vertical_centered(|ui| {
                        let button = egui::Button::new(view.submit_label)
                            .min_size(egui::vec2(200.0, 40.0));
                        if ui.add_enabled(view.submit_enabled, button).clicked() {
                            // Failures are already surfaced through the notice.
                            let _ = self.submit();
                        }
                    });

                    if let Some(results) = &view.results {
                        ui.add_space(20.0);
                        render_results(ui, results);
                    }

                    ui.add_space(20.0);
                });
            });
        });

        self.render_notice(ctx);
    }

    fn render_header(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.heading("Invoice Extraction");
            ui.add_space(5.0);
            ui.label(
                RichText::new("Upload an invoice to extract its fields and XML outputs")
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );

            match &self.health {
                Some(HealthStatus::Checking) => {
                    ui.label("⏳ Checking service...");
                }
                Some(HealthStatus::Up) => {
                    ui.colored_label(OK_GREEN, format!("✅ {}", self.client.base_url()));
                }
                Some(HealthStatus::Down(reason)) => {
                    ui.colored_label(
                        ERROR_RED,
                        format!("❌ {} unavailable", self.client.base_url()),
                    )
                    .on_hover_text(reason);
                }
                None => {}
            }
        });
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(message) = self.notice.clone() else {
            return;
        };

        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.colored_label(ERROR_RED, &message);
                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        self.dismiss_notice();
                    }
                });
            });
    }

    fn pick_file(&mut self) {
        let picked = FileDialog::new()
            .add_filter("Documents", &SUPPORTED_EXTENSIONS)
            .add_filter("All files", &["*"])
            .pick_file();

        let Some(path) = picked else {
            self.select_file(None);
            return;
        };

        match SelectedFile::load(&path) {
            Ok(file) => self.select_file(Some(file)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not load selected file");
                self.notice = Some(e.to_string());
            }
        }
    }
}

fn render_results(ui: &mut egui::Ui, results: &ResultView) {
    ui.group(|ui| {
        ui.heading("Extracted Fields");
        ui.add_space(8.0);

        egui::Grid::new("extracted_fields")
            .num_columns(2)
            .striped(true)
            .spacing([24.0, 6.0])
            .show(ui, |ui| {
                ui.strong("Field");
                ui.strong("Value");
                ui.end_row();

                for field in &results.rows {
                    ui.label(&field.name);
                    if field.is_missing() {
                        ui.label(RichText::new(&field.value).color(ui.visuals().weak_text_color()));
                    } else {
                        ui.label(&field.value);
                    }
                    ui.end_row();
                }
            });

        ui.add_space(12.0);
        ui.label(RichText::new("XML Files").strong());
        render_link(ui, "Single XML", &results.single_xml_link);
        render_link(ui, "Master XML", &results.master_xml_link);
    });
}

fn render_link(ui: &mut egui::Ui, text: &str, url: &str) {
    let link = ui.add(
        egui::Label::new(RichText::new(text).color(ACCENT).underline())
            .sense(egui::Sense::click()),
    );
    if link.on_hover_text(url).clicked() {
        if let Err(e) = open::that(url) {
            tracing::warn!(url, error = %e, "failed to open link");
        }
    }
}
