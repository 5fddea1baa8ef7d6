use crate::app::FreeTextResponseApp;
use crate::export::DownloadSink;
use crate::ui::helpers::{indicator_badge, optional_label, response_grid};
use crate::ui::layout::two_button_row;
use egui::{CentralPanel, Context, ScrollArea, TextEdit};

#[cfg(not(target_arch = "wasm32"))]
fn download_sink() -> impl DownloadSink {
    crate::export::DirectorySink::current_dir()
}

#[cfg(target_arch = "wasm32")]
fn download_sink() -> impl DownloadSink {
    crate::export::BrowserSink
}

pub fn ui_widget(app: &mut FreeTextResponseApp, ctx: &Context) {
    CentralPanel::default().show(ctx, |ui| {
        let max_width = 650.0;
        let panel_width = (ui.available_width() * 0.97).min(max_width);
        let widget = &mut app.widget;

        ScrollArea::vertical().show(ui, |ui| {
            ui.set_width(panel_width);
            ui.heading(widget.display_name.as_str());
            ui.add_space(6.0);
            ui.label(widget.prompt.as_str());
            ui.add_space(10.0);

            // Caja de respuesta + indicador
            let mut draft = widget.machine().draft().to_string();
            let edited = ui
                .add(
                    TextEdit::multiline(&mut draft)
                        .desired_rows(8)
                        .desired_width(panel_width),
                )
                .changed();
            if edited {
                widget.on_text_changed(draft);
            }

            let feedback = widget.machine().feedback().clone();
            if !feedback.indicator_hidden {
                indicator_badge(ui, feedback.indicator_class);
            }
            optional_label(ui, &feedback.submitted_message);
            optional_label(ui, &feedback.user_alert);

            ui.add_space(8.0);
            if !feedback.controls_hidden {
                let submit = widget.machine().submit_button().clone();
                let save = widget.machine().save_button().clone();
                let (submit_clicked, save_clicked) = two_button_row(
                    ui,
                    panel_width,
                    (submit.label(), !submit.in_flight()),
                    (save.label(), !save.in_flight()),
                );
                if submit_clicked {
                    widget.on_submit_clicked();
                }
                if save_clicked {
                    widget.on_save_clicked();
                }
            }
            optional_label(ui, &feedback.used_attempts_text);
            optional_label(ui, &feedback.progress_text);

            // Respuestas de otros estudiantes
            if widget.machine().responses_box_visible() {
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(widget.toggle_label()).clicked() {
                        widget.on_toggle_responses();
                    }
                    if ui.button(widget.labels().export.as_str()).clicked() {
                        if let Err(err) = widget.on_export_clicked(&download_sink()) {
                            log::warn!("exportación fallida: {err}");
                        }
                    }
                });
                if widget.response_list_shown() {
                    response_grid(
                        ui,
                        &widget.labels().table_header,
                        widget.machine().responses(),
                    );
                }
            }

            ui.add_space(8.0);
            optional_label(ui, &widget.message);
        });
    });
}
