// src/ui/helpers.rs
use crate::model::IndicatorClass;
use crate::responses::{ResponseRow, ResponseTable};
use egui::{Color32, RichText, Ui};

/// Marca de corrección junto a la caja de respuesta.
pub fn indicator_badge(ui: &mut Ui, indicator: IndicatorClass) {
    let (icon, color) = match indicator {
        IndicatorClass::Correct => ("✔", Color32::from_rgb(0, 150, 70)),
        IndicatorClass::Incorrect => ("✖", Color32::from_rgb(190, 30, 45)),
        IndicatorClass::Unanswered => ("○", Color32::GRAY),
    };
    ui.label(RichText::new(format!("{icon} {}", indicator.css_class())).color(color));
}

/// Etiqueta que no ocupa sitio si el texto está vacío (como un div vacío).
pub fn optional_label(ui: &mut Ui, text: &str) {
    if !text.is_empty() {
        ui.label(text);
    }
}

pub fn response_grid(ui: &mut Ui, header: &[String], table: &ResponseTable) {
    egui::Grid::new("response_list")
        .striped(true)
        .num_columns(header.len().max(1))
        .show(ui, |ui| {
            for cell in header {
                ui.strong(cell.as_str());
            }
            ui.end_row();

            for row in &table.rows {
                match row {
                    ResponseRow::Entry { .. } => {
                        for cell in row.cells() {
                            ui.label(cell);
                        }
                    }
                    ResponseRow::Empty { message, .. } => {
                        ui.label(RichText::new(message).italics());
                    }
                }
                ui.end_row();
            }
        });
}
