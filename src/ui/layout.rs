use crate::app::FreeTextResponseApp;
use egui::{Button, Context, Ui};

/// Navegación de la secuencia: anterior / pestañas / siguiente.
pub fn top_panel(app: &mut FreeTextResponseApp, ctx: &Context) {
    egui::TopBottomPanel::top("sequence_panel").show(ctx, |ui| {
        ui.horizontal_centered(|ui| {
            if ui
                .add_enabled(app.current > 0, Button::new("◀ Anterior"))
                .clicked()
            {
                app.previous_unit();
            }

            let titles: Vec<String> = app.unit_titles().iter().map(|t| t.to_string()).collect();
            let mut selected = None;
            for (idx, title) in titles.iter().enumerate() {
                if ui.selectable_label(idx == app.current, title.as_str()).clicked() {
                    selected = Some(idx);
                }
            }
            if let Some(idx) = selected {
                app.go_to_unit(idx);
            }

            let has_next = app.current + 1 < titles.len();
            if ui.add_enabled(has_next, Button::new("Siguiente ▶")).clicked() {
                app.next_unit();
            }
        });
    });
}

/// Dos botones del mismo tamaño en una fila. Devuelve (clic izquierdo, clic derecho).
pub fn two_button_row(
    ui: &mut Ui,
    panel_width: f32,
    left: (&str, bool),
    right: (&str, bool),
) -> (bool, bool) {
    let btn_w = (panel_width - 8.0) / 2.0;
    let mut clicked_left = false;
    let mut clicked_right = false;
    ui.horizontal(|ui| {
        clicked_left = ui
            .add_enabled_ui(left.1, |ui| ui.add_sized([btn_w, 36.0], Button::new(left.0)))
            .inner
            .clicked();
        clicked_right = ui
            .add_enabled_ui(right.1, |ui| ui.add_sized([btn_w, 36.0], Button::new(right.0)))
            .inner
            .clicked();
    });
    (clicked_left, clicked_right)
}
