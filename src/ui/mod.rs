mod helpers;
pub mod layout;
pub mod views;

use crate::app::FreeTextResponseApp;
use eframe::{App, Frame};
use egui::Context;
use layout::top_panel;
use std::time::Duration;

impl App for FreeTextResponseApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        // Respuestas del backend que hayan llegado desde el último frame
        self.poll();
        if self.has_pending_requests() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        if self.page.units.len() > 1 {
            top_panel(self, ctx);
        }
        views::widget::ui_widget(self, ctx);
    }
}
