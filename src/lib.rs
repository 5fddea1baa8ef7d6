pub mod answer;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod host;
pub mod model;
pub mod responses;
pub mod transport;
pub mod ui;
#[cfg(test)]
mod testing;

pub use app::FreeTextResponseApp;

/// Arranque en el navegador: pinta la página sobre `<canvas id="free_text_response">`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    use std::rc::Rc;
    use wasm_bindgen::JsCast;

    wasm_bindgen_futures::spawn_local(async {
        let page = match config::read_page_embedded() {
            Ok(page) => page.with_host_overrides(),
            Err(err) => {
                log::error!("configuración no válida: {err}");
                return;
            }
        };

        let app = match FreeTextResponseApp::new(
            page,
            Rc::new(transport::HttpTransport::new()),
            Rc::new(host::NoopNotifier),
        ) {
            Ok(app) => app,
            Err(err) => {
                log::error!("no se pudo montar la página: {err}");
                return;
            }
        };

        let Some(canvas) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("free_text_response"))
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            log::error!("no existe el canvas #free_text_response");
            return;
        };

        let result = eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|_cc| Ok(Box::new(app))),
            )
            .await;
        if let Err(err) = result {
            log::error!("no se pudo arrancar eframe: {err:?}");
        }
    });
}
