#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use free_text_response::config::read_page_embedded;
    use free_text_response::host::NoopNotifier;
    use free_text_response::transport::HttpTransport;
    use free_text_response::FreeTextResponseApp;
    use std::rc::Rc;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let page = match read_page_embedded() {
        Ok(page) => page.with_host_overrides(),
        Err(err) => {
            log::error!("configuración no válida: {err}");
            std::process::exit(1);
        }
    };

    let app = match FreeTextResponseApp::new(
        page,
        Rc::new(HttpTransport::new()),
        Rc::new(NoopNotifier),
    ) {
        Ok(app) => app,
        Err(err) => {
            log::error!("no se pudo montar la página: {err}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Free Text Response",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {}
