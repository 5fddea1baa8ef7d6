use crate::answer::WidgetServices;
use crate::cache::ResponseCache;
use crate::config::PageConfig;
use crate::error::ConfigError;
use crate::host::{HandlerUrls, Notifier};
use crate::transport::Transport;
use std::rc::Rc;

// Submódulos
pub mod navigation;
pub mod widget;

pub use widget::{RenderedResponses, WidgetController};

/// Sesión de página: una secuencia de unidades con un solo widget montado a
/// la vez. La caché vive aquí y se destruye con la página.
pub struct FreeTextResponseApp {
    pub page: PageConfig,
    pub current: usize,
    pub widget: WidgetController,
    // Widgets desmontados que aún esperan respuesta del servidor.
    retired: Vec<WidgetController>,
    cache: ResponseCache,
    transport: Rc<dyn Transport>,
    notifier: Rc<dyn Notifier>,
}

impl FreeTextResponseApp {
    /// Monta la primera unidad. Una página sin unidades es un error de
    /// configuración.
    pub fn new(
        page: PageConfig,
        transport: Rc<dyn Transport>,
        notifier: Rc<dyn Notifier>,
    ) -> Result<Self, ConfigError> {
        let cache = ResponseCache::new();
        let widget = mount(&page, 0, &cache, &transport, &notifier).ok_or(ConfigError::NoUnits)?;
        Ok(Self {
            page,
            current: 0,
            widget,
            retired: Vec::new(),
            cache,
            transport,
            notifier,
        })
    }

    /// Aplica respuestas pendientes del widget montado y de los desmontados.
    pub fn poll(&mut self) -> usize {
        let mut applied = self.widget.poll();
        for retired in &mut self.retired {
            applied += retired.poll();
        }
        self.retired.retain(|w| w.has_pending_requests());
        applied
    }

    pub fn has_pending_requests(&self) -> bool {
        self.widget.has_pending_requests() || !self.retired.is_empty()
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}

fn mount(
    page: &PageConfig,
    index: usize,
    cache: &ResponseCache,
    transport: &Rc<dyn Transport>,
    notifier: &Rc<dyn Notifier>,
) -> Option<WidgetController> {
    let unit = page.units.get(index)?;
    let services = WidgetServices {
        transport: Rc::clone(transport),
        notifier: Rc::clone(notifier),
        cache: cache.clone(),
        urls: HandlerUrls::resolve(&page.handler_base, &unit.usage_id),
    };
    log::debug!("montando widget {}", unit.usage_id);
    Some(WidgetController::initialize(
        unit,
        services,
        &page.labels,
        &page.export_filename,
    ))
}
