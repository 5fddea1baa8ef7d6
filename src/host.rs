//! Capacidades que aporta el host de la página: notificaciones y URLs de los
//! handlers del backend.

use crate::model::WidgetIdentity;
use serde_json::Value;

pub const SUBMIT_HANDLER: &str = "submit";
// El backend registra el handler de guardado con este nombre.
pub const SAVE_HANDLER: &str = "save_reponse";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    Submit,
    Save,
    Error,
}

impl HostEvent {
    pub fn name(self) -> &'static str {
        match self {
            HostEvent::Submit => "submit",
            HostEvent::Save => "save",
            HostEvent::Error => "error",
        }
    }
}

/// Canal de notificaciones del runtime del host.
pub trait Notifier {
    fn notify(&self, event: HostEvent, payload: Value);
}

/// Sustituto cuando el host no trae canal de notificaciones.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, event: HostEvent, payload: Value) {
        log::debug!("notify sin host: {} {}", event.name(), payload);
    }
}

/// URLs resueltas de los dos handlers para una instancia.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerUrls {
    pub submit: String,
    pub save: String,
}

impl HandlerUrls {
    pub fn resolve(handler_base: &str, identity: &WidgetIdentity) -> Self {
        let base = handler_base.trim().trim_end_matches('/');
        let handler = |name: &str| format!("{base}/{}/handler/{name}", identity.as_str());
        Self {
            submit: handler(SUBMIT_HANDLER),
            save: handler(SAVE_HANDLER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_handlers_under_usage_id() {
        let urls = HandlerUrls::resolve(
            "http://127.0.0.1:8000/xblock/",
            &WidgetIdentity::new("block-v1:demo+type@freetextresponse+block@q1"),
        );
        assert_eq!(
            urls.submit,
            "http://127.0.0.1:8000/xblock/block-v1:demo+type@freetextresponse+block@q1/handler/submit"
        );
        assert!(urls.save.ends_with("/handler/save_reponse"));
    }

    #[test]
    fn noop_notifier_accepts_every_event() {
        let notifier = NoopNotifier;
        for event in [HostEvent::Submit, HostEvent::Save, HostEvent::Error] {
            notifier.notify(event, serde_json::json!({}));
        }
    }
}
