//! Caché compartida por todos los widgets de una misma página.
//!
//! Vive mientras vive la sesión de página: se crea vacía al cargar, solo se
//! escribe cuando el servidor confirma un submit/save y solo se lee al
//! (re)construir un widget. Se destruye al cerrar la página.

use crate::model::{CacheEntry, WidgetIdentity};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

const CACHED_ANSWER_SUFFIX: &str = "_cached_answer";
const PROBLEM_PROGRESS_SUFFIX: &str = "_problem_progress";
const USED_ATTEMPTS_SUFFIX: &str = "_used_attempts_feedback";

/// Manejador de la caché. Clonarlo comparte el mismo almacén.
#[derive(Clone, Debug, Default)]
pub struct ResponseCache {
    slots: Rc<RefCell<HashMap<String, String>>>,
}

fn slot_key(identity: &WidgetIdentity, suffix: &str) -> String {
    format!("{}{}", identity.as_str(), suffix)
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hay entrada solo si existe la respuesta cacheada; el resto de campos
    /// pueden faltar y se leen como vacíos.
    pub fn get(&self, identity: &WidgetIdentity) -> Option<CacheEntry> {
        let slots = self.slots.borrow();
        let draft_text = slots.get(&slot_key(identity, CACHED_ANSWER_SUFFIX))?.clone();
        let read = |suffix| {
            slots
                .get(&slot_key(identity, suffix))
                .cloned()
                .unwrap_or_default()
        };

        Some(CacheEntry {
            draft_text,
            progress_text: read(PROBLEM_PROGRESS_SUFFIX),
            used_attempts_text: read(USED_ATTEMPTS_SUFFIX),
        })
    }

    pub fn put(&self, identity: &WidgetIdentity, entry: CacheEntry) {
        log::debug!("caché actualizada para {identity}");
        let mut slots = self.slots.borrow_mut();
        slots.insert(slot_key(identity, CACHED_ANSWER_SUFFIX), entry.draft_text);
        slots.insert(slot_key(identity, PROBLEM_PROGRESS_SUFFIX), entry.progress_text);
        slots.insert(slot_key(identity, USED_ATTEMPTS_SUFFIX), entry.used_attempts_text);
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}
