use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifica una instancia del widget en la página (`data-usage-id`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetIdentity(String);

impl WidgetIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorClass {
    Correct,
    Incorrect,
    #[default]
    Unanswered,
}

impl IndicatorClass {
    /// Nombre de clase CSS tal como lo envía el backend.
    pub fn css_class(self) -> &'static str {
        match self {
            IndicatorClass::Correct => "correct",
            IndicatorClass::Incorrect => "incorrect",
            IndicatorClass::Unanswered => "unanswered",
        }
    }

    pub fn from_css_class(value: &str) -> Option<Self> {
        match value.trim() {
            "correct" => Some(IndicatorClass::Correct),
            "incorrect" => Some(IndicatorClass::Incorrect),
            "unanswered" => Some(IndicatorClass::Unanswered),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Submit,
    Save,
}

impl ActionKind {
    /// Nombre del evento que recibe el canal de notificaciones del host.
    pub fn event_name(self) -> &'static str {
        match self {
            ActionKind::Submit => "submit",
            ActionKind::Save => "save",
        }
    }
}

/// Respuesta de otro estudiante, en el orden que decide el servidor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerResponse {
    pub student_email: String,
    pub answer: String,
}

impl PeerResponse {
    pub fn new(student_email: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            student_email: student_email.into(),
            answer: answer.into(),
        }
    }
}

/// Estado reconocido por el servidor que se guarda en la caché de página.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheEntry {
    pub draft_text: String,
    pub progress_text: String,
    pub used_attempts_text: String,
}

/// Lo que el servidor pintó en la primera carga del widget.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InitialContext {
    #[serde(default)]
    pub student_answer: String,
    #[serde(default)]
    pub indicator_class: IndicatorClass,
    #[serde(default)]
    pub problem_progress: String,
    #[serde(default)]
    pub used_attempts_feedback: String,
    #[serde(default)]
    pub nodisplay_class: String,
    #[serde(default)]
    pub visibility_class: String,
    #[serde(default)]
    pub display_other_responses: bool,
    #[serde(default)]
    pub other_responses: Vec<PeerResponse>,
}
