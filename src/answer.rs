//! Máquina de estados de la caja de respuesta y de los botones Enviar/Guardar.

use crate::cache::ResponseCache;
use crate::config::Labels;
use crate::error::MalformedField;
use crate::host::{HandlerUrls, HostEvent, Notifier};
use crate::model::{ActionKind, CacheEntry, IndicatorClass, InitialContext, WidgetIdentity};
use crate::responses::{self, ResponseTable};
use crate::transport::{AnswerPost, Completion, FeedbackResponse, Transport};
use serde_json::json;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, channel};

const HIDDEN_VISIBILITY_CLASS: &str = "hidden";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerState {
    Unanswered,
    Editing,
    Submitting,
    Saving,
    Answered(IndicatorClass),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Sent,
    AlreadyInFlight,
    ControlsHidden,
}

/// Botón de acción. La etiqueta "comprobando" va ligada a que haya una
/// petición en vuelo, no se escribe a mano.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionButton {
    default_label: String,
    checking_label: String,
    in_flight: bool,
}

impl ActionButton {
    pub fn new(default_label: impl Into<String>, checking_label: impl Into<String>) -> Self {
        Self {
            default_label: default_label.into(),
            checking_label: checking_label.into(),
            in_flight: false,
        }
    }

    pub fn label(&self) -> &str {
        if self.in_flight {
            &self.checking_label
        } else {
            &self.default_label
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }
}

/// Lo que el backend decide mostrar tras un intento.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttemptFeedback {
    pub used_attempts_text: String,
    pub progress_text: String,
    pub submitted_message: String,
    pub user_alert: String,
    pub indicator_class: IndicatorClass,
    pub controls_hidden: bool,
    pub indicator_hidden: bool,
}

impl AttemptFeedback {
    fn from_initial(initial: &InitialContext) -> Self {
        Self {
            used_attempts_text: initial.used_attempts_feedback.clone(),
            progress_text: initial.problem_progress.clone(),
            submitted_message: String::new(),
            user_alert: String::new(),
            indicator_class: initial.indicator_class,
            controls_hidden: !initial.nodisplay_class.trim().is_empty(),
            indicator_hidden: initial.visibility_class.trim() == HIDDEN_VISIBILITY_CLASS,
        }
    }
}

/// Colaboradores externos que la máquina usa para hablar con el host.
#[derive(Clone)]
pub struct WidgetServices {
    pub transport: Rc<dyn Transport>,
    pub notifier: Rc<dyn Notifier>,
    pub cache: ResponseCache,
    pub urls: HandlerUrls,
}

pub struct AnswerStateMachine {
    identity: WidgetIdentity,
    services: WidgetServices,
    draft: String,
    feedback: AttemptFeedback,
    settled: AnswerState,
    submit_button: ActionButton,
    save_button: ActionButton,
    responses: ResponseTable,
    responses_box_visible: bool,
    no_responses_text: String,
    reply_tx: Sender<Completion>,
    reply_rx: Receiver<Completion>,
}

impl AnswerStateMachine {
    pub fn new(
        identity: WidgetIdentity,
        services: WidgetServices,
        labels: &Labels,
        initial: &InitialContext,
    ) -> Self {
        let (reply_tx, reply_rx) = channel();
        Self {
            identity,
            services,
            draft: initial.student_answer.clone(),
            feedback: AttemptFeedback::from_initial(initial),
            settled: AnswerState::Unanswered,
            submit_button: ActionButton::new(&labels.submit, &labels.submit_checking),
            save_button: ActionButton::new(&labels.save, &labels.save_checking),
            responses: responses::render(&initial.other_responses, &labels.no_responses),
            responses_box_visible: initial.display_other_responses,
            no_responses_text: labels.no_responses.clone(),
            reply_tx,
            reply_rx,
        }
    }

    pub fn identity(&self) -> &WidgetIdentity {
        &self.identity
    }

    /// Estado visible. Una petición en vuelo manda sobre el estado asentado;
    /// si hay dos (submit y save), se muestra el submit.
    pub fn state(&self) -> AnswerState {
        if self.submit_button.in_flight {
            AnswerState::Submitting
        } else if self.save_button.in_flight {
            AnswerState::Saving
        } else {
            self.settled
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn feedback(&self) -> &AttemptFeedback {
        &self.feedback
    }

    pub fn submit_button(&self) -> &ActionButton {
        &self.submit_button
    }

    pub fn save_button(&self) -> &ActionButton {
        &self.save_button
    }

    pub fn responses(&self) -> &ResponseTable {
        &self.responses
    }

    pub fn responses_box_visible(&self) -> bool {
        self.responses_box_visible
    }

    /// Texto nuevo en la caja de respuesta.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.on_key_input();
    }

    /// Borra mensajes y vuelve el indicador a `unanswered`. No toca la red.
    pub fn on_key_input(&mut self) {
        self.feedback.submitted_message.clear();
        self.feedback.user_alert.clear();
        self.feedback.indicator_class = IndicatorClass::Unanswered;
        self.settled = AnswerState::Editing;
    }

    pub fn submit(&mut self) -> Dispatch {
        self.dispatch(ActionKind::Submit)
    }

    pub fn save(&mut self) -> Dispatch {
        self.dispatch(ActionKind::Save)
    }

    /// Rellena la caja y los textos de progreso desde la caché de página.
    /// El indicador se queda como esté.
    pub fn restore_from_cache(&mut self, entry: CacheEntry) {
        log::debug!("{}: restaurando desde caché", self.identity);
        self.draft = entry.draft_text;
        self.feedback.progress_text = entry.progress_text;
        self.feedback.used_attempts_text = entry.used_attempts_text;
        self.settled = AnswerState::Answered(self.feedback.indicator_class);
    }

    /// Aplica las respuestas que hayan llegado. Devuelve cuántas.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.reply_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    pub fn has_pending_requests(&self) -> bool {
        self.submit_button.in_flight || self.save_button.in_flight
    }

    fn button_mut(&mut self, kind: ActionKind) -> &mut ActionButton {
        match kind {
            ActionKind::Submit => &mut self.submit_button,
            ActionKind::Save => &mut self.save_button,
        }
    }

    fn dispatch(&mut self, kind: ActionKind) -> Dispatch {
        if self.feedback.controls_hidden {
            log::debug!("{}: {} ignorado, controles ocultos", self.identity, kind.event_name());
            return Dispatch::ControlsHidden;
        }
        if self.button_mut(kind).in_flight {
            log::debug!("{}: {} ya en vuelo", self.identity, kind.event_name());
            return Dispatch::AlreadyInFlight;
        }

        self.button_mut(kind).in_flight = true;
        let (event, message) = match kind {
            ActionKind::Submit => (HostEvent::Submit, "Submitting..."),
            ActionKind::Save => (HostEvent::Save, "Saving..."),
        };
        self.services
            .notifier
            .notify(event, json!({ "message": message, "state": "start" }));

        let url = match kind {
            ActionKind::Submit => self.services.urls.submit.clone(),
            ActionKind::Save => self.services.urls.save.clone(),
        };
        log::debug!("{}: POST {url}", self.identity);
        self.services.transport.post_answer(
            AnswerPost {
                kind,
                url,
                student_answer: self.draft.clone(),
            },
            self.reply_tx.clone(),
        );
        Dispatch::Sent
    }

    fn apply(&mut self, completion: Completion) {
        let Completion {
            kind,
            sent_answer,
            outcome,
        } = completion;

        // La etiqueta vuelve a su valor por defecto pase lo que pase.
        self.button_mut(kind).in_flight = false;

        match outcome {
            Ok(reply) => self.apply_reply(kind, sent_answer, reply),
            Err(err) => {
                log::warn!("{}: {} falló: {err}", self.identity, kind.event_name());
                self.services.notifier.notify(HostEvent::Error, json!({}));
            }
        }
    }

    fn apply_reply(&mut self, kind: ActionKind, sent_answer: String, reply: FeedbackResponse) {
        let FeedbackResponse {
            used_attempts_feedback,
            nodisplay_class,
            problem_progress,
            submitted_message,
            user_alert,
            indicator_class,
            visibility_class,
            display_other_responses: _,
            other_responses,
        } = reply;

        let id = self.identity.clone();
        let feedback = &mut self.feedback;
        if let Some(text) = expected(&id, "used_attempts_feedback", used_attempts_feedback) {
            feedback.used_attempts_text = text;
        }
        if let Some(class) = expected(&id, "nodisplay_class", nodisplay_class) {
            // addClass: una vez ocultos, siguen ocultos.
            feedback.controls_hidden |= !class.trim().is_empty();
        }
        if let Some(text) = expected(&id, "problem_progress", problem_progress) {
            feedback.progress_text = text;
        }
        if let Some(text) = expected(&id, "submitted_message", submitted_message) {
            feedback.submitted_message = text;
        }
        if let Some(text) = expected(&id, "user_alert", user_alert) {
            feedback.user_alert = text;
        }
        if let Some(class) = visibility_class {
            feedback.indicator_hidden = class.trim() == HIDDEN_VISIBILITY_CLASS;
        }
        if kind == ActionKind::Submit {
            let parsed = expected(&id, "indicator_class", indicator_class).and_then(|class| {
                let parsed = IndicatorClass::from_css_class(&class);
                if parsed.is_none() {
                    log::warn!("{id}: indicator_class desconocido `{class}`");
                }
                parsed
            });
            if let Some(indicator) = parsed {
                feedback.indicator_class = indicator;
            }
        }

        // Si el usuario siguió escribiendo mientras tanto, su texto manda.
        if self.draft == sent_answer {
            self.settled = AnswerState::Answered(self.feedback.indicator_class);
        }

        self.services.cache.put(
            &self.identity,
            CacheEntry {
                draft_text: sent_answer,
                progress_text: self.feedback.progress_text.clone(),
                used_attempts_text: self.feedback.used_attempts_text.clone(),
            },
        );

        if kind == ActionKind::Submit {
            if let Some(peers) = other_responses {
                self.responses = responses::render(&peers, &self.no_responses_text);
                self.responses_box_visible = true;
            }
        }

        let event = match kind {
            ActionKind::Submit => HostEvent::Submit,
            ActionKind::Save => HostEvent::Save,
        };
        self.services
            .notifier
            .notify(event, json!({ "state": "end" }));
    }
}

fn expected(id: &WidgetIdentity, field: &'static str, value: Option<String>) -> Option<String> {
    if value.is_none() {
        log::warn!("{id}: {}", MalformedField { field });
    }
    value
}
