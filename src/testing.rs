//! Dobles de prueba para transporte y notificaciones.

use crate::error::TransportError;
use crate::host::{HostEvent, Notifier};
use crate::transport::{AnswerPost, Completion, FeedbackResponse, Transport};
use serde_json::Value;
use std::cell::RefCell;
use std::sync::mpsc::Sender;

/// Guarda cada petición y deja que el test decida cuándo y cómo responde.
#[derive(Default)]
pub struct FakeTransport {
    pending: RefCell<Vec<(AnswerPost, Sender<Completion>)>>,
    sent: RefCell<Vec<AnswerPost>>,
}

impl FakeTransport {
    pub fn sent(&self) -> Vec<AnswerPost> {
        self.sent.borrow().clone()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Responde la petición pendiente más antigua con el JSON dado.
    pub fn reply_json(&self, json: &str) {
        let outcome = FeedbackResponse::from_json(json);
        self.reply(outcome);
    }

    pub fn reply_error(&self) {
        self.reply(Err(TransportError::Status {
            url: "fake".into(),
            status: 500,
        }));
    }

    fn reply(&self, outcome: Result<FeedbackResponse, TransportError>) {
        let (post, reply) = self.pending.borrow_mut().remove(0);
        reply.send(post.complete(outcome)).unwrap();
    }
}

impl Transport for FakeTransport {
    fn post_answer(&self, request: AnswerPost, reply: Sender<Completion>) {
        self.sent.borrow_mut().push(request.clone());
        self.pending.borrow_mut().push((request, reply));
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    events: RefCell<Vec<(HostEvent, Value)>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<(HostEvent, Value)> {
        self.events.borrow().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(|(e, _)| e.name()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: HostEvent, payload: Value) {
        self.events.borrow_mut().push((event, payload));
    }
}
