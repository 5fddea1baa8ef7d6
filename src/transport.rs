use crate::error::TransportError;
use crate::model::{ActionKind, PeerResponse};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::mpsc::Sender;

#[derive(Debug, Serialize)]
struct AnswerBody<'a> {
    student_answer: &'a str,
}

/// Petición pendiente de enviar a uno de los dos handlers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerPost {
    pub kind: ActionKind,
    pub url: String,
    pub student_answer: String,
}

impl AnswerPost {
    pub fn body_json(&self) -> Result<String, TransportError> {
        serde_json::to_string(&AnswerBody {
            student_answer: &self.student_answer,
        })
        .map_err(|err| TransportError::Body(format!("no se pudo serializar la respuesta: {err}")))
    }

    pub fn complete(self, outcome: Result<FeedbackResponse, TransportError>) -> Completion {
        Completion {
            kind: self.kind,
            sent_answer: self.student_answer,
            outcome,
        }
    }
}

/// Resultado de una petición, entregado al hilo de UI por el canal.
#[derive(Clone, Debug)]
pub struct Completion {
    pub kind: ActionKind,
    pub sent_answer: String,
    pub outcome: Result<FeedbackResponse, TransportError>,
}

/// Respuesta de submit/save. Los campos que faltan o no tienen el tipo
/// esperado se leen como `None` y no tocan la UI.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FeedbackResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub used_attempts_feedback: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nodisplay_class: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub problem_progress: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub submitted_message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_alert: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub indicator_class: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub visibility_class: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub display_other_responses: Option<bool>,
    #[serde(default, deserialize_with = "lenient_peers")]
    pub other_responses: Option<Vec<PeerResponse>>,
}

impl FeedbackResponse {
    /// Solo un objeto JSON cuenta como respuesta; cualquier otra cosa es un
    /// error del backend.
    pub fn from_json(text: &str) -> Result<Self, TransportError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| TransportError::Body(format!("JSON inválido: {err}")))?;
        if !value.is_object() {
            return Err(TransportError::Body(
                "la respuesta no es un objeto JSON".into(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|err| TransportError::Body(format!("JSON inválido: {err}")))
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(de: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::Bool(b)) => Some(b),
        _ => None,
    })
}

fn lenient_peers<'de, D: Deserializer<'de>>(
    de: D,
) -> Result<Option<Vec<PeerResponse>>, D::Error> {
    Ok(Option::<Value>::deserialize(de)?.and_then(|v| serde_json::from_value(v).ok()))
}

/// Envía una petición y publica el `Completion` en `reply` cuando termina.
/// Nunca bloquea el hilo que llama.
pub trait Transport {
    fn post_answer(&self, request: AnswerPost, reply: Sender<Completion>);
}

/// Cliente HTTP real: hilo + `reqwest` en nativo, `fetch` en WASM.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    #[cfg(not(target_arch = "wasm32"))]
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Transport for HttpTransport {
    fn post_answer(&self, request: AnswerPost, reply: Sender<Completion>) {
        let client = self.client.clone();
        std::thread::spawn(move || {
            let outcome = post_blocking(&client, &request);
            if let Err(err) = &outcome {
                log::warn!("{} falló: {err}", request.kind.event_name());
            }
            let _ = reply.send(request.complete(outcome));
        });
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn post_blocking(
    client: &reqwest::blocking::Client,
    request: &AnswerPost,
) -> Result<FeedbackResponse, TransportError> {
    let body = request.body_json()?;
    let response = client
        .post(&request.url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .map_err(|err| TransportError::Network {
            url: request.url.clone(),
            message: err.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            url: request.url.clone(),
            status: status.as_u16(),
        });
    }

    let text = response
        .text()
        .map_err(|err| TransportError::Body(format!("no se pudo leer el body: {err}")))?;
    FeedbackResponse::from_json(&text)
}

#[cfg(target_arch = "wasm32")]
impl Transport for HttpTransport {
    fn post_answer(&self, request: AnswerPost, reply: Sender<Completion>) {
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = post_fetch(&request).await;
            if let Err(err) = &outcome {
                log::warn!("{} falló: {err}", request.kind.event_name());
            }
            let _ = reply.send(request.complete(outcome));
        });
    }
}

#[cfg(target_arch = "wasm32")]
async fn post_fetch(request: &AnswerPost) -> Result<FeedbackResponse, TransportError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let network = |message: String| TransportError::Network {
        url: request.url.clone(),
        message,
    };

    let body = request.body_json()?;
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::SameOrigin);
    opts.set_body(&JsValue::from_str(&body));

    let window = web_sys::window().ok_or_else(|| network("no existe window".into()))?;
    let fetch_request = Request::new_with_str_and_init(&request.url, &opts)
        .map_err(|err| network(format!("no se pudo crear el request: {err:?}")))?;
    fetch_request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|err| network(format!("no se pudieron asignar headers: {err:?}")))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&fetch_request))
        .await
        .map_err(|err| network(format!("fetch falló: {err:?}")))?;
    let response: Response = resp_value
        .dyn_into()
        .map_err(|_| network("la respuesta no es un Response".into()))?;

    if !response.ok() {
        return Err(TransportError::Status {
            url: request.url.clone(),
            status: response.status(),
        });
    }

    let promise = response
        .text()
        .map_err(|err| TransportError::Body(format!("{err:?}")))?;
    let text = JsFuture::from(promise)
        .await
        .ok()
        .and_then(|v| v.as_string())
        .ok_or_else(|| TransportError::Body("response.text() no devolvió string".into()))?;

    FeedbackResponse::from_json(&text)
}
