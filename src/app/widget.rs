use crate::answer::{AnswerStateMachine, Dispatch, WidgetServices};
use crate::config::{Labels, UnitConfig};
use crate::error::ExportError;
use crate::export::{self, DownloadSink, RenderedTable};
use crate::model::WidgetIdentity;
use crate::responses::ResponseTable;

/// Tabla de respuestas tal como está pintada: cabecera + filas actuales.
pub struct RenderedResponses<'a> {
    pub header: &'a [String],
    pub table: &'a ResponseTable,
}

impl RenderedTable for RenderedResponses<'_> {
    fn visible_rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(self.table.rows.len() + 1);
        if !self.header.is_empty() {
            rows.push(self.header.to_vec());
        }
        rows.extend(self.table.rows.iter().map(|row| row.cells()));
        rows
    }
}

/// Raíz de composición de un widget: recibe los eventos de la vista y se
/// los pasa a la máquina de estados.
pub struct WidgetController {
    pub display_name: String,
    pub prompt: String,
    pub message: String,
    machine: AnswerStateMachine,
    labels: Labels,
    export_filename: String,
    response_list_shown: bool,
}

impl WidgetController {
    /// Monta el widget y, si la página ya tiene caché para él, la restaura
    /// sin ir al servidor.
    pub fn initialize(
        unit: &UnitConfig,
        services: WidgetServices,
        labels: &Labels,
        export_filename: &str,
    ) -> Self {
        let cached = services.cache.get(&unit.usage_id);
        let mut machine =
            AnswerStateMachine::new(unit.usage_id.clone(), services, labels, &unit.initial);
        if let Some(entry) = cached {
            machine.restore_from_cache(entry);
        }

        Self {
            display_name: unit.display_name.clone(),
            prompt: unit.prompt.clone(),
            message: String::new(),
            machine,
            labels: labels.clone(),
            export_filename: export_filename.to_string(),
            response_list_shown: true,
        }
    }

    pub fn identity(&self) -> &WidgetIdentity {
        self.machine.identity()
    }

    pub fn machine(&self) -> &AnswerStateMachine {
        &self.machine
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn poll(&mut self) -> usize {
        self.machine.poll()
    }

    pub fn has_pending_requests(&self) -> bool {
        self.machine.has_pending_requests()
    }

    pub fn on_text_changed(&mut self, text: impl Into<String>) {
        self.machine.edit(text);
    }

    pub fn on_submit_clicked(&mut self) -> Dispatch {
        self.machine.submit()
    }

    pub fn on_save_clicked(&mut self) -> Dispatch {
        self.machine.save()
    }

    /// Botón ocultar/mostrar de la lista de respuestas.
    pub fn on_toggle_responses(&mut self) {
        self.response_list_shown = !self.response_list_shown;
    }

    pub fn response_list_shown(&self) -> bool {
        self.response_list_shown
    }

    pub fn toggle_label(&self) -> &str {
        if self.response_list_shown {
            &self.labels.hide_responses
        } else {
            &self.labels.show_responses
        }
    }

    pub fn rendered_responses(&self) -> RenderedResponses<'_> {
        RenderedResponses {
            header: &self.labels.table_header,
            table: self.machine.responses(),
        }
    }

    pub fn on_export_clicked(&mut self, sink: &dyn DownloadSink) -> Result<String, ExportError> {
        let result = export::export_csv(&self.rendered_responses(), &self.export_filename, sink);
        self.message = match &result {
            Ok(location) => format!("📄 Respuestas exportadas a {location}"),
            Err(err) => format!("⚠ No se pudo exportar: {err}"),
        };
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerState;
    use crate::cache::ResponseCache;
    use crate::export::CsvFile;
    use crate::host::HandlerUrls;
    use crate::model::{CacheEntry, IndicatorClass, InitialContext};
    use crate::testing::{FakeTransport, RecordingNotifier};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingSink(RefCell<Vec<CsvFile>>);

    impl DownloadSink for RecordingSink {
        fn deliver(&self, file: &CsvFile) -> Result<String, ExportError> {
            self.0.borrow_mut().push(file.clone());
            Ok(file.filename.clone())
        }
    }

    fn unit(initial: InitialContext) -> UnitConfig {
        UnitConfig {
            usage_id: WidgetIdentity::new("q1"),
            display_name: "Pregunta 1".into(),
            prompt: "¿Qué es un puntero?".into(),
            initial,
        }
    }

    fn services(cache: &ResponseCache, transport: &Rc<FakeTransport>) -> WidgetServices {
        WidgetServices {
            transport: transport.clone(),
            notifier: Rc::new(RecordingNotifier::default()),
            cache: cache.clone(),
            urls: HandlerUrls::resolve("/xblock", &WidgetIdentity::new("q1")),
        }
    }

    #[test]
    fn first_load_without_cache_uses_server_context() {
        let cache = ResponseCache::new();
        let transport = Rc::new(FakeTransport::default());
        let widget = WidgetController::initialize(
            &unit(InitialContext {
                student_answer: "guardado en servidor".into(),
                ..InitialContext::default()
            }),
            services(&cache, &transport),
            &Labels::default(),
            "responses.csv",
        );

        assert_eq!(widget.machine().draft(), "guardado en servidor");
        assert_eq!(widget.machine().state(), AnswerState::Unanswered);
    }

    #[test]
    fn first_load_with_cache_restores_without_requests() {
        let cache = ResponseCache::new();
        let transport = Rc::new(FakeTransport::default());
        cache.put(
            &WidgetIdentity::new("q1"),
            CacheEntry {
                draft_text: "de la caché".into(),
                progress_text: "(1/1 point)".into(),
                used_attempts_text: "You have used 1 of 3 submissions".into(),
            },
        );

        let widget = WidgetController::initialize(
            &unit(InitialContext {
                student_answer: "viejo".into(),
                indicator_class: IndicatorClass::Incorrect,
                ..InitialContext::default()
            }),
            services(&cache, &transport),
            &Labels::default(),
            "responses.csv",
        );

        assert_eq!(widget.machine().draft(), "de la caché");
        assert_eq!(widget.machine().feedback().progress_text, "(1/1 point)");
        assert_eq!(
            widget.machine().state(),
            AnswerState::Answered(IndicatorClass::Incorrect)
        );
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn toggle_flips_list_and_label() {
        let cache = ResponseCache::new();
        let transport = Rc::new(FakeTransport::default());
        let mut widget = WidgetController::initialize(
            &unit(InitialContext::default()),
            services(&cache, &transport),
            &Labels::default(),
            "responses.csv",
        );

        assert!(widget.response_list_shown());
        assert_eq!(widget.toggle_label(), "Hide responses");
        widget.on_toggle_responses();
        assert!(!widget.response_list_shown());
        assert_eq!(widget.toggle_label(), "Show responses");
    }

    #[test]
    fn export_reads_what_is_rendered_now() {
        let cache = ResponseCache::new();
        let transport = Rc::new(FakeTransport::default());
        let mut widget = WidgetController::initialize(
            &unit(InitialContext::default()),
            services(&cache, &transport),
            &Labels::default(),
            "responses.csv",
        );
        let sink = RecordingSink::default();

        widget.on_export_clicked(&sink).unwrap();

        widget.on_text_changed("42");
        widget.on_submit_clicked();
        transport.reply_json(
            r#"{"indicator_class": "correct",
                "other_responses": [{"student_email": "a@x.com", "answer": "42"},
                                    {"student_email": "b@x.com", "answer": "7"}]}"#,
        );
        widget.poll();
        widget.on_export_clicked(&sink).unwrap();

        let files = sink.0.borrow();
        assert_eq!(files[0].filename, "responses.csv");
        assert_eq!(
            String::from_utf8(files[0].bytes.clone()).unwrap(),
            "#\tEmail\tAnswer\nNo responses yet"
        );
        assert_eq!(
            String::from_utf8(files[1].bytes.clone()).unwrap(),
            "#\tEmail\tAnswer\n1\ta@x.com\t42\n2\tb@x.com\t7"
        );
        assert!(widget.message.contains("responses.csv"));
    }

    struct FailingSink;

    impl DownloadSink for FailingSink {
        fn deliver(&self, _file: &CsvFile) -> Result<String, ExportError> {
            Err(ExportError::Platform("sin permisos".into()))
        }
    }

    #[test]
    fn failed_export_is_reported_to_the_user() {
        let cache = ResponseCache::new();
        let transport = Rc::new(FakeTransport::default());
        let mut widget = WidgetController::initialize(
            &unit(InitialContext::default()),
            services(&cache, &transport),
            &Labels::default(),
            "responses.csv",
        );

        assert!(widget.on_export_clicked(&FailingSink).is_err());
        assert!(widget.message.contains("sin permisos"));
    }

    #[test]
    fn blank_empty_state_exports_as_blank_line() {
        let cache = ResponseCache::new();
        let transport = Rc::new(FakeTransport::default());
        let labels = Labels {
            no_responses: String::new(),
            ..Labels::default()
        };
        let mut widget = WidgetController::initialize(
            &unit(InitialContext::default()),
            services(&cache, &transport),
            &labels,
            "responses.csv",
        );
        let sink = RecordingSink::default();

        widget.on_export_clicked(&sink).unwrap();

        let files = sink.0.borrow();
        assert_eq!(
            String::from_utf8(files[0].bytes.clone()).unwrap(),
            "#\tEmail\tAnswer\n"
        );
    }
}
