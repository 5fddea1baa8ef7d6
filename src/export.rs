//! Exportación de la tabla de respuestas visible a un fichero CSV.

use crate::error::ExportError;

pub const DEFAULT_FILENAME: &str = "responses.csv";
pub const CSV_MIME: &str = "text/csv";

/// Cualquier tabla ya pintada de la que podemos leer el texto de las celdas.
pub trait RenderedTable {
    /// Filas en orden de documento (cabecera incluida), con el texto visible
    /// de cada celda.
    fn visible_rows(&self) -> Vec<Vec<String>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvFile {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Destino de la descarga (disco en nativo, `<a download>` en el navegador).
pub trait DownloadSink {
    /// Devuelve una descripción legible de dónde quedó el fichero.
    fn deliver(&self, file: &CsvFile) -> Result<String, ExportError>;
}

/// Columnas separadas por tabulador, filas por salto de línea, sin salto
/// final.
pub fn table_to_csv(table: &dyn RenderedTable) -> Result<String, ExportError> {
    let lines = table
        .visible_rows()
        .iter()
        .map(|row| encode_row(row))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

fn encode_row(row: &[String]) -> Result<String, ExportError> {
    // csv escribe `""` para un registro de un único campo vacío.
    if let [only] = row {
        if only.is_empty() {
            return Ok(String::new());
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record(row)?;

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    let mut line = String::from_utf8_lossy(&bytes).into_owned();
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}

/// Lee lo que hay pintado ahora mismo y lo entrega al `sink`.
pub fn export_csv(
    table: &dyn RenderedTable,
    filename: &str,
    sink: &dyn DownloadSink,
) -> Result<String, ExportError> {
    let csv = table_to_csv(table)?;
    let file = CsvFile {
        filename: filename.to_string(),
        mime: CSV_MIME,
        bytes: csv.into_bytes(),
    };
    let location = sink.deliver(&file)?;
    log::info!("exportadas respuestas a {location}");
    Ok(location)
}

/// Guarda el fichero en un directorio local.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Debug)]
pub struct DirectorySink {
    pub dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl DirectorySink {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn current_dir() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl DownloadSink for DirectorySink {
    fn deliver(&self, file: &CsvFile) -> Result<String, ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&file.filename);
        std::fs::write(&path, &file.bytes)?;
        Ok(path.display().to_string())
    }
}

/// Crea un Blob y pulsa un enlace oculto con `download=<filename>`.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSink;

#[cfg(target_arch = "wasm32")]
impl DownloadSink for BrowserSink {
    fn deliver(&self, file: &CsvFile) -> Result<String, ExportError> {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let platform = |err: wasm_bindgen::JsValue| ExportError::Platform(format!("{err:?}"));

        let window = web_sys::window()
            .ok_or_else(|| ExportError::Platform("no existe window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| ExportError::Platform("no existe document".into()))?;
        let body = document
            .body()
            .ok_or_else(|| ExportError::Platform("no existe body".into()))?;

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(file.bytes.as_slice()));
        let props = BlobPropertyBag::new();
        props.set_type(file.mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &props).map_err(platform)?;
        let url = Url::create_object_url_with_blob(&blob).map_err(platform)?;

        let link: HtmlAnchorElement = document
            .create_element("a")
            .map_err(platform)?
            .dyn_into()
            .map_err(|_| ExportError::Platform("no se pudo crear <a>".into()))?;
        link.set_download(&file.filename);
        link.set_href(&url);
        link.style().set_property("display", "none").map_err(platform)?;
        body.append_child(&link).map_err(platform)?;
        link.click();
        body.remove_child(&link).map_err(platform)?;
        Url::revoke_object_url(&url).map_err(platform)?;

        Ok(file.filename.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Grid(Vec<Vec<String>>);

    impl RenderedTable for Grid {
        fn visible_rows(&self) -> Vec<Vec<String>> {
            self.0.clone()
        }
    }

    fn grid(rows: &[&[&str]]) -> Grid {
        Grid(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[derive(Default)]
    struct RecordingSink(RefCell<Vec<CsvFile>>);

    impl DownloadSink for RecordingSink {
        fn deliver(&self, file: &CsvFile) -> Result<String, ExportError> {
            self.0.borrow_mut().push(file.clone());
            Ok(file.filename.clone())
        }
    }

    #[test]
    fn two_by_three_table_gives_two_tab_separated_lines() {
        let table = grid(&[&["1", "a@x.com", "42"], &["2", "b@x.com", "7"]]);
        let csv = table_to_csv(&table).unwrap();

        assert_eq!(csv, "1\ta@x.com\t42\n2\tb@x.com\t7");
        for line in csv.lines() {
            assert_eq!(line.split('\t').count(), 3);
        }
    }

    #[test]
    fn cell_text_is_written_verbatim() {
        let table = grid(&[&["#", "Email", "Respuesta"], &["1", "a@x.com", "dijo \"sí\", vale"]]);
        let csv = table_to_csv(&table).unwrap();

        assert_eq!(csv, "#\tEmail\tRespuesta\n1\ta@x.com\tdijo \"sí\", vale");
    }

    #[test]
    fn empty_state_row_exports_its_message() {
        let table = grid(&[&["#", "Email", "Respuesta"], &["Sin respuestas"]]);
        assert_eq!(
            table_to_csv(&table).unwrap(),
            "#\tEmail\tRespuesta\nSin respuestas"
        );
    }

    #[test]
    fn empty_cells_are_exported_as_empty_text() {
        let table = grid(&[&["#", "Email", "Answer"], &["1", "a@x.com", ""], &[""]]);
        assert_eq!(
            table_to_csv(&table).unwrap(),
            "#\tEmail\tAnswer\n1\ta@x.com\t\n"
        );
    }

    #[test]
    fn export_hands_a_csv_blob_to_the_sink() {
        let sink = RecordingSink::default();
        let table = grid(&[&["1", "a@x.com", "42"]]);

        let location = export_csv(&table, DEFAULT_FILENAME, &sink).unwrap();

        assert_eq!(location, "responses.csv");
        let files = sink.0.borrow();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].mime, "text/csv");
        assert_eq!(files[0].bytes, b"1\ta@x.com\t42".to_vec());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        let table = grid(&[&["1", "a@x.com", "42"]]);

        export_csv(&table, DEFAULT_FILENAME, &sink).unwrap();

        let written = std::fs::read_to_string(dir.path().join("responses.csv")).unwrap();
        assert_eq!(written, "1\ta@x.com\t42");
    }
}
