use crate::model::PeerResponse;

/// Columnas de datos que ocupa la fila de "sin respuestas".
pub const EMPTY_ROW_COLSPAN: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseRow {
    Entry {
        position: usize,
        student_email: String,
        answer: String,
    },
    Empty {
        message: String,
        colspan: usize,
    },
}

impl ResponseRow {
    /// Texto visible de cada celda, en orden de columna.
    pub fn cells(&self) -> Vec<String> {
        match self {
            ResponseRow::Entry {
                position,
                student_email,
                answer,
            } => vec![position.to_string(), student_email.clone(), answer.clone()],
            ResponseRow::Empty { message, .. } => vec![message.clone()],
        }
    }
}

/// Fragmento de tabla con las respuestas de los compañeros.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseTable {
    pub rows: Vec<ResponseRow>,
}

impl ResponseTable {
    pub fn is_empty_state(&self) -> bool {
        matches!(self.rows.as_slice(), [ResponseRow::Empty { .. }])
    }

    /// Marcado `<tr>` equivalente al que pintaba el widget web.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for row in &self.rows {
            match row {
                ResponseRow::Entry {
                    position,
                    student_email,
                    answer,
                } => {
                    html.push_str(&format!(
                        "<tr class=\"\"><td>{position}</td><td>{}</td><td>{}</td></tr>",
                        escape_html(student_email),
                        escape_html(answer)
                    ));
                }
                ResponseRow::Empty { message, colspan } => {
                    html.push_str(&format!(
                        "<tr class=\"\"><td colspan=\"{colspan}\">{}</td></tr>",
                        escape_html(message)
                    ));
                }
            }
        }
        html
    }
}

/// Convierte la lista de respuestas en filas. Función pura: se puede llamar
/// las veces que haga falta y su salida sustituye a la anterior.
pub fn render(responses: &[PeerResponse], empty_message: &str) -> ResponseTable {
    if responses.is_empty() {
        return ResponseTable {
            rows: vec![ResponseRow::Empty {
                message: empty_message.to_string(),
                colspan: EMPTY_ROW_COLSPAN,
            }],
        };
    }

    let rows = responses
        .iter()
        .enumerate()
        .map(|(index, item)| ResponseRow::Entry {
            position: index + 1,
            student_email: item.student_email.clone(),
            answer: item.answer.clone(),
        })
        .collect();

    ResponseTable { rows }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_renders_single_message_row() {
        let table = render(&[], "No responses yet");

        assert_eq!(table.rows.len(), 1);
        assert!(table.is_empty_state());
        assert_eq!(table.rows[0].cells(), vec!["No responses yet".to_string()]);
    }

    #[test]
    fn entries_keep_server_order_with_one_based_positions() {
        let peers = vec![
            PeerResponse::new("a@x.com", "42"),
            PeerResponse::new("b@x.com", "7"),
        ];
        let table = render(&peers, "sin respuestas");

        assert_eq!(table.rows.len(), 2);
        assert!(!table.is_empty_state());
        assert_eq!(table.rows[0].cells(), vec!["1", "a@x.com", "42"]);
        assert_eq!(table.rows[1].cells(), vec!["2", "b@x.com", "7"]);
    }

    #[test]
    fn rendering_twice_gives_the_same_fragment() {
        let peers = vec![PeerResponse::new("a@x.com", "42")];
        assert_eq!(render(&peers, "-"), render(&peers, "-"));
    }

    #[test]
    fn html_escapes_student_text() {
        let peers = vec![PeerResponse::new("a@x.com", "<b>x</b> & y")];
        let html = render(&peers, "-").to_html();

        assert_eq!(
            html,
            "<tr class=\"\"><td>1</td><td>a@x.com</td><td>&lt;b&gt;x&lt;/b&gt; &amp; y</td></tr>"
        );
    }

    #[test]
    fn empty_state_html_spans_data_columns() {
        let html = render(&[], "Nadie ha respondido").to_html();
        assert_eq!(
            html,
            "<tr class=\"\"><td colspan=\"2\">Nadie ha respondido</td></tr>"
        );
    }
}
