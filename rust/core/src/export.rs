// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spreadsheet export of displayed properties.
//!
//! Rows are read back from a [`RowSource`] into an [`ExportTable`] and
//! serialized as an HTML table, which spreadsheet applications open when
//! served as `application/vnd.ms-excel`. Getting the bytes to the user is
//! left to a [`Delivery`] strategy chosen by the host.

use crate::error::Result;
use crate::panel::RowSource;

/// Content type of the exported document.
pub const EXPORT_MIME: &str = "application/vnd.ms-excel";

/// File extension appended to caller-supplied names.
pub const EXPORT_EXTENSION: &str = ".xls";

/// Filename used when the caller supplies none.
pub const DEFAULT_EXPORT_FILENAME: &str = "excel_data.xls";

/// Header row of every export.
pub const EXPORT_HEADER: [&str; 2] = ["name", "value"];

const BOM: char = '\u{feff}';

/// Rectangular name/value table; the first row is always the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    rows: Vec<[String; 2]>,
}

impl ExportTable {
    /// Table holding only the header row.
    pub fn new() -> Self {
        Self {
            rows: vec![EXPORT_HEADER.map(String::from)],
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.rows.push([name.into(), value.into()]);
    }

    /// All rows, header first.
    pub fn rows(&self) -> &[[String; 2]] {
        &self.rows
    }

    pub fn header(&self) -> &[String; 2] {
        &self.rows[0]
    }

    /// Rows after the header.
    pub fn data(&self) -> &[[String; 2]] {
        &self.rows[1..]
    }

    /// Serializes to a hidden HTML table (`<thead>` with `<th>`, `<tbody>`
    /// with `<td>`).
    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<table style="display: none"><thead>"#);
        push_row(&mut html, self.header(), "th");
        html.push_str("</thead><tbody>");
        for row in self.data() {
            push_row(&mut html, row, "td");
        }
        html.push_str("</tbody></table>");
        html
    }
}

impl Default for ExportTable {
    fn default() -> Self {
        Self::new()
    }
}

fn push_row(html: &mut String, cells: &[String; 2], tag: &str) {
    html.push_str("<tr>");
    for cell in cells {
        html.push('<');
        html.push_str(tag);
        html.push('>');
        escape_into(html, cell);
        html.push_str("</");
        html.push_str(tag);
        html.push('>');
    }
    html.push_str("</tr>");
}

fn escape_into(out: &mut String, text: &str) {
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
}

/// Reads exactly `source.row_count()` rows, in index order, under the header.
///
/// A missing index reads as an empty row rather than shortening the table.
pub fn export_table<S: RowSource + ?Sized>(source: &S) -> ExportTable {
    let count = source.row_count();
    let mut table = ExportTable::new();
    for index in 0..count {
        let (name, value) = source.read_row(index).unwrap_or_default();
        table.push(name, value);
    }
    tracing::debug!(rows = count, "Collected export table");
    table
}

/// Applies the export naming rule: no name gives the default, otherwise
/// `.xls` is appended unless already present.
pub fn resolve_filename(filename: Option<&str>) -> String {
    match filename.map(str::trim).filter(|name| !name.is_empty()) {
        None => DEFAULT_EXPORT_FILENAME.to_string(),
        Some(name) if name.to_ascii_lowercase().ends_with(EXPORT_EXTENSION) => name.to_string(),
        Some(name) => format!("{name}{EXPORT_EXTENSION}"),
    }
}

/// A serialized export ready to hand to a [`Delivery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub mime: &'static str,
    body: String,
}

impl ExportDocument {
    pub fn from_table(table: &ExportTable, filename: Option<&str>) -> Self {
        let mut body = String::new();
        body.push(BOM);
        body.push_str(&table.to_html());
        Self {
            filename: resolve_filename(filename),
            mime: EXPORT_MIME,
            body,
        }
    }

    /// Document text, starting with a byte order mark.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn bytes(&self) -> &[u8] {
        self.body.as_bytes()
    }
}

/// Hands an export document to the user.
pub trait Delivery {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    fn deliver(&self, document: &ExportDocument) -> Result<()>;
}
