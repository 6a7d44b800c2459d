// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property panel rows.
//!
//! Rendering a [`PropertySet`] always starts from an empty panel: the
//! previous rows are dropped, reserved entries are split off, and every
//! remaining entry becomes a row indexed `0..count` in mapping order.

use crate::properties::{AuxiliaryData, PropertySet};

/// One displayed (name, value) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRow {
    pub index: usize,
    pub name: String,
    pub value: String,
}

/// Read access to rendered rows by index.
///
/// Implemented by the in-memory panel and by host renderers that read the
/// displayed text back out of their widgets.
pub trait RowSource {
    /// Number of rows recorded by the last render.
    fn row_count(&self) -> usize;

    /// Displayed name and value at `index`, if present.
    fn read_row(&self, index: usize) -> Option<(String, String)>;
}

/// Rows currently shown for the selected element.
#[derive(Debug, Clone, Default)]
pub struct PropertyPanel {
    rows: Vec<PropertyRow>,
    auxiliary: AuxiliaryData,
}

impl PropertyPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the panel contents with `props` and returns the row count.
    pub fn render(&mut self, props: PropertySet) -> usize {
        self.clear();

        let (visible, auxiliary) = props.split_reserved();
        self.rows = visible
            .iter()
            .enumerate()
            .map(|(index, (name, value))| PropertyRow {
                index,
                name: name.to_string(),
                value: value.display(),
            })
            .collect();
        self.auxiliary = auxiliary;

        tracing::debug!(rows = self.rows.len(), "Rendered property panel");
        self.rows.len()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.auxiliary = AuxiliaryData::default();
    }

    pub fn rows(&self) -> &[PropertyRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Materials, property-set groupings and element type of the selection.
    pub fn auxiliary(&self) -> &AuxiliaryData {
        &self.auxiliary
    }
}

impl RowSource for PropertyPanel {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn read_row(&self, index: usize) -> Option<(String, String)> {
        self.rows
            .get(index)
            .map(|row| (row.name.clone(), row.value.clone()))
    }
}
