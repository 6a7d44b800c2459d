// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC Inspector Core
//!
//! Host-independent logic of the IFC model inspector: the spatial tree
//! outline, the property panel and the spreadsheet export.
//!
//! ## Overview
//!
//! The 3D viewer does all IFC work (parsing, tessellation, rendering,
//! picking). This crate only consumes its results:
//!
//! - **Outline**: [`build_outline`] mirrors a [`SpatialNode`] tree into a
//!   collapsible outline, one node per source node
//! - **Property panel**: [`PropertyPanel::render`] turns a [`PropertySet`]
//!   into indexed (name, value) rows
//! - **Export**: [`export_table`] reads displayed rows back and
//!   [`ExportDocument`] serializes them for a spreadsheet application
//! - **Session**: [`Inspector`] drives a [`Viewer`] and a [`Renderer`]
//!
//! ## Quick Start
//!
//! ```rust
//! use ifc_inspector_core::{build_outline, PropertyPanel, PropertySet, PropertyValue, SpatialNode};
//!
//! let root = SpatialNode::new("IfcProject", 1).with_child(SpatialNode::new("IfcWall", 42));
//! let outline = build_outline(&root);
//! assert_eq!(outline.root().children()[0].label, "IfcWall - 42");
//!
//! let mut panel = PropertyPanel::new();
//! let count = panel.render(
//!     PropertySet::new()
//!         .with("Name", "Wall-01")
//!         .with("Description", PropertyValue::Null),
//! );
//! assert_eq!(count, 2);
//! assert_eq!(panel.rows()[1].value, "-");
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod inspector;
pub mod outline;
pub mod panel;
pub mod properties;
pub mod spatial;
pub mod viewer;

pub use config::{GeometryEngineSettings, InspectorConfig, SceneConfig};
pub use error::{Error, Result};
pub use export::{
    export_table, resolve_filename, Delivery, ExportDocument, ExportTable, DEFAULT_EXPORT_FILENAME,
    EXPORT_MIME,
};
pub use inspector::{Inspector, Renderer};
pub use outline::{build_outline, Outline, OutlineKind, OutlineNode};
pub use panel::{PropertyPanel, PropertyRow, RowSource};
pub use properties::{AuxiliaryData, PropertySet, PropertyValue, PLACEHOLDER, RESERVED_KEYS};
pub use spatial::SpatialNode;
pub use viewer::{ModelId, Pick, Viewer};
