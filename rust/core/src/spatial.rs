// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial structure graph as returned by the viewer.
//!
//! The viewer hands back the containment hierarchy of a model
//! (project → site → building → storey → element) as nested nodes. Field
//! names follow the viewer's wire shape (`type`, `expressID`, `children`).

use serde::{Deserialize, Serialize};

/// One node of a model's spatial structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialNode {
    /// IFC type label (e.g. "IFCBUILDINGSTOREY")
    #[serde(rename = "type")]
    pub ifc_type: String,
    /// Express ID of the element within its model
    #[serde(rename = "expressID")]
    pub express_id: u32,
    /// Contained nodes, in source order
    #[serde(default)]
    pub children: Vec<SpatialNode>,
}

impl SpatialNode {
    /// Creates a node without children.
    pub fn new(ifc_type: impl Into<String>, express_id: u32) -> Self {
        Self {
            ifc_type: ifc_type.into(),
            express_id,
            children: Vec::new(),
        }
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: SpatialNode) -> Self {
        self.children.push(child);
        self
    }

    /// Display label, `"<type> - <expressID>"`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.ifc_type, self.express_id)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SpatialNode::node_count).sum::<usize>()
    }
}
