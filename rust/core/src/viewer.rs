// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Contract of the external 3D/IFC viewer.
//!
//! Loading, picking, highlighting and property lookup all happen inside the
//! viewer. Futures are local (`!Send`): everything runs on the UI thread.

use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::properties::PropertySet;
use crate::spatial::SpatialNode;

/// Identifier of a model loaded into the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub u32);

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Element found under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    #[serde(rename = "modelID")]
    pub model_id: ModelId,
    pub id: u32,
}

/// Operations the inspector needs from the viewer.
pub trait Viewer {
    /// Loads a model from a URL (remote or object URL).
    fn load_model_from_url(&self, url: &str) -> LocalBoxFuture<'_, Result<ModelId>>;

    /// Highlights whatever is under the pointer. Fire and forget.
    fn pick_hovered_item(&self);

    /// Picks the element under the cursor, optionally selecting it.
    fn pick_item_under_cursor(&self, select: bool) -> LocalBoxFuture<'_, Result<Option<Pick>>>;

    fn get_properties(
        &self,
        model: ModelId,
        element: u32,
        include_psets: bool,
    ) -> LocalBoxFuture<'_, Result<PropertySet>>;

    fn get_spatial_structure(&self, model: ModelId) -> LocalBoxFuture<'_, Result<SpatialNode>>;

    /// Highlights elements without selecting them. Fire and forget.
    fn prehighlight_by_id(&self, model: ModelId, ids: &[u32]);

    /// Selects elements, optionally clearing the previous selection.
    /// Fire and forget.
    fn select_by_id(&self, model: ModelId, ids: &[u32], clear_previous: bool);
}
