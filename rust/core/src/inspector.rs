// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inspector session: ties the viewer, the outline, the property panel and
//! a renderer together.
//!
//! All methods take `&self` so several handlers can be in flight at once on
//! the UI thread. State lives in a `RefCell` and is never borrowed across an
//! `.await`.
//!
//! Property responses are not cancelled. By default whichever response
//! completes last is what the panel shows. With
//! [`Inspector::discard_stale_selections`] each request takes a token and a
//! response older than the newest rendered one is dropped instead.

use std::cell::RefCell;

use crate::error::Result;
use crate::export::{export_table, Delivery, ExportDocument};
use crate::outline::{build_outline, Outline};
use crate::panel::{PropertyPanel, PropertyRow, RowSource};
use crate::properties::AuxiliaryData;
use crate::viewer::{ModelId, Viewer};

/// Host side drawing of the outline and panel.
///
/// The renderer is also the [`RowSource`] exports read from, so exports
/// reflect what is actually displayed.
pub trait Renderer: RowSource {
    /// Replaces any previously drawn outline.
    fn render_outline(&self, outline: &Outline);

    /// Replaces all displayed property rows.
    fn render_properties(&self, rows: &[PropertyRow]);

    /// Shows or hides the children of a branch.
    fn set_expanded(&self, express_id: u32, expanded: bool);

    /// Highlights the selected outline entry, if it is part of the outline.
    fn mark_selected(&self, _express_id: Option<u32>) {}
}

#[derive(Default)]
struct SessionState {
    model: Option<ModelId>,
    outline: Option<Outline>,
    panel: PropertyPanel,
    row_count: usize,
    next_token: u64,
    rendered_token: u64,
}

pub struct Inspector<V, R> {
    viewer: V,
    renderer: R,
    state: RefCell<SessionState>,
    discard_stale: bool,
}

impl<V: Viewer, R: Renderer> Inspector<V, R> {
    pub fn new(viewer: V, renderer: R) -> Self {
        Self {
            viewer,
            renderer,
            state: RefCell::new(SessionState::default()),
            discard_stale: false,
        }
    }

    /// Drop property responses that complete after a newer one was rendered.
    pub fn discard_stale_selections(mut self, enabled: bool) -> Self {
        self.discard_stale = enabled;
        self
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Model whose outline is currently shown.
    pub fn model(&self) -> Option<ModelId> {
        self.state.borrow().model
    }

    /// Rows recorded by the last property render.
    pub fn row_count(&self) -> usize {
        self.state.borrow().row_count
    }

    pub fn rows(&self) -> Vec<PropertyRow> {
        self.state.borrow().panel.rows().to_vec()
    }

    pub fn auxiliary(&self) -> AuxiliaryData {
        self.state.borrow().panel.auxiliary().clone()
    }

    /// Runs `f` against the current outline, if a model is loaded.
    pub fn with_outline<T>(&self, f: impl FnOnce(&Outline) -> T) -> Option<T> {
        self.state.borrow().outline.as_ref().map(f)
    }

    /// Loads a model, fetches its spatial structure and draws the outline.
    pub async fn load_model(&self, url: &str) -> Result<ModelId> {
        tracing::info!(url, "Loading model");
        let model = self.viewer.load_model_from_url(url).await?;
        let root = self.viewer.get_spatial_structure(model).await?;

        let outline = build_outline(&root);
        self.renderer.render_outline(&outline);
        tracing::info!(model = %model, nodes = outline.node_count(), "Model loaded");

        let mut state = self.state.borrow_mut();
        state.model = Some(model);
        state.outline = Some(outline);
        Ok(model)
    }

    /// Highlights whatever is under the pointer.
    pub fn hover(&self) {
        self.viewer.pick_hovered_item();
    }

    /// Highlights an outline element in the viewer.
    pub fn prehighlight_element(&self, express_id: u32) {
        if let Some(model) = self.model() {
            self.viewer.prehighlight_by_id(model, &[express_id]);
        }
    }

    /// Picks and selects the element under the cursor and shows its
    /// properties. Returns `Ok(None)` when nothing was hit.
    pub async fn pick_under_cursor(&self) -> Result<Option<usize>> {
        let token = self.next_token();
        let Some(pick) = self.viewer.pick_item_under_cursor(true).await? else {
            tracing::debug!("Nothing under cursor");
            return Ok(None);
        };
        self.show_properties(pick.model_id, pick.id, token).await
    }

    /// Selects an outline element in the viewer and shows its properties.
    pub async fn select_element(&self, express_id: u32) -> Result<Option<usize>> {
        let Some(model) = self.model() else {
            tracing::warn!(express_id, "Select without a loaded model");
            return Ok(None);
        };
        let token = self.next_token();
        self.viewer.select_by_id(model, &[express_id], true);
        self.show_properties(model, express_id, token).await
    }

    /// Flips a branch of the outline; `None` for leaves or unknown ids.
    pub fn toggle(&self, express_id: u32) -> Option<bool> {
        let expanded = self.state.borrow_mut().outline.as_mut()?.toggle(express_id)?;
        self.renderer.set_expanded(express_id, expanded);
        Some(expanded)
    }

    /// Exports the displayed rows and hands the document to `delivery`.
    pub fn export(&self, filename: Option<&str>, delivery: &dyn Delivery) -> Result<ExportDocument> {
        let table = export_table(&self.renderer);
        let document = ExportDocument::from_table(&table, filename);
        delivery.deliver(&document)?;
        tracing::info!(
            filename = %document.filename,
            rows = table.data().len(),
            strategy = delivery.name(),
            "Exported properties"
        );
        Ok(document)
    }

    fn next_token(&self) -> u64 {
        let mut state = self.state.borrow_mut();
        state.next_token += 1;
        state.next_token
    }

    async fn show_properties(
        &self,
        model: ModelId,
        express_id: u32,
        token: u64,
    ) -> Result<Option<usize>> {
        let props = self.viewer.get_properties(model, express_id, true).await?;

        let (rows, selected) = {
            let mut state = self.state.borrow_mut();
            if self.discard_stale && token < state.rendered_token {
                tracing::debug!(
                    token,
                    newest = state.rendered_token,
                    express_id,
                    "Discarding stale property response"
                );
                return Ok(None);
            }
            state.rendered_token = token;
            state.row_count = state.panel.render(props);

            // Picks may hit a model other than the one in the outline.
            let shown = state.model == Some(model);
            let selected = match state.outline.as_mut() {
                Some(outline) if shown => outline.select(express_id).then_some(express_id),
                _ => None,
            };
            (state.panel.rows().to_vec(), selected)
        };

        self.renderer.render_properties(&rows);
        self.renderer.mark_selected(selected);
        tracing::debug!(model = %model, express_id, rows = rows.len(), "Selection shown");
        Ok(Some(rows.len()))
    }
}
