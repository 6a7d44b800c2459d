// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use futures_util::future::{FutureExt, LocalBoxFuture};
use ifc_inspector_core::{
    Delivery, Error, ExportDocument, Inspector, ModelId, Outline, Pick, PropertyRow,
    PropertySet, PropertyValue, Renderer, Result, RowSource, SpatialNode, Viewer,
};
use tokio::sync::oneshot;

#[derive(Default)]
struct FakeViewer {
    structure: Option<SpatialNode>,
    properties: HashMap<u32, PropertySet>,
    pick: Cell<Option<Pick>>,
    gates: RefCell<HashMap<u32, oneshot::Receiver<()>>>,
    calls: RefCell<Vec<String>>,
}

impl FakeViewer {
    fn log(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Viewer for FakeViewer {
    fn load_model_from_url(&self, url: &str) -> LocalBoxFuture<'_, Result<ModelId>> {
        self.log(format!("load {url}"));
        let result = if url.ends_with(".ifc") {
            Ok(ModelId(0))
        } else {
            Err(Error::viewer("loadIfcUrl", "unsupported file"))
        };
        async move { result }.boxed_local()
    }

    fn pick_hovered_item(&self) {
        self.log("prepick".to_string());
    }

    fn pick_item_under_cursor(&self, select: bool) -> LocalBoxFuture<'_, Result<Option<Pick>>> {
        self.log(format!("pick select={select}"));
        let pick = self.pick.get();
        async move { Ok(pick) }.boxed_local()
    }

    fn get_properties(
        &self,
        model: ModelId,
        element: u32,
        include_psets: bool,
    ) -> LocalBoxFuture<'_, Result<PropertySet>> {
        self.log(format!("properties {model} {element} psets={include_psets}"));
        let gate = self.gates.borrow_mut().remove(&element);
        let props = self.properties.get(&element).cloned().unwrap_or_default();
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(props)
        }
        .boxed_local()
    }

    fn get_spatial_structure(&self, model: ModelId) -> LocalBoxFuture<'_, Result<SpatialNode>> {
        self.log(format!("structure {model}"));
        let structure = self
            .structure
            .clone()
            .ok_or_else(|| Error::decode("getSpatialStructure", "no structure"));
        async move { structure }.boxed_local()
    }

    fn prehighlight_by_id(&self, model: ModelId, ids: &[u32]) {
        self.log(format!("prehighlight {model} {ids:?}"));
    }

    fn select_by_id(&self, model: ModelId, ids: &[u32], clear_previous: bool) {
        self.log(format!("select {model} {ids:?} clear={clear_previous}"));
    }
}

#[derive(Default)]
struct RecordingRenderer {
    outline_labels: RefCell<Vec<String>>,
    outline_renders: Cell<usize>,
    rows: RefCell<Vec<PropertyRow>>,
    expanded: RefCell<Vec<(u32, bool)>>,
    selected: Cell<Option<u32>>,
}

impl RowSource for RecordingRenderer {
    fn row_count(&self) -> usize {
        self.rows.borrow().len()
    }

    fn read_row(&self, index: usize) -> Option<(String, String)> {
        self.rows
            .borrow()
            .get(index)
            .map(|r| (r.name.clone(), r.value.clone()))
    }
}

impl Renderer for RecordingRenderer {
    fn render_outline(&self, outline: &Outline) {
        self.outline_renders.set(self.outline_renders.get() + 1);
        *self.outline_labels.borrow_mut() = outline.iter().map(|(_, n)| n.label.clone()).collect();
    }

    fn render_properties(&self, rows: &[PropertyRow]) {
        *self.rows.borrow_mut() = rows.to_vec();
    }

    fn set_expanded(&self, express_id: u32, expanded: bool) {
        self.expanded.borrow_mut().push((express_id, expanded));
    }

    fn mark_selected(&self, express_id: Option<u32>) {
        self.selected.set(express_id);
    }
}

#[derive(Default)]
struct CapturingDelivery {
    documents: RefCell<Vec<ExportDocument>>,
}

impl Delivery for CapturingDelivery {
    fn name(&self) -> &'static str {
        "capture"
    }

    fn deliver(&self, document: &ExportDocument) -> Result<()> {
        self.documents.borrow_mut().push(document.clone());
        Ok(())
    }
}

fn structure() -> SpatialNode {
    SpatialNode::new("IFCPROJECT", 1).with_child(
        SpatialNode::new("IFCBUILDINGSTOREY", 5)
            .with_child(SpatialNode::new("IFCWALL", 42))
            .with_child(SpatialNode::new("IFCDOOR", 43)),
    )
}

fn viewer() -> FakeViewer {
    let mut properties = HashMap::new();
    properties.insert(
        42,
        PropertySet::new()
            .with("Name", "Wall-01")
            .with("mats", PropertyValue::List(vec![]))
            .with("Height", PropertyValue::Wrapped(Box::new(3.2.into())))
            .with("Description", PropertyValue::Null),
    );
    properties.insert(43, PropertySet::new().with("Name", "Door-07"));
    FakeViewer {
        structure: Some(structure()),
        properties,
        ..FakeViewer::default()
    }
}

fn displayed(inspector: &Inspector<FakeViewer, RecordingRenderer>) -> Vec<(usize, String, String)> {
    inspector
        .renderer()
        .rows
        .borrow()
        .iter()
        .map(|r| (r.index, r.name.clone(), r.value.clone()))
        .collect()
}

#[tokio::test]
async fn load_model_renders_outline() {
    let inspector = Inspector::new(viewer(), RecordingRenderer::default());

    let model = inspector.load_model("model.ifc").await.unwrap();

    assert_eq!(model, ModelId(0));
    assert_eq!(inspector.model(), Some(ModelId(0)));
    assert_eq!(
        *inspector.renderer().outline_labels.borrow(),
        [
            "IFCPROJECT - 1",
            "IFCBUILDINGSTOREY - 5",
            "IFCWALL - 42",
            "IFCDOOR - 43"
        ]
    );
    assert_eq!(
        inspector.viewer().calls(),
        ["load model.ifc", "structure 0"]
    );
}

#[tokio::test]
async fn load_failure_propagates_and_keeps_state() {
    let inspector = Inspector::new(viewer(), RecordingRenderer::default());

    let err = inspector.load_model("notes.txt").await.unwrap_err();

    assert!(matches!(err, Error::Viewer { call: "loadIfcUrl", .. }));
    assert_eq!(inspector.model(), None);
    assert_eq!(inspector.renderer().outline_renders.get(), 0);
}

#[tokio::test]
async fn reloading_replaces_outline() {
    let inspector = Inspector::new(viewer(), RecordingRenderer::default());
    inspector.load_model("a.ifc").await.unwrap();
    inspector.load_model("b.ifc").await.unwrap();

    assert_eq!(inspector.renderer().outline_renders.get(), 2);
    assert_eq!(inspector.renderer().outline_labels.borrow().len(), 4);
}

#[tokio::test]
async fn select_element_shows_properties() {
    let inspector = Inspector::new(viewer(), RecordingRenderer::default());
    inspector.load_model("model.ifc").await.unwrap();

    let count = inspector.select_element(42).await.unwrap();

    assert_eq!(count, Some(3));
    assert_eq!(inspector.row_count(), 3);
    assert_eq!(
        displayed(&inspector),
        [
            (0, "Name".to_string(), "Wall-01".to_string()),
            (1, "Height".to_string(), "3.2".to_string()),
            (2, "Description".to_string(), "-".to_string()),
        ]
    );
    assert_eq!(inspector.renderer().selected.get(), Some(42));
    assert!(inspector.auxiliary().materials.is_some());
    assert!(inspector
        .viewer()
        .calls()
        .ends_with(&["select 0 [42] clear=true".to_string(), "properties 0 42 psets=true".to_string()]));
}

#[tokio::test]
async fn select_without_model_is_ignored() {
    let inspector = Inspector::new(viewer(), RecordingRenderer::default());

    assert_eq!(inspector.select_element(42).await.unwrap(), None);
    assert!(inspector.viewer().calls().is_empty());
}

#[tokio::test]
async fn pick_nothing_leaves_panel_alone() {
    let inspector = Inspector::new(viewer(), RecordingRenderer::default());
    inspector.load_model("model.ifc").await.unwrap();
    inspector.select_element(43).await.unwrap();

    let result = inspector.pick_under_cursor().await.unwrap();

    assert_eq!(result, None);
    assert_eq!(displayed(&inspector), [(0, "Name".to_string(), "Door-07".to_string())]);
}

#[tokio::test]
async fn pick_under_cursor_replaces_rows() {
    let inspector = Inspector::new(viewer(), RecordingRenderer::default());
    inspector.load_model("model.ifc").await.unwrap();
    inspector.select_element(42).await.unwrap();

    inspector.viewer().pick.set(Some(Pick {
        model_id: ModelId(0),
        id: 43,
    }));
    let count = inspector.pick_under_cursor().await.unwrap();

    assert_eq!(count, Some(1));
    assert_eq!(inspector.row_count(), 1);
    assert_eq!(displayed(&inspector), [(0, "Name".to_string(), "Door-07".to_string())]);
    assert!(inspector.viewer().calls().contains(&"pick select=true".to_string()));
}

#[tokio::test]
async fn pick_on_other_model_does_not_mark_outline() {
    let inspector = Inspector::new(viewer(), RecordingRenderer::default());
    inspector.load_model("model.ifc").await.unwrap();

    inspector.viewer().pick.set(Some(Pick {
        model_id: ModelId(3),
        id: 42,
    }));
    let count = inspector.pick_under_cursor().await.unwrap();

    assert_eq!(count, Some(3));
    assert_eq!(inspector.renderer().selected.get(), None);
    assert_eq!(inspector.with_outline(|o| o.selected()), Some(None));
    assert!(inspector
        .viewer()
        .calls()
        .contains(&"properties 3 42 psets=true".to_string()));
}

#[tokio::test]
async fn pick_on_shown_model_marks_outline() {
    let inspector = Inspector::new(viewer(), RecordingRenderer::default());
    inspector.load_model("model.ifc").await.unwrap();

    inspector.viewer().pick.set(Some(Pick {
        model_id: ModelId(0),
        id: 42,
    }));
    inspector.pick_under_cursor().await.unwrap();

    assert_eq!(inspector.renderer().selected.get(), Some(42));
    assert_eq!(inspector.with_outline(|o| o.selected()), Some(Some(42)));
}

#[tokio::test]
async fn hover_and_prehighlight_are_forwarded() {
    let inspector = Inspector::new(viewer(), RecordingRenderer::default());
    inspector.prehighlight_element(42);
    inspector.hover();
    inspector.load_model("model.ifc").await.unwrap();
    inspector.prehighlight_element(42);

    assert_eq!(
        inspector.viewer().calls(),
        ["prepick", "load model.ifc", "structure 0", "prehighlight 0 [42]"]
    );
}

#[tokio::test]
async fn toggle_updates_renderer() {
    let inspector = Inspector::new(viewer(), RecordingRenderer::default());
    assert_eq!(inspector.toggle(5), None);

    inspector.load_model("model.ifc").await.unwrap();
    assert_eq!(inspector.toggle(5), Some(true));
    assert_eq!(inspector.toggle(5), Some(false));
    assert_eq!(inspector.toggle(42), None);

    assert_eq!(*inspector.renderer().expanded.borrow(), [(5, true), (5, false)]);
    assert_eq!(inspector.with_outline(|o| o.locate(5).and_then(|n| n.expanded())), Some(Some(false)));
}

#[tokio::test]
async fn export_reads_displayed_rows() {
    let inspector = Inspector::new(viewer(), RecordingRenderer::default());
    inspector.load_model("model.ifc").await.unwrap();
    inspector.select_element(42).await.unwrap();
    let delivery = CapturingDelivery::default();

    let document = inspector.export(None, &delivery).unwrap();

    assert_eq!(document.filename, "excel_data.xls");
    assert_eq!(delivery.documents.borrow().as_slice(), [document.clone()]);
    assert!(document.body().contains(
        "<tbody><tr><td>Name</td><td>Wall-01</td></tr><tr><td>Height</td><td>3.2</td></tr><tr><td>Description</td><td>-</td></tr></tbody>"
    ));
}

#[tokio::test]
async fn export_before_any_selection_is_header_only() {
    let inspector = Inspector::new(viewer(), RecordingRenderer::default());
    let delivery = CapturingDelivery::default();

    let document = inspector.export(Some("empty"), &delivery).unwrap();

    assert_eq!(document.filename, "empty.xls");
    assert!(document
        .body()
        .contains("<thead><tr><th>name</th><th>value</th></tr></thead><tbody></tbody>"));
}

#[tokio::test]
async fn last_completed_response_wins_by_default() {
    let mut fake = viewer();
    let (release_wall, gate) = oneshot::channel();
    fake.gates.get_mut().insert(42, gate);
    let inspector = Inspector::new(fake, RecordingRenderer::default());
    inspector.load_model("model.ifc").await.unwrap();

    let release = async {
        tokio::task::yield_now().await;
        release_wall.send(()).unwrap();
    };
    let (wall, door, ()) = tokio::join!(
        inspector.select_element(42),
        inspector.select_element(43),
        release
    );

    assert_eq!(wall.unwrap(), Some(3));
    assert_eq!(door.unwrap(), Some(1));
    assert_eq!(inspector.row_count(), 3);
    assert_eq!(displayed(&inspector)[0].2, "Wall-01");
}

#[tokio::test]
async fn stale_response_discarded_when_enabled() {
    let mut fake = viewer();
    let (release_wall, gate) = oneshot::channel();
    fake.gates.get_mut().insert(42, gate);
    let inspector =
        Inspector::new(fake, RecordingRenderer::default()).discard_stale_selections(true);
    inspector.load_model("model.ifc").await.unwrap();

    let release = async {
        tokio::task::yield_now().await;
        release_wall.send(()).unwrap();
    };
    let (wall, door, ()) = tokio::join!(
        inspector.select_element(42),
        inspector.select_element(43),
        release
    );

    assert_eq!(wall.unwrap(), None);
    assert_eq!(door.unwrap(), Some(1));
    assert_eq!(inspector.row_count(), 1);
    assert_eq!(displayed(&inspector), [(0, "Name".to_string(), "Door-07".to_string())]);
    assert_eq!(inspector.renderer().selected.get(), Some(43));
}
