// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bindings to `web-ifc-viewer` and the [`Viewer`] implementation over them.

use futures_util::future::{FutureExt, LocalBoxFuture};
use ifc_inspector_core::{
    Error, GeometryEngineSettings, ModelId, Pick, PropertySet, Result, SceneConfig, SpatialNode,
    Viewer,
};
use js_sys::{Array, Promise};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::Element;

use crate::utils::js_error_message;

#[wasm_bindgen(module = "web-ifc-viewer")]
extern "C" {
    /// `IfcViewerAPI` from `web-ifc-viewer`
    #[wasm_bindgen(js_name = IfcViewerAPI)]
    pub type IfcViewerApi;

    #[wasm_bindgen(constructor)]
    fn new(options: &JsValue) -> IfcViewerApi;

    #[wasm_bindgen(method, js_name = addAxes)]
    fn add_axes(this: &IfcViewerApi);

    #[wasm_bindgen(method, js_name = addGrid)]
    fn add_grid(this: &IfcViewerApi, size: u32, divisions: u32);

    #[wasm_bindgen(method, getter)]
    fn clipper(this: &IfcViewerApi) -> IfcClipper;

    #[wasm_bindgen(method, getter = IFC)]
    fn ifc(this: &IfcViewerApi) -> IfcManager;

    pub type IfcClipper;

    #[wasm_bindgen(method, setter)]
    fn set_active(this: &IfcClipper, active: bool);

    pub type IfcManager;

    #[wasm_bindgen(method, js_name = applyWebIfcConfig)]
    fn apply_web_ifc_config(this: &IfcManager, settings: &JsValue) -> JsValue;

    #[wasm_bindgen(method, catch, js_name = loadIfcUrl)]
    fn load_ifc_url(this: &IfcManager, url: &str) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, js_name = prePickIfcItem)]
    fn pre_pick_ifc_item(this: &IfcManager);

    #[wasm_bindgen(method, catch, js_name = pickIfcItem)]
    fn pick_ifc_item(this: &IfcManager, select: bool) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = getProperties)]
    fn get_properties(
        this: &IfcManager,
        model_id: u32,
        id: u32,
        indirect: bool,
    ) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = getSpatialStructure)]
    fn get_spatial_structure(this: &IfcManager, model_id: u32) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, js_name = prepickIfcItemsByID)]
    fn prepick_ifc_items_by_id(this: &IfcManager, model_id: u32, ids: &Array) -> JsValue;

    #[wasm_bindgen(method, js_name = pickIfcItemsByID)]
    fn pick_ifc_items_by_id(
        this: &IfcManager,
        model_id: u32,
        ids: &Array,
        focus_selection: bool,
        remove_previous: bool,
    ) -> JsValue;
}

fn id_array(ids: &[u32]) -> Array {
    ids.iter().map(|&id| JsValue::from(id)).collect()
}

async fn await_promise(call: &'static str, promise: std::result::Result<Promise, JsValue>) -> Result<JsValue> {
    let promise = promise.map_err(|e| Error::viewer(call, js_error_message(&e)))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| Error::viewer(call, js_error_message(&e)))
}

fn decode<T: DeserializeOwned>(call: &'static str, value: JsValue) -> Result<T> {
    serde_wasm_bindgen::from_value(value).map_err(|e| Error::decode(call, e.to_string()))
}

/// `web-ifc-viewer` instance mounted on a container element.
pub struct WebIfcViewer {
    api: IfcViewerApi,
    focus_selection: bool,
}

impl WebIfcViewer {
    /// Creates the viewer inside `container` and applies the scene setup.
    pub fn mount(container: &Element, scene: &SceneConfig) -> Result<Self> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"container".into(), container)
            .map_err(|e| Error::viewer("IfcViewerAPI", js_error_message(&e)))?;
        let api = IfcViewerApi::new(&options);

        if scene.axes {
            api.add_axes();
        }
        if scene.grid_size > 0 {
            api.add_grid(scene.grid_size, scene.grid_divisions);
        }
        api.clipper().set_active(scene.clipper);

        let settings = serde_wasm_bindgen::to_value(&GeometryEngineSettings::from(scene))
            .map_err(|e| Error::decode("applyWebIfcConfig", e.to_string()))?;
        api.ifc().apply_web_ifc_config(&settings);

        tracing::debug!(
            grid = scene.grid_size,
            clipper = scene.clipper,
            coordinate_to_origin = scene.coordinate_to_origin,
            "Viewer mounted"
        );

        Ok(Self {
            api,
            focus_selection: scene.focus_selection,
        })
    }
}

impl Viewer for WebIfcViewer {
    fn load_model_from_url(&self, url: &str) -> LocalBoxFuture<'_, Result<ModelId>> {
        let promise = self.api.ifc().load_ifc_url(url);
        async move {
            let model = await_promise("loadIfcUrl", promise).await?;
            let id = js_sys::Reflect::get(&model, &"modelID".into())
                .ok()
                .and_then(|v| v.as_f64())
                .ok_or_else(|| Error::decode("loadIfcUrl", "model has no modelID"))?;
            Ok(ModelId(id as u32))
        }
        .boxed_local()
    }

    fn pick_hovered_item(&self) {
        self.api.ifc().pre_pick_ifc_item();
    }

    fn pick_item_under_cursor(&self, select: bool) -> LocalBoxFuture<'_, Result<Option<Pick>>> {
        let promise = self.api.ifc().pick_ifc_item(select);
        async move {
            let found = await_promise("pickIfcItem", promise).await?;
            decode("pickIfcItem", found)
        }
        .boxed_local()
    }

    fn get_properties(
        &self,
        model: ModelId,
        element: u32,
        include_psets: bool,
    ) -> LocalBoxFuture<'_, Result<PropertySet>> {
        let promise = self.api.ifc().get_properties(model.0, element, include_psets);
        async move {
            let props = await_promise("getProperties", promise).await?;
            decode("getProperties", props)
        }
        .boxed_local()
    }

    fn get_spatial_structure(&self, model: ModelId) -> LocalBoxFuture<'_, Result<SpatialNode>> {
        let promise = self.api.ifc().get_spatial_structure(model.0);
        async move {
            let root = await_promise("getSpatialStructure", promise).await?;
            decode("getSpatialStructure", root)
        }
        .boxed_local()
    }

    fn prehighlight_by_id(&self, model: ModelId, ids: &[u32]) {
        self.api.ifc().prepick_ifc_items_by_id(model.0, &id_array(ids));
    }

    fn select_by_id(&self, model: ModelId, ids: &[u32], clear_previous: bool) {
        self.api
            .ifc()
            .pick_ifc_items_by_id(model.0, &id_array(ids), self.focus_selection, clear_previous);
    }
}
