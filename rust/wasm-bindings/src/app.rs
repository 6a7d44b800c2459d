// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript entry point: mounts the inspector on a page and wires its
//! controls.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ifc_inspector_core::{Error, Inspector, InspectorConfig, Result};
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{Element, Event, HtmlElement, HtmlInputElement, Url, Window};

use crate::dom::{DomRenderer, TreeEvent};
use crate::download;
use crate::utils::{dom_error, element_by_id, js_error_message, to_js_error};
use crate::viewer::WebIfcViewer;

type PageInspector = Inspector<WebIfcViewer, DomRenderer>;

struct App {
    inspector: PageInspector,
    config: InspectorConfig,
    window: Window,
    listeners: RefCell<Vec<Closure<dyn FnMut(Event)>>>,
}

impl App {
    fn on_tree_event(self: Rc<Self>, event: TreeEvent) {
        match event {
            TreeEvent::Toggle(id) => {
                self.inspector.toggle(id);
            }
            TreeEvent::Hover(id) => self.inspector.prehighlight_element(id),
            TreeEvent::Select(id) => spawn_local(async move {
                if let Err(e) = self.inspector.select_element(id).await {
                    tracing::warn!(express_id = id, error = %e, "Selection failed");
                }
            }),
        }
    }

    fn load(self: Rc<Self>, url: String) {
        self.load_with(url, false);
    }

    /// Loads a `blob:` URL made for a picked file and revokes it afterwards.
    fn load_object_url(self: Rc<Self>, url: String) {
        self.load_with(url, true);
    }

    fn load_with(self: Rc<Self>, url: String, revoke: bool) {
        spawn_local(async move {
            if let Err(e) = self.inspector.load_model(&url).await {
                // The viewer owns load errors; report them on the console.
                web_sys::console::error_1(&format!("Failed to load {url}: {e}").into());
            }
            if revoke {
                if let Err(e) = Url::revoke_object_url(&url) {
                    tracing::warn!(error = %js_error_message(&e), "Could not revoke object URL");
                }
            }
        });
    }

    fn pick(self: Rc<Self>) {
        spawn_local(async move {
            if let Err(e) = self.inspector.pick_under_cursor().await {
                tracing::warn!(error = %e, "Pick failed");
            }
        });
    }

    fn export(&self, filename: Option<&str>) -> Result<()> {
        let delivery = download::detect(&self.window)?;
        let filename = filename.or(self.config.export_filename.as_deref());
        self.inspector.export(filename, delivery.as_ref())?;
        Ok(())
    }

    /// Registers `handler` for `event` on `target`, holding only a weak
    /// reference to the app.
    fn on(
        self: &Rc<Self>,
        target: &Element,
        event: &str,
        handler: impl Fn(Rc<App>, Event) + 'static,
    ) -> Result<()> {
        let app = Rc::downgrade(self);
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(app) = Weak::upgrade(&app) {
                handler(app, event);
            }
        });
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(dom_error)?;
        self.listeners.borrow_mut().push(closure);
        Ok(())
    }

    fn wire(self: &Rc<Self>, document: &web_sys::Document) -> Result<()> {
        let config = &self.config;
        let container = element_by_id(document, &config.container_id)?;
        let file_input = element_by_id(document, &config.file_input_id)?;
        let loader = element_by_id(document, &config.loader_button_id)?;

        let input = file_input.clone();
        self.on(&loader, "click", move |_, _| {
            if let Some(input) = input.dyn_ref::<HtmlElement>() {
                input.click();
            }
        })?;

        self.on(&file_input, "change", |app, event| {
            let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            match Url::create_object_url_with_blob(&file) {
                Ok(url) => app.load_object_url(url),
                Err(e) => tracing::warn!(error = %js_error_message(&e), "Could not open file"),
            }
        })?;

        self.on(&container, "mousemove", |app, _| app.inspector.hover())?;
        self.on(&container, "dblclick", |app, _| app.pick())?;

        if let Some(id) = &config.export_button_id {
            let button = element_by_id(document, id)?;
            self.on(&button, "click", |app, _| {
                if let Err(e) = app.export(None) {
                    tracing::warn!(error = %e, "Export failed");
                }
            })?;
        }
        Ok(())
    }
}

/// IFC inspector mounted on a page.
///
/// Example:
/// ```javascript
/// const inspector = IfcInspector.mount({ treeId: 'myUL', exportButtonId: 'export' });
/// await inspector.loadModelUrl('model.ifc');
/// inspector.exportProperties('walls');
/// ```
#[wasm_bindgen]
pub struct IfcInspector {
    app: Rc<App>,
}

#[wasm_bindgen]
impl IfcInspector {
    /// Mounts the viewer and the inspector controls. `config` may be
    /// `undefined` or a partial configuration object.
    pub fn mount(config: JsValue) -> std::result::Result<IfcInspector, JsValue> {
        crate::utils::set_panic_hook();
        let config: InspectorConfig = if config.is_undefined() || config.is_null() {
            InspectorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| to_js_error(Error::Config(e.to_string())))?
        };
        crate::logging::init(&config.log_level);

        Self::mount_with(config).map_err(to_js_error)
    }

    /// Loads a model by URL and draws its spatial tree. Resolves to the
    /// model ID.
    #[wasm_bindgen(js_name = loadModelUrl)]
    pub fn load_model_url(&self, url: String) -> Promise {
        let app = Rc::clone(&self.app);
        future_to_promise(async move {
            let model = app.inspector.load_model(&url).await.map_err(to_js_error)?;
            Ok(JsValue::from(model.0))
        })
    }

    /// Selects an element by express ID and shows its properties. Resolves
    /// to the number of rows shown, or `undefined` if nothing was shown.
    #[wasm_bindgen(js_name = selectElement)]
    pub fn select_element(&self, express_id: u32) -> Promise {
        let app = Rc::clone(&self.app);
        future_to_promise(async move {
            let rows = app
                .inspector
                .select_element(express_id)
                .await
                .map_err(to_js_error)?;
            Ok(rows.map_or(JsValue::UNDEFINED, |n| JsValue::from(n as u32)))
        })
    }

    /// Expands or collapses a branch of the spatial tree.
    #[wasm_bindgen(js_name = toggleNode)]
    pub fn toggle_node(&self, express_id: u32) -> Option<bool> {
        self.app.inspector.toggle(express_id)
    }

    /// Downloads the displayed properties as a spreadsheet.
    #[wasm_bindgen(js_name = exportProperties)]
    pub fn export_properties(&self, filename: Option<String>) -> std::result::Result<(), JsValue> {
        self.app.export(filename.as_deref()).map_err(to_js_error)
    }

    /// Number of property rows currently shown
    #[wasm_bindgen(getter, js_name = rowCount)]
    pub fn row_count(&self) -> usize {
        self.app.inspector.row_count()
    }
}

impl IfcInspector {
    fn mount_with(config: InspectorConfig) -> Result<IfcInspector> {
        let window = web_sys::window().ok_or_else(|| Error::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| Error::Dom("window has no document".into()))?;

        let container = element_by_id(&document, &config.container_id)?;
        let tree = element_by_id(&document, &config.tree_id)?;
        let properties = element_by_id(&document, &config.properties_id)?;
        let viewer = WebIfcViewer::mount(&container, &config.scene)?;

        let app = Rc::new_cyclic(|weak: &Weak<App>| {
            let weak = weak.clone();
            let on_event: Rc<dyn Fn(TreeEvent)> = Rc::new(move |event: TreeEvent| {
                if let Some(app) = weak.upgrade() {
                    app.on_tree_event(event);
                }
            });
            let renderer = DomRenderer::new(document.clone(), tree, properties, on_event);
            let inspector = Inspector::new(viewer, renderer)
                .discard_stale_selections(config.discard_stale_selections);
            App {
                inspector,
                config,
                window,
                listeners: RefCell::new(Vec::new()),
            }
        });

        app.wire(&document)?;
        if let Some(url) = app.config.default_model_url.clone() {
            Rc::clone(&app).load(url);
        }

        tracing::info!(container = %app.config.container_id, "Inspector mounted");
        Ok(IfcInspector { app })
    }
}
