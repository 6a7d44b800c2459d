// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DOM rendering of the spatial outline and the property panel.
//!
//! Markup follows the classic tree-view pattern:
//!
//! ```html
//! <li data-express-id="1"><span class="caret">IFCPROJECT - 1</span>
//!   <ul class="nested">
//!     <li class="leaf-node" data-express-id="42">IFCWALL - 42</li>
//!   </ul>
//! </li>
//! ```
//!
//! Property rows are `div.property-root#root_<i>` holding
//! `div.property-name#name_<i>` and `div.property-value#value_<i>`; exports
//! read the text back from those elements.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ifc_inspector_core::{Outline, OutlineKind, OutlineNode, PropertyRow, Renderer, RowSource};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::utils::js_error_message;

/// User interaction on an outline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// Caret of a branch clicked
    Toggle(u32),
    /// Pointer entered a leaf
    Hover(u32),
    /// Leaf clicked
    Select(u32),
}

pub struct DomRenderer {
    document: Document,
    tree: Element,
    properties: Element,
    on_event: Rc<dyn Fn(TreeEvent)>,
    /// Handlers of the current outline, dropped on re-render
    listeners: RefCell<Vec<Closure<dyn FnMut()>>>,
    selected: RefCell<Option<Element>>,
    row_count: Cell<usize>,
}

impl DomRenderer {
    pub fn new(
        document: Document,
        tree: Element,
        properties: Element,
        on_event: Rc<dyn Fn(TreeEvent)>,
    ) -> Self {
        Self {
            document,
            tree,
            properties,
            on_event,
            listeners: RefCell::new(Vec::new()),
            selected: RefCell::new(None),
            row_count: Cell::new(0),
        }
    }

    fn listen(&self, target: &Element, event: &str, tree_event: TreeEvent) -> Result<(), JsValue> {
        let on_event = Rc::clone(&self.on_event);
        let closure = Closure::<dyn FnMut()>::new(move || on_event(tree_event));
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.borrow_mut().push(closure);
        Ok(())
    }

    fn append_node(&self, parent: &Element, node: &OutlineNode) -> Result<(), JsValue> {
        let id = node.express_id;
        let item = self.document.create_element("li")?;
        item.set_attribute("data-express-id", &id.to_string())?;

        match &node.kind {
            OutlineKind::Leaf => {
                item.class_list().add_1("leaf-node")?;
                item.set_text_content(Some(&node.label));
                self.listen(&item, "mouseenter", TreeEvent::Hover(id))?;
                self.listen(&item, "click", TreeEvent::Select(id))?;
            }
            OutlineKind::Branch { expanded, children } => {
                let caret = self.document.create_element("span")?;
                caret.class_list().add_1("caret")?;
                caret.class_list().toggle_with_force("caret-down", *expanded)?;
                caret.set_text_content(Some(&node.label));
                self.listen(&caret, "click", TreeEvent::Toggle(id))?;
                item.append_child(&caret)?;

                let nested = self.document.create_element("ul")?;
                nested.class_list().add_1("nested")?;
                nested.class_list().toggle_with_force("active", *expanded)?;
                item.append_child(&nested)?;

                for child in children {
                    self.append_node(&nested, child)?;
                }
            }
        }

        parent.append_child(&item)?;
        Ok(())
    }

    fn append_row(&self, row: &PropertyRow) -> Result<(), JsValue> {
        let root = self.document.create_element("div")?;
        root.class_list().add_1("property-root")?;
        root.set_id(&format!("root_{}", row.index));

        let name = self.document.create_element("div")?;
        name.class_list().add_1("property-name")?;
        name.set_id(&format!("name_{}", row.index));
        name.set_text_content(Some(&row.name));
        root.append_child(&name)?;

        let value = self.document.create_element("div")?;
        value.class_list().add_1("property-value")?;
        value.set_id(&format!("value_{}", row.index));
        value.set_text_content(Some(&row.value));
        root.append_child(&value)?;

        self.properties.append_child(&root)?;
        Ok(())
    }

    fn tree_item(&self, express_id: u32) -> Option<Element> {
        self.tree
            .query_selector(&format!("li[data-express-id=\"{express_id}\"]"))
            .ok()
            .flatten()
    }

    fn panel_text(&self, selector: &str) -> Option<String> {
        self.properties
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|el| el.text_content())
    }
}

fn remove_all_children(element: &Element) {
    while let Some(child) = element.first_child() {
        if element.remove_child(&child).is_err() {
            break;
        }
    }
}

impl RowSource for DomRenderer {
    fn row_count(&self) -> usize {
        self.row_count.get()
    }

    fn read_row(&self, index: usize) -> Option<(String, String)> {
        let name = self.panel_text(&format!("#name_{index}"))?;
        let value = self.panel_text(&format!("#value_{index}"))?;
        Some((name, value))
    }
}

impl Renderer for DomRenderer {
    fn render_outline(&self, outline: &Outline) {
        remove_all_children(&self.tree);
        self.listeners.borrow_mut().clear();
        self.selected.borrow_mut().take();

        if let Err(e) = self.append_node(&self.tree, outline.root()) {
            tracing::warn!(error = %js_error_message(&e), "Failed to render outline");
        }
    }

    fn render_properties(&self, rows: &[PropertyRow]) {
        remove_all_children(&self.properties);
        self.row_count.set(0);

        for row in rows {
            if let Err(e) = self.append_row(row) {
                tracing::warn!(index = row.index, error = %js_error_message(&e), "Failed to render property row");
                return;
            }
            self.row_count.set(row.index + 1);
        }
    }

    fn set_expanded(&self, express_id: u32, expanded: bool) {
        let Some(item) = self.tree_item(express_id) else {
            return;
        };
        for (selector, class) in [(":scope > .caret", "caret-down"), (":scope > .nested", "active")] {
            if let Ok(Some(el)) = item.query_selector(selector) {
                let _ = el.class_list().toggle_with_force(class, expanded);
            }
        }
    }

    fn mark_selected(&self, express_id: Option<u32>) {
        if let Some(previous) = self.selected.borrow_mut().take() {
            let _ = previous.class_list().remove_1("selected");
        }
        if let Some(item) = express_id.and_then(|id| self.tree_item(id)) {
            let _ = item.class_list().add_1("selected");
            *self.selected.borrow_mut() = Some(item);
        }
    }
}
