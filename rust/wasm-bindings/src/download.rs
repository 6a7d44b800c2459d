// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Browser download strategies for export documents.
//!
//! Hosts exposing `navigator.msSaveOrOpenBlob` get the document as a `Blob`.
//! Everywhere else a temporary `<a download>` pointing at a `data:` URL is
//! clicked. Both hand over the same [`ExportDocument::body`].

use ifc_inspector_core::{Delivery, Error, ExportDocument, Result};
use js_sys::{Array, Function};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, Navigator, Window};

use crate::utils::dom_error;

/// Saves through `navigator.msSaveOrOpenBlob`.
pub struct BlobSave {
    navigator: Navigator,
    save: Function,
}

impl BlobSave {
    /// Returns the strategy if the host offers a blob save facility.
    pub fn detect(navigator: &Navigator) -> Option<Self> {
        let save = js_sys::Reflect::get(navigator, &"msSaveOrOpenBlob".into()).ok()?;
        let save = save.dyn_into::<Function>().ok()?;
        Some(Self {
            navigator: navigator.clone(),
            save,
        })
    }
}

impl Delivery for BlobSave {
    fn name(&self) -> &'static str {
        "blob-save"
    }

    fn deliver(&self, document: &ExportDocument) -> Result<()> {
        let parts = Array::of1(&JsValue::from_str(document.body()));
        let options = BlobPropertyBag::new();
        options.set_type(document.mime);
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(dom_error)?;

        self.save
            .call2(&self.navigator, &blob, &JsValue::from_str(&document.filename))
            .map_err(|e| Error::Delivery(crate::utils::js_error_message(&e)))?;
        Ok(())
    }
}

/// Clicks a temporary anchor carrying the document as a `data:` URL.
pub struct DataLink {
    document: Document,
}

impl DataLink {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

/// `data:` URL of an export document.
pub fn data_url(document: &ExportDocument) -> String {
    let encoded = String::from(js_sys::encode_uri_component(document.body()));
    format!("data:{},{}", document.mime, encoded)
}

impl Delivery for DataLink {
    fn name(&self) -> &'static str {
        "data-link"
    }

    fn deliver(&self, export: &ExportDocument) -> Result<()> {
        let body = self
            .document
            .body()
            .ok_or_else(|| Error::Delivery("document has no body".into()))?;
        let link: HtmlAnchorElement = self
            .document
            .create_element("a")
            .map_err(dom_error)?
            .dyn_into()
            .map_err(|_| Error::Delivery("created element is not an anchor".into()))?;

        link.set_href(&data_url(export));
        link.set_download(&export.filename);
        body.append_child(&link).map_err(dom_error)?;
        link.click();
        link.remove();
        Ok(())
    }
}

/// Picks the strategy the host supports.
pub fn detect(window: &Window) -> Result<Box<dyn Delivery>> {
    if let Some(blob_save) = BlobSave::detect(&window.navigator()) {
        return Ok(Box::new(blob_save));
    }
    let document = window
        .document()
        .ok_or_else(|| Error::Dom("window has no document".into()))?;
    Ok(Box::new(DataLink::new(document)))
}
