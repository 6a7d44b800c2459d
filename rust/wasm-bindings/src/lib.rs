// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Inspector WebAssembly Bindings
//!
//! Browser front-end built with wasm-bindgen: mounts `web-ifc-viewer`,
//! renders the spatial tree and property panel, and downloads the
//! displayed properties as a spreadsheet.

use wasm_bindgen::prelude::*;

mod app;
mod dom;
mod download;
mod logging;
mod utils;
mod viewer;

pub use app::IfcInspector;
pub use dom::{DomRenderer, TreeEvent};
pub use download::{data_url, detect as detect_delivery, BlobSave, DataLink};
pub use utils::set_panic_hook as init_panic_hook;
pub use viewer::WebIfcViewer;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
}

/// Get the version of IFC Inspector
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
