// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ifc_inspector_core::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element};

/// Set panic hook for better error messages in the browser
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Best-effort message of a thrown JavaScript value.
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Converts an inspector error into a JavaScript `Error`.
pub fn to_js_error(err: Error) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Looks up a required page element.
pub fn element_by_id(document: &Document, id: &str) -> Result<Element, Error> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| Error::Dom(format!("element #{id} not found")))
}

/// Wraps a failed DOM call.
pub fn dom_error(value: JsValue) -> Error {
    Error::Dom(js_error_message(&value))
}
