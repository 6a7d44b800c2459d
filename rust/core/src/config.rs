// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inspector configuration.
//!
//! Every field has a default, so hosts only pass what they change. Keys are
//! camelCase to match the JavaScript side.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Page elements, scene setup and behavior switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InspectorConfig {
    /// Element hosting the 3D canvas.
    pub container_id: String,
    /// Hidden `<input type="file">` used to pick local models.
    pub file_input_id: String,
    /// Button that opens the file input.
    pub loader_button_id: String,
    /// Property panel container.
    pub properties_id: String,
    /// Spatial tree `<ul>`.
    pub tree_id: String,
    /// Optional button triggering an export.
    pub export_button_id: Option<String>,
    /// Model loaded at mount, if any.
    pub default_model_url: Option<String>,
    /// Export filename; `None` uses the default name.
    pub export_filename: Option<String>,
    /// Drop property responses older than the newest one rendered.
    pub discard_stale_selections: bool,
    /// Console log filter directive (e.g. `info`, `ifc_inspector_core=debug`).
    pub log_level: String,
    pub scene: SceneConfig,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            container_id: "viewer-container".into(),
            file_input_id: "file-input".into(),
            loader_button_id: "loader-button".into(),
            properties_id: "property-menu".into(),
            tree_id: "tree-root".into(),
            export_button_id: None,
            default_model_url: None,
            export_filename: None,
            discard_stale_selections: false,
            log_level: "info".into(),
            scene: SceneConfig::default(),
        }
    }
}

impl InspectorConfig {
    /// Parses a JSON configuration; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Viewer scene setup applied once at mount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    pub axes: bool,
    pub grid_size: u32,
    pub grid_divisions: u32,
    /// Enables the viewer's clipping planes.
    pub clipper: bool,
    /// Moves the model's first vertex to the origin (large coordinates).
    pub coordinate_to_origin: bool,
    pub use_fast_bools: bool,
    /// Frame the camera on elements selected from the outline.
    pub focus_selection: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            axes: true,
            grid_size: 100,
            grid_divisions: 100,
            clipper: true,
            coordinate_to_origin: true,
            use_fast_bools: true,
            focus_selection: true,
        }
    }
}

/// Settings block passed to the geometry engine, in its own key style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeometryEngineSettings {
    #[serde(rename = "COORDINATE_TO_ORIGIN")]
    pub coordinate_to_origin: bool,
    #[serde(rename = "USE_FAST_BOOLS")]
    pub use_fast_bools: bool,
}

impl From<&SceneConfig> for GeometryEngineSettings {
    fn from(scene: &SceneConfig) -> Self {
        Self {
            coordinate_to_origin: scene.coordinate_to_origin,
            use_fast_bools: scene.use_fast_bools,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = InspectorConfig::from_json("{}").unwrap();
        assert_eq!(config, InspectorConfig::default());
        assert_eq!(config.scene.grid_size, 100);
        assert!(!config.discard_stale_selections);
    }

    #[test]
    fn partial_override() {
        let config = InspectorConfig::from_json(
            r#"{"treeId": "myUL", "exportButtonId": "export", "scene": {"axes": false}}"#,
        )
        .unwrap();
        assert_eq!(config.tree_id, "myUL");
        assert_eq!(config.export_button_id.as_deref(), Some("export"));
        assert!(!config.scene.axes);
        assert!(config.scene.clipper);
    }

    #[test]
    fn invalid_json_is_config_error() {
        let err = InspectorConfig::from_json("{\"scene\": 3}").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn engine_settings_use_engine_keys() {
        let json = serde_json::to_string(&GeometryEngineSettings::from(&SceneConfig::default())).unwrap();
        assert_eq!(json, r#"{"COORDINATE_TO_ORIGIN":true,"USE_FAST_BOOLS":true}"#);
    }
}
