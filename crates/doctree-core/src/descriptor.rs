//! The `project.json` descriptor of a script project.
//!
//! The descriptor is a fixed schema converted to and from the document tree.
//! Reading tolerates unknown fields and fills every missing field with its
//! default. [`DescriptorOverrides`] edits an existing descriptor tree in place
//! through views, so fields the schema does not know about survive.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::value::SerializeOptions;
use crate::view::ObjectView;

/// File name the packager looks for.
pub const DESCRIPTOR_FILE_NAME: &str = "project.json";

/// Native libraries that can be bundled into the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NativeLib {
    /// Android terminal emulation.
    #[serde(rename = "libjackpal-androidterm5.so")]
    AndroidTerm5,
    /// Terminal process execution; usually paired with `AndroidTerm5`.
    #[serde(rename = "libjackpal-termexec2.so")]
    TermExec2,
    #[serde(rename = "libopencv_java4.so")]
    OpenCvJava4,
    #[serde(rename = "libc++_shared.so")]
    CxxShared,
    /// PaddleOCR lightweight runtime.
    #[serde(rename = "libpaddle_light_api_shared.so")]
    PaddleLightApi,
    #[serde(rename = "libhiai.so")]
    HiAi,
    #[serde(rename = "libhiai_ir.so")]
    HiAiIr,
    #[serde(rename = "libhiai_ir_build.so")]
    HiAiIrBuild,
    #[serde(rename = "libNative.so")]
    Native,
    #[serde(rename = "libmlkit_google_ocr_pipeline.so")]
    MlKitOcr,
    /// Tesseract OCR; depends on `Leptonica`.
    #[serde(rename = "libtesseract.so")]
    Tesseract,
    #[serde(rename = "libpng.so")]
    Png,
    #[serde(rename = "libleptonica.so")]
    Leptonica,
    #[serde(rename = "libjpeg.so")]
    Jpeg,
    #[serde(rename = "libp7zip.so")]
    P7Zip,
}

impl NativeLib {
    /// Libraries bundled when a descriptor lists none.
    pub fn defaults() -> BTreeSet<NativeLib> {
        BTreeSet::from([NativeLib::AndroidTerm5, NativeLib::TermExec2])
    }
}

/// Runtime permissions the application requests at launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    AccessibilityServices,
    BackgroundStart,
    DrawOverlay,
}

fn default_splash_text() -> String {
    "Powered by Autoxjs.com. Packaged by IDEA plugin Autojsx WIFI provided".to_string()
}

fn default_service_desc() -> String {
    "Autox WIFI".to_string()
}

/// The `launchConfig` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LaunchConfig {
    /// Hide the launcher icon; the app is then started by other means.
    pub hide_launcher: bool,
    pub stable_mode: bool,
    pub hide_logs: bool,
    /// Volume-up key stops running scripts.
    #[serde(rename = "volumeUpcontrol")]
    pub volume_up_control: bool,
    pub hide_accessibility_services: bool,
    pub display_splash: bool,
    pub splash_icon: Option<String>,
    pub splash_text: String,
    pub service_desc: String,
    pub permissions: BTreeSet<Permission>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            hide_launcher: false,
            stable_mode: false,
            hide_logs: false,
            volume_up_control: false,
            hide_accessibility_services: false,
            display_splash: true,
            splash_icon: None,
            splash_text: default_splash_text(),
            service_desc: default_service_desc(),
            permissions: BTreeSet::new(),
        }
    }
}

/// The whole `project.json` descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDescriptor {
    pub abis: Vec<String>,
    pub assets: Vec<Value>,
    pub build_dir: String,
    pub build: Map<String, Value>,
    pub use_features: Vec<String>,
    pub icon: Option<String>,
    pub ignored_dirs: Vec<String>,
    pub launch_config: LaunchConfig,
    pub libs: BTreeSet<NativeLib>,
    pub main: String,
    pub name: String,
    pub output_path: String,
    pub package_name: String,
    pub project_directory: String,
    pub scripts: Map<String, Value>,
    pub signing_config: Map<String, Value>,
    pub source_path: String,
    pub version_code: i32,
    pub version_name: String,
}

impl Default for ProjectDescriptor {
    fn default() -> Self {
        Self {
            abis: ["arm64-v8a", "armeabi-v7a", "x86", "x86_64"]
                .into_iter()
                .map(String::from)
                .collect(),
            assets: Vec::new(),
            build_dir: "build".to_string(),
            build: Map::new(),
            use_features: Vec::new(),
            icon: None,
            ignored_dirs: Vec::new(),
            launch_config: LaunchConfig::default(),
            libs: BTreeSet::new(),
            main: "main.js".to_string(),
            name: "Test".to_string(),
            output_path: "./".to_string(),
            package_name: "com.zimoyin.autojs.wifi.example".to_string(),
            project_directory: "./".to_string(),
            scripts: Map::new(),
            signing_config: Map::new(),
            source_path: "./".to_string(),
            version_code: 1,
            version_name: "1.0.0".to_string(),
        }
    }
}

impl ProjectDescriptor {
    /// Read a descriptor from JSON text. An empty `libs` set is replaced by
    /// [`NativeLib::defaults`].
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_tree(&ObjectView::parse(json)?)
    }

    /// Read a descriptor from an object view.
    pub fn from_tree(tree: &ObjectView) -> Result<Self> {
        let mut descriptor: ProjectDescriptor = tree.deserialize()?;
        if descriptor.libs.is_empty() {
            descriptor.libs = NativeLib::defaults();
        }
        Ok(descriptor)
    }

    /// Convert into a root object view.
    pub fn to_tree(&self) -> Result<ObjectView> {
        ObjectView::from_serialize(self)
    }

    pub fn to_json(&self, opts: &SerializeOptions) -> Result<String> {
        self.to_tree()?.to_json_string(opts)
    }

    /// Read and parse a descriptor file.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading project descriptor");
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Write the descriptor to `path`, replacing any existing file.
    pub fn save(&self, path: &Path, opts: &SerializeOptions) -> Result<()> {
        let text = self.to_json(opts)?;
        fs::write(path, text)?;
        tracing::debug!(path = %path.display(), "saved project descriptor");
        Ok(())
    }

    /// Locate a descriptor: `path` itself when it is a `project.json` file,
    /// or a `project.json` directly inside `path` when it is a directory.
    /// Nested directories are not searched.
    pub fn find(path: &Path) -> Result<Option<PathBuf>> {
        if path.is_file() {
            let is_descriptor = path.file_name().and_then(|n| n.to_str()) == Some(DESCRIPTOR_FILE_NAME);
            return Ok(is_descriptor.then(|| path.to_path_buf()));
        }
        if path.is_dir() {
            let candidate = path.join(DESCRIPTOR_FILE_NAME);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "found project descriptor");
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

/// Build-time overrides written into an existing descriptor tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorOverrides {
    pub launch_config: Option<LaunchConfig>,
    pub libs: Option<BTreeSet<NativeLib>>,
    pub icon: Option<String>,
    pub version_name: Option<String>,
    pub version_code: Option<i32>,
}

impl DescriptorOverrides {
    /// True when no override is set.
    pub fn is_empty(&self) -> bool {
        *self == DescriptorOverrides::default()
    }

    /// Write every present override into `tree`.
    ///
    /// Launch settings are written field by field into the existing
    /// `launchConfig` object (created first when the tree lacks one), so keys
    /// the schema does not model are left in place.
    pub fn apply(&self, tree: &ObjectView) -> Result<()> {
        if let Some(launch) = &self.launch_config {
            if !matches!(tree.get("launchConfig"), Some(Value::Object(_))) {
                tree.put("launchConfig", Value::Object(Map::new()))?;
            }
            let section = tree.get_object("launchConfig")?;
            let fields = ObjectView::from_serialize(launch)?;
            for name in fields.keys() {
                if let Some(value) = fields.get(&name) {
                    section.put(name, value)?;
                }
            }
        }
        if let Some(libs) = &self.libs {
            tree.put("libs", serde_json::to_value(libs)?)?;
        }
        if let Some(icon) = &self.icon {
            tree.put("icon", icon.as_str())?;
        }
        if let Some(version_name) = &self.version_name {
            tree.put("versionName", version_name.as_str())?;
        }
        if let Some(version_code) = self.version_code {
            tree.put("versionCode", version_code)?;
        }
        Ok(())
    }
}
