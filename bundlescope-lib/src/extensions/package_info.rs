use crate::model::RawId;
use serde::{Deserialize, Serialize};

/// Descriptor name of the package-info extension.
pub const PACKAGE_INFO_EXTENSION: &str = "@statoscope/stats-extension-package-info";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageInfoPayload {
    #[serde(default)]
    pub compilations: Vec<PackageInfoCompilation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageInfoCompilation {
    #[serde(default)]
    pub id: Option<RawId>,

    #[serde(default)]
    pub packages: Vec<PackageInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,

    #[serde(default)]
    pub instances: Vec<PackageInfoInstance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInfoInstance {
    pub path: String,

    #[serde(default)]
    pub info: PackageInfoDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageInfoDetails {
    #[serde(default)]
    pub version: Option<String>,
}

impl PackageInfoPayload {
    #[must_use]
    pub fn compilation(&self, hash: Option<&str>, is_root: bool) -> Option<&PackageInfoCompilation> {
        self.compilations.iter().find(|compilation| match (&compilation.id, hash) {
            (Some(id), Some(hash)) => id.as_str() == hash,
            (None, _) => is_root,
            (Some(_), None) => false,
        })
    }
}

impl PackageInfoCompilation {
    /// Version recorded for the package instance installed at `path`.
    ///
    /// Paths are compared without leading `./` and trailing separators.
    #[must_use]
    pub fn version_of(&self, name: &str, path: &str) -> Option<&str> {
        let wanted = normalize_instance_path(path);
        self.packages
            .iter()
            .filter(|package| package.name == name)
            .flat_map(|package| package.instances.iter())
            .find(|instance| normalize_instance_path(&instance.path) == wanted)
            .and_then(|instance| instance.info.version.as_deref())
    }
}

fn normalize_instance_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let path = path.strip_prefix("./").unwrap_or(&path);
    path.trim_end_matches('/').to_string()
}
