use super::ModuleId;
use serde::{Deserialize, Serialize};

/// A package derived from the resource paths of its modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,

    /// Version of the shallowest installation, when known.
    pub version: Option<String>,

    /// Every distinct version found across installations, in ascending order.
    pub versions: Vec<String>,
    pub instances: Vec<PackageInstance>,
}

/// One installation of a package on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInstance {
    pub path: String,
    pub version: Option<String>,
    pub modules: Vec<ModuleId>,
}

impl Package {
    pub fn modules(&self) -> impl Iterator<Item = &ModuleId> {
        self.instances.iter().flat_map(|instance| instance.modules.iter())
    }
}
