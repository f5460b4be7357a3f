use super::raw::{RawModule, RawReason};
use super::shape::{ShapeExtractor, resource_from_name};

/// Layout of webpack 4 stats.
///
/// Modules carry no resolved resource, so it is recovered from the readable name.
#[derive(Debug, Clone, Copy)]
pub(super) struct Webpack4;

impl ShapeExtractor for Webpack4 {
    fn module_resource(&self, module: &RawModule, _context: Option<&str>) -> Option<String> {
        module.name.as_deref().and_then(resource_from_name)
    }

    fn module_type(&self, _module: &RawModule) -> Option<String> {
        None
    }

    fn reason_issuer(&self, reason: &RawReason) -> Option<String> {
        reason
            .module_identifier
            .clone()
            .or_else(|| reason.module_id.as_ref().map(|id| id.as_str().to_string()))
    }
}
