use super::raw::{RawModule, RawReason};
use super::shape::{ShapeExtractor, relative_to_context, resource_from_name};

/// Layout of webpack 5 stats.
#[derive(Debug, Clone, Copy)]
pub(super) struct Webpack5;

impl ShapeExtractor for Webpack5 {
    fn module_resource(&self, module: &RawModule, context: Option<&str>) -> Option<String> {
        match &module.name_for_condition {
            Some(path) => Some(relative_to_context(path, context)),
            None => module.name.as_deref().and_then(resource_from_name),
        }
    }

    fn module_type(&self, module: &RawModule) -> Option<String> {
        module.module_type.clone()
    }

    fn reason_issuer(&self, reason: &RawReason) -> Option<String> {
        reason
            .resolved_module_identifier
            .clone()
            .or_else(|| reason.module_identifier.clone())
            .or_else(|| reason.module_id.as_ref().map(|id| id.as_str().to_string()))
    }
}
