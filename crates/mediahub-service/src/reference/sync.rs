//! Reference resolution with fallbacks for the public read path.
//!
//! Nothing is cached: every call classifies the value as it is stored now.

use tracing::warn;

use mediahub_core::traits::entity::EntityReader;
use mediahub_core::types::OwnerRef;
use mediahub_storage::{AssetLocator, AssetResolver};

use super::fields::ReferenceFields;

/// Resolves stored references to displayable URLs.
#[derive(Debug, Clone)]
pub struct ReferenceSync {
    resolver: AssetResolver,
}

impl ReferenceSync {
    /// Creates a new reference resolver.
    pub fn new(resolver: AssetResolver) -> Self {
        Self { resolver }
    }

    /// The URL to display for `field` on `entity`.
    pub fn resolve(&self, entity: &impl ReferenceFields, field: &str, fallback: &str) -> String {
        self.resolve_value(entity.reference_value(field), fallback)
    }

    /// The URL to display for a raw stored value. Recognized values are
    /// returned as stored minus surrounding whitespace; anything else
    /// yields `fallback`.
    pub fn resolve_value(&self, value: Option<&str>, fallback: &str) -> String {
        match (self.resolver.classify(value), value) {
            (AssetLocator::Canonical { .. } | AssetLocator::Legacy { .. }, Some(stored)) => {
                stored.trim().to_string()
            }
            (AssetLocator::Unrecognized { raw }, _) => {
                warn!(value = %raw, "Unrecognized asset reference; using fallback");
                fallback.to_string()
            }
            _ => fallback.to_string(),
        }
    }

    /// Read `owner.field` through `reader` and resolve it. Read failures
    /// yield `fallback`.
    pub async fn resolve_owner(
        &self,
        reader: &dyn EntityReader,
        owner: &OwnerRef,
        field: &str,
        fallback: &str,
    ) -> String {
        match reader.read_reference(owner, field).await {
            Ok(value) => self.resolve_value(value.as_deref(), fallback),
            Err(err) => {
                warn!(owner = %owner, field, error = %err, "Reference read failed; using fallback");
                fallback.to_string()
            }
        }
    }
}
