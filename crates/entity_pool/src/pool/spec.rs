//! Pool Configuration
//!
//! Declarative per-kind descriptors, loaded from an asset file and never
//! mutated afterwards.
//!
//! # Example (RON)
//!
//! ```text
//! (
//!     items: [
//!         (
//!             template: "bullet",
//!             amount_to_pool: 32,
//!             should_expand: true,
//!             message_type: ShallowNotify,
//!         ),
//!         (template: "explosion", amount_to_pool: 8, message_type: DeepNotify),
//!     ],
//! )
//! ```

use crate::config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identity of a template (the blueprint a kind's instances are built from)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    /// Create a template identity from its asset name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Asset name of the template
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TemplateId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Which handlers on a recycled entity receive enable/disable events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NotificationMode {
    /// No delivery
    #[default]
    None,
    /// Handlers attached directly to the entity root
    #[serde(alias = "SendMessage")]
    ShallowNotify,
    /// Handlers on the root and every descendant, inactive ones included
    #[serde(alias = "BroadcastMessage")]
    DeepNotify,
}

impl NotificationMode {
    /// Handler scope to collect for this mode, `None` when nothing is delivered
    pub fn scope(self) -> Option<NotificationScope> {
        match self {
            Self::None => None,
            Self::ShallowNotify => Some(NotificationScope::Root),
            Self::DeepNotify => Some(NotificationScope::Subtree),
        }
    }
}

/// Portion of an entity hierarchy whose handlers are collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationScope {
    /// Only the entity itself
    Root,
    /// The entity and all of its descendants, active or not
    Subtree,
}

/// Immutable configuration of one pooled kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolItemSpec {
    /// Template instances are created from
    pub template: TemplateId,
    /// Number of instances kept alive for this kind
    pub amount_to_pool: usize,
    /// Whether acquisition may create instances beyond `amount_to_pool`
    #[serde(default)]
    pub should_expand: bool,
    /// Notification mode for enable/disable events
    #[serde(default)]
    pub message_type: NotificationMode,
}

impl PoolItemSpec {
    /// Fixed-size kind with no notifications
    pub fn new(template: impl Into<TemplateId>, amount_to_pool: usize) -> Self {
        Self {
            template: template.into(),
            amount_to_pool,
            should_expand: false,
            message_type: NotificationMode::None,
        }
    }

    /// Allow growth past the initial capacity
    pub fn expandable(mut self) -> Self {
        self.should_expand = true;
        self
    }

    /// Set the notification mode
    pub fn with_notification(mut self, mode: NotificationMode) -> Self {
        self.message_type = mode;
        self
    }
}

/// Ordered list of pooled kinds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDefinition {
    /// Item specs, in declaration order
    #[serde(default)]
    pub items: Vec<PoolItemSpec>,
}

impl PoolDefinition {
    /// Empty definition
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item spec (builder pattern)
    pub fn with_item(mut self, item: PoolItemSpec) -> Self {
        self.items.push(item);
        self
    }

    /// Reject definitions that list the same template more than once
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if !seen.insert(&item.template) {
                return Err(ConfigError::Invalid(format!(
                    "template '{}' is listed more than once",
                    item.template
                )));
            }
        }
        Ok(())
    }
}

impl Config for PoolDefinition {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_parse_ron_definition() {
        let source = r#"(
            items: [
                (
                    template: "bullet",
                    amount_to_pool: 32,
                    should_expand: true,
                    message_type: ShallowNotify,
                ),
                (template: "explosion", amount_to_pool: 8, message_type: DeepNotify),
                (template: "decal", amount_to_pool: 4),
            ],
        )"#;

        let definition = PoolDefinition::parse(source, ConfigFormat::Ron).expect("valid RON");
        assert_eq!(definition.items.len(), 3);
        assert_eq!(definition.items[0].template, TemplateId::new("bullet"));
        assert!(definition.items[0].should_expand);
        assert_eq!(definition.items[1].message_type, NotificationMode::DeepNotify);
        assert!(!definition.items[2].should_expand);
        assert_eq!(definition.items[2].message_type, NotificationMode::None);
    }

    #[test]
    fn test_parse_toml_definition_with_legacy_names() {
        let source = r#"
            [[items]]
            template = "spark"
            amount_to_pool = 2
            message_type = "SendMessage"

            [[items]]
            template = "debris"
            amount_to_pool = 6
            should_expand = true
            message_type = "BroadcastMessage"
        "#;

        let definition = PoolDefinition::parse(source, ConfigFormat::Toml).expect("valid TOML");
        assert_eq!(definition.items[0].message_type, NotificationMode::ShallowNotify);
        assert_eq!(definition.items[1].message_type, NotificationMode::DeepNotify);
        assert_eq!(definition.items[1].amount_to_pool, 6);
    }

    #[test]
    fn test_negative_capacity_is_rejected_by_parser() {
        let source = r#"(items: [(template: "bullet", amount_to_pool: -1)])"#;
        assert!(PoolDefinition::parse(source, ConfigFormat::Ron).is_err());
    }

    #[test]
    fn test_toml_render_parses_back() {
        let definition = PoolDefinition::new()
            .with_item(PoolItemSpec::new("bullet", 3).expandable())
            .with_item(
                PoolItemSpec::new("smoke", 1).with_notification(NotificationMode::DeepNotify),
            );

        let rendered = definition.render(ConfigFormat::Toml).expect("serializable");
        assert!(rendered.contains("bullet"));
        assert_eq!(PoolDefinition::parse(&rendered, ConfigFormat::Toml).unwrap(), definition);
    }

    #[test]
    fn test_duplicate_templates_fail_validation() {
        let definition = PoolDefinition::new()
            .with_item(PoolItemSpec::new("bullet", 3))
            .with_item(PoolItemSpec::new("bullet", 5));

        assert!(matches!(definition.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_notification_scope() {
        assert_eq!(NotificationMode::None.scope(), None);
        assert_eq!(NotificationMode::ShallowNotify.scope(), Some(NotificationScope::Root));
        assert_eq!(NotificationMode::DeepNotify.scope(), Some(NotificationScope::Subtree));
    }
}
