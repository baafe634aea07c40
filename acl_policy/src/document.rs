//! Typed result of decoding a policy file.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::RuleKind;

/// A decoded ACL policy: the default stance plus ordered rule overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub default_acl: String,
    #[serde(default)]
    pub nodes: Vec<NodeRule>,
    #[serde(default)]
    pub node_prefixes: Vec<NodeRule>,
    #[serde(default)]
    pub services: Vec<ServiceRule>,
    #[serde(default)]
    pub service_prefixes: Vec<ServiceRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRule {
    pub name: String,
    pub policy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRule {
    pub name: String,
    pub policy: String,
    /// Intentions policy where this service is the destination. When unset,
    /// `policy` governs intentions as well.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intentions: Option<String>,
}

/// The fields every rule kind shares, before they are sorted into a
/// category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RuleFields {
    pub name: String,
    pub policy: String,
    pub intentions: Option<String>,
}

impl PolicyDocument {
    pub fn new(default_acl: impl Into<String>) -> Self {
        Self {
            default_acl: default_acl.into(),
            ..Self::default()
        }
    }

    /// Append a decoded rule to the sequence for `kind`.
    pub(crate) fn push_rule(&mut self, kind: RuleKind, fields: RuleFields) {
        let RuleFields {
            name,
            policy,
            intentions,
        } = fields;
        match kind {
            RuleKind::Node => self.nodes.push(NodeRule { name, policy }),
            RuleKind::NodePrefix => self.node_prefixes.push(NodeRule { name, policy }),
            RuleKind::Service => self.services.push(ServiceRule {
                name,
                policy,
                intentions,
            }),
            RuleKind::ServicePrefix => self.service_prefixes.push(ServiceRule {
                name,
                policy,
                intentions,
            }),
        }
    }

    /// Total number of rules across all categories.
    pub fn rule_count(&self) -> usize {
        self.nodes.len() + self.node_prefixes.len() + self.services.len() + self.service_prefixes.len()
    }

    pub fn has_rules(&self) -> bool {
        self.rule_count() > 0
    }
}

impl fmt::Display for NodeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "name={:?} policy={:?}", self.name, self.policy)
    }
}

impl fmt::Display for ServiceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "name={:?} policy={:?}", self.name, self.policy)?;
        if let Some(intentions) = &self.intentions {
            write!(f, " intentions={intentions:?}")?;
        }
        Ok(())
    }
}
