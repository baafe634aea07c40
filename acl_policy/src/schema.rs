//! Static schema catalog for ACL policy files.
//!
//! Each nesting level of a policy file has a [`BodySchema`] describing the
//! attributes and child blocks it accepts. The decoder picks the schema for
//! a rule block from its header keyword via [`RuleKind`]; adding a new rule
//! kind means adding a row here, not touching the decode loop.

use serde::Serialize;

/// An attribute accepted in a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeSchema {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// A child block accepted in a body.
///
/// `label_names` is the maximum set of header labels; labels may be
/// omitted, but more than this many is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockHeaderSchema {
    pub type_name: &'static str,
    pub label_names: &'static [&'static str],
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BodySchema {
    pub attributes: &'static [AttributeSchema],
    pub blocks: &'static [BlockHeaderSchema],
}

impl BodySchema {
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn block(&self, type_name: &str) -> Option<&BlockHeaderSchema> {
        self.blocks.iter().find(|b| b.type_name == type_name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes.iter().map(|a| a.name)
    }

    pub fn block_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.blocks.iter().map(|b| b.type_name)
    }
}

pub const POLICY_BLOCK: &str = "policy";
pub const ACL_ATTR: &str = "acl";
pub const NAME_ATTR: &str = "name";
pub const POLICY_ATTR: &str = "policy";
pub const INTENTIONS_ATTR: &str = "intentions";

const NAME_LABEL: &[&str] = &["name"];

/// The file body: exactly the `policy` block.
pub static TOP_LEVEL: BodySchema = BodySchema {
    attributes: &[],
    blocks: &[BlockHeaderSchema {
        type_name: POLICY_BLOCK,
        label_names: &[],
        description: "The ACL policy: a default stance plus per-subject rules",
    }],
};

/// The body of the `policy` block.
pub static POLICY_BODY: BodySchema = BodySchema {
    attributes: &[AttributeSchema {
        name: ACL_ATTR,
        required: true,
        description: "Default ACL stance (e.g. read, write, deny)",
    }],
    blocks: &[
        BlockHeaderSchema {
            type_name: "node",
            label_names: NAME_LABEL,
            description: "Rule for the node with exactly this name",
        },
        BlockHeaderSchema {
            type_name: "node_prefix",
            label_names: NAME_LABEL,
            description: "Rule for every node whose name starts with this prefix",
        },
        BlockHeaderSchema {
            type_name: "service",
            label_names: NAME_LABEL,
            description: "Rule for the service with exactly this name",
        },
        BlockHeaderSchema {
            type_name: "service_prefix",
            label_names: NAME_LABEL,
            description: "Rule for every service whose name starts with this prefix",
        },
    ],
};

const NAME_SCHEMA: AttributeSchema = AttributeSchema {
    name: NAME_ATTR,
    required: false,
    description: "Subject name or prefix; overrides the header label",
};

const POLICY_SCHEMA: AttributeSchema = AttributeSchema {
    name: POLICY_ATTR,
    required: true,
    description: "Verdict for matching subjects",
};

/// The body of `node` and `node_prefix` blocks.
pub static NODE_RULE_BODY: BodySchema = BodySchema {
    attributes: &[NAME_SCHEMA, POLICY_SCHEMA],
    blocks: &[],
};

/// The body of `service` and `service_prefix` blocks.
pub static SERVICE_RULE_BODY: BodySchema = BodySchema {
    attributes: &[
        NAME_SCHEMA,
        POLICY_SCHEMA,
        AttributeSchema {
            name: INTENTIONS_ATTR,
            required: false,
            description: "Intentions policy where this service is the destination",
        },
    ],
    blocks: &[],
};

/// The four rule block kinds that may appear inside `policy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Node,
    NodePrefix,
    Service,
    ServicePrefix,
}

impl RuleKind {
    pub const ALL: [RuleKind; 4] = [
        RuleKind::Node,
        RuleKind::NodePrefix,
        RuleKind::Service,
        RuleKind::ServicePrefix,
    ];

    /// The block header keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            RuleKind::Node => "node",
            RuleKind::NodePrefix => "node_prefix",
            RuleKind::Service => "service",
            RuleKind::ServicePrefix => "service_prefix",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.keyword() == keyword)
    }

    pub fn body_schema(self) -> &'static BodySchema {
        match self {
            RuleKind::Node | RuleKind::NodePrefix => &NODE_RULE_BODY,
            RuleKind::Service | RuleKind::ServicePrefix => &SERVICE_RULE_BODY,
        }
    }

    pub fn is_service(self) -> bool {
        matches!(self, RuleKind::Service | RuleKind::ServicePrefix)
    }
}

/// One nesting level of the catalog, for self-documentation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SchemaLevel {
    pub name: &'static str,
    pub description: &'static str,
    pub schema: &'static BodySchema,
}

/// Every schema, outermost first.
pub fn catalog() -> [SchemaLevel; 4] {
    [
        SchemaLevel {
            name: "file",
            description: "Top level of a policy file",
            schema: &TOP_LEVEL,
        },
        SchemaLevel {
            name: "policy",
            description: "Body of the policy block",
            schema: &POLICY_BODY,
        },
        SchemaLevel {
            name: "node, node_prefix",
            description: "Body of a node rule",
            schema: &NODE_RULE_BODY,
        },
        SchemaLevel {
            name: "service, service_prefix",
            description: "Body of a service rule",
            schema: &SERVICE_RULE_BODY,
        },
    ]
}
