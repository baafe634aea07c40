//! Applying a [`BodySchema`] to a [`Body`].

use std::collections::HashMap;

use super::{Attribute, Block, Body, Item};
use crate::diagnostic::{Diagnostic, Diagnostics, did_you_mean};
use crate::schema::BodySchema;

/// The parts of a body that a schema accepted.
#[derive(Debug, Default)]
pub struct BodyContent<'a> {
    pub attributes: HashMap<&'a str, &'a Attribute>,
    /// Accepted child blocks in source order.
    pub blocks: Vec<&'a Block>,
}

impl<'a> BodyContent<'a> {
    pub fn attribute(&self, name: &str) -> Option<&'a Attribute> {
        self.attributes.get(name).copied()
    }
}

impl Body {
    /// Check this body against `schema`.
    ///
    /// Unknown attributes and blocks, duplicate attributes and blocks with
    /// too many labels are reported and left out of the result. Missing
    /// required attributes are reported after the items, at the body's
    /// missing-item range. Diagnostics come out in source order.
    pub fn content<'a>(&'a self, schema: &BodySchema) -> (BodyContent<'a>, Diagnostics) {
        let mut content = BodyContent::default();
        let mut diags = Diagnostics::new();

        for item in &self.items {
            match item {
                Item::Attribute(attr) => {
                    let name = attr.name.name.as_str();
                    if schema.attribute(name).is_none() {
                        diags.push(unsupported_argument(attr, schema));
                        continue;
                    }
                    if let Some(first) = content.attributes.get(name) {
                        diags.push(Diagnostic::error(
                            attr.name.range.clone(),
                            "Duplicate argument",
                            format!(
                                "The argument {name:?} was already set at {}. Each argument may be set only once.",
                                first.name.range
                            ),
                        ));
                        continue;
                    }
                    content.attributes.insert(name, attr);
                }
                Item::Block(block) => {
                    let Some(header) = schema.block(block.type_name()) else {
                        diags.push(unsupported_block(block, schema));
                        continue;
                    };
                    if let Some(extra) = block.labels.get(header.label_names.len()) {
                        let detail = if header.label_names.is_empty() {
                            format!("No labels are expected for {} blocks.", header.type_name)
                        } else {
                            format!(
                                "Only {} labels ({}) are expected for {} blocks.",
                                header.label_names.len(),
                                header.label_names.join(", "),
                                header.type_name
                            )
                        };
                        diags.push(Diagnostic::error(
                            extra.range.clone(),
                            format!("Extraneous label for {}", header.type_name),
                            detail,
                        ));
                        continue;
                    }
                    content.blocks.push(block);
                }
            }
        }

        for attr in schema.attributes.iter().filter(|a| a.required) {
            if !content.attributes.contains_key(attr.name) {
                diags.push(Diagnostic::error(
                    self.missing_item_range.clone(),
                    "Missing required argument",
                    format!(
                        "The argument {:?} is required, but no definition was found.",
                        attr.name
                    ),
                ));
            }
        }

        (content, diags)
    }
}

fn unsupported_argument(attr: &Attribute, schema: &BodySchema) -> Diagnostic {
    let name = attr.name.name.as_str();
    let hint = if schema.block(name).is_some() {
        Some(format!("Did you mean to define a block of type {name:?}?"))
    } else {
        did_you_mean(name, schema.attribute_names())
    };
    Diagnostic::error(
        attr.name.range.clone(),
        "Unsupported argument",
        format!("An argument named {name:?} is not expected here."),
    )
    .with_hint(hint)
}

fn unsupported_block(block: &Block, schema: &BodySchema) -> Diagnostic {
    let name = block.type_name();
    let hint = if schema.attribute(name).is_some() {
        Some(format!(
            "Did you mean to define argument {name:?}? If so, use the equals sign to assign it a value."
        ))
    } else {
        did_you_mean(name, schema.block_types())
    };
    Diagnostic::error(
        block.ident.range.clone(),
        "Unsupported block type",
        format!("Blocks of type {name:?} are not expected here."),
    )
    .with_hint(hint)
}
