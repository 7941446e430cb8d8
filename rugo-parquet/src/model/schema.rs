use std::collections::BTreeMap;

use log::warn;
use rugo_error::{RugoResult, rugo_bail};
use rugo_thrift::{CompactReader, ReadThrift, ThriftType};

use crate::model::logical::read_logical_type;
use crate::model::skip_field;
use crate::{ConvertedType, LogicalType, PhysicalType, Repetition};

/// A node of the schema tree.
///
/// The footer stores the schema as a depth-first list of elements, each declaring how many
/// children follow it. Decoding rebuilds the tree; the root is the first element and names
/// the table rather than a column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SchemaNode {
    pub name: String,
    /// Set for leaves only.
    pub physical_type: Option<PhysicalType>,
    /// The byte width of `FIXED_LEN_BYTE_ARRAY` values.
    pub type_length: Option<i32>,
    pub repetition: Option<Repetition>,
    pub converted_type: Option<ConvertedType>,
    /// The explicit logical type if present, otherwise the one implied by `converted_type`.
    pub logical_type: Option<LogicalType>,
    /// The child count declared by the element.
    pub num_children: Option<i32>,
    pub scale: Option<i32>,
    pub precision: Option<i32>,
    pub field_id: Option<i32>,
    pub children: Vec<SchemaNode>,
}

impl SchemaNode {
    fn declared_children(&self) -> usize {
        self.num_children
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Every node below this one paired with its dot-joined path, in depth-first order.
    ///
    /// Paths start at the children of `self`, so called on the root they match the column
    /// names of the row groups.
    pub fn descendants(&self) -> Vec<(String, &SchemaNode)> {
        let mut result = Vec::new();
        let mut stack: Vec<(String, &SchemaNode)> = self
            .children
            .iter()
            .rev()
            .map(|child| (child.name.clone(), child))
            .collect();
        while let Some((path, node)) = stack.pop() {
            stack.extend(
                node.children
                    .iter()
                    .rev()
                    .map(|child| (format!("{path}.{}", child.name), child)),
            );
            result.push((path, node));
        }
        result
    }

    /// The path to logical type map used to annotate columns.
    pub fn logical_types(&self) -> BTreeMap<String, LogicalType> {
        self.descendants()
            .into_iter()
            .filter_map(|(path, node)| node.logical_type.map(|logical| (path, logical)))
            .collect()
    }

    /// Rebuild the tree from the flattened depth-first element list.
    ///
    /// Elements declaring more children than remain get only those that remain, and
    /// elements left over once the root is complete are attached to the root. Trees deeper
    /// than `max_depth` are rejected.
    pub fn try_from_elements(elements: Vec<SchemaNode>, max_depth: usize) -> RugoResult<Option<Self>> {
        let mut elements = elements.into_iter();
        let Some(root) = elements.next() else {
            return Ok(None);
        };

        let mut stack = vec![root];
        let mut overflowed = false;
        for element in elements {
            close_complete(&mut stack);
            if stack.len() == 1 && stack[0].children.len() >= stack[0].declared_children() {
                overflowed = true;
            }
            if stack.len() > max_depth {
                rugo_bail!(NestingTooDeep: max_depth);
            }
            stack.push(element);
        }
        if overflowed {
            warn!("schema has more elements than its root declares, attaching them to the root");
        }

        let mut truncated = false;
        while let Some(node) = stack.pop() {
            truncated |= node.children.len() < node.declared_children();
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => {
                    if truncated {
                        warn!("schema ends before every declared child, treating the rest as absent");
                    }
                    return Ok(Some(node));
                }
            }
        }
        Ok(None)
    }
}

/// Pop every node whose declared children are all attached, below the root.
fn close_complete(stack: &mut Vec<SchemaNode>) {
    while stack.len() > 1 {
        match stack.last() {
            Some(node) if node.children.len() >= node.declared_children() => {}
            _ => return,
        }
        if let Some(node) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
            }
        }
    }
}

impl ReadThrift for SchemaNode {
    /// Decode a single `SchemaElement`; children are attached by [`SchemaNode::try_from_elements`].
    fn read_thrift(reader: &mut CompactReader) -> RugoResult<Self> {
        let mut node = SchemaNode::default();
        reader.read_struct(|reader, field| {
            match (field.id, field.ty) {
                (1, ThriftType::I32) => node.physical_type = Some(reader.read_i32()?.into()),
                (2, ThriftType::I32) => node.type_length = Some(reader.read_i32()?),
                (3, ThriftType::I32) => node.repetition = Some(reader.read_i32()?.into()),
                (4, ThriftType::Binary) => node.name = reader.read_string()?,
                (5, ThriftType::I32) => node.num_children = Some(reader.read_i32()?),
                (6, ThriftType::I32) => node.converted_type = Some(reader.read_i32()?.into()),
                (7, ThriftType::I32) => node.scale = Some(reader.read_i32()?),
                (8, ThriftType::I32) => node.precision = Some(reader.read_i32()?),
                (9, ThriftType::I32) => node.field_id = Some(reader.read_i32()?),
                (10, ThriftType::Struct) => node.logical_type = read_logical_type(reader)?,
                _ => skip_field(reader, "SchemaElement", field)?,
            }
            Ok(())
        })?;
        if node.logical_type.is_none() {
            node.logical_type = node
                .converted_type
                .and_then(|converted| converted.to_logical_type(node.scale, node.precision));
        }
        Ok(node)
    }
}
