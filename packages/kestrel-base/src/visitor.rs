use crate::binary;
use crate::error::VisitError;
use crate::field::{Field, FieldType};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use std::io::{Read, Write};

new_key_type! {
    pub struct VisitorNodeId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitMode {
    Read,
    Write,
}

/// One composite entry of the visitor tree: named fields plus named child
/// nodes. Names are unique among the fields and among the children of a node.
#[derive(Debug, Default)]
pub struct VisitorNode {
    pub(crate) name: String,
    pub(crate) fields: Vec<Field>,
    pub(crate) children: SmallVec<[VisitorNodeId; 4]>,
    pub(crate) parent: Option<VisitorNodeId>,
}

impl VisitorNode {
    pub(crate) fn named(name: &str, parent: Option<VisitorNodeId>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn children(&self) -> &[VisitorNodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<VisitorNodeId> {
        self.parent
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Walks an object graph to or from a hierarchical named-field tree.
///
/// The same `visit` code drives both directions: in [`VisitMode::Write`] every
/// `visit_field` appends to the current node, in [`VisitMode::Read`] it looks
/// the field up by name and decodes it into the caller's value. Lookup is by
/// name, so the order of fields inside a node does not matter when reading.
pub struct Visitor {
    mode: VisitMode,
    nodes: SlotMap<VisitorNodeId, VisitorNode>,
    root: VisitorNodeId,
    current: VisitorNodeId,
}

impl Visitor {
    pub fn writer() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(VisitorNode::named("Root", None));
        Self {
            mode: VisitMode::Write,
            nodes,
            root,
            current: root,
        }
    }

    pub(crate) fn from_tree(nodes: SlotMap<VisitorNodeId, VisitorNode>, root: VisitorNodeId) -> Self {
        Self {
            mode: VisitMode::Read,
            nodes,
            root,
            current: root,
        }
    }

    /// Parses a binary stream into a visitor ready for reading.
    pub fn reader_from(bytes: &[u8]) -> Result<Self, VisitError> {
        Self::load_binary(&mut &bytes[..])
    }

    pub fn load_binary<R: Read>(reader: &mut R) -> Result<Self, VisitError> {
        let (nodes, root) = binary::read_tree(reader)?;
        tracing::debug!("Loaded visitor stream with {} nodes", nodes.len());
        Ok(Self::from_tree(nodes, root))
    }

    pub fn save_binary<W: Write>(&self, writer: &mut W) -> Result<(), VisitError> {
        binary::write_tree(writer, &self.nodes, self.root)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, VisitError> {
        let mut out = Vec::new();
        self.save_binary(&mut out)?;
        Ok(out)
    }

    /// Turns a written tree into a reader positioned at the root, without a
    /// trip through the binary stream.
    pub fn into_reader(self) -> Self {
        Self {
            mode: VisitMode::Read,
            current: self.root,
            ..self
        }
    }

    pub fn mode(&self) -> VisitMode {
        self.mode
    }

    pub fn is_reading(&self) -> bool {
        self.mode == VisitMode::Read
    }

    pub fn root(&self) -> VisitorNodeId {
        self.root
    }

    pub fn current(&self) -> VisitorNodeId {
        self.current
    }

    pub fn node(&self, id: VisitorNodeId) -> Option<&VisitorNode> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn find_child(&self, name: &str) -> Option<VisitorNodeId> {
        self.nodes[self.current]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].name == name)
    }

    /// Moves the cursor into the child node `name`.
    ///
    /// Writing creates the child, or reuses it if one with that name already
    /// exists. Reading returns `false` and leaves the cursor in place when the
    /// child is missing; callers must only call [`Visitor::leave_node`] after a
    /// successful enter.
    pub fn enter_node(&mut self, name: &str) -> bool {
        match self.mode {
            VisitMode::Write => {
                let child = match self.find_child(name) {
                    Some(existing) => existing,
                    None => {
                        let id = self
                            .nodes
                            .insert(VisitorNode::named(name, Some(self.current)));
                        self.nodes[self.current].children.push(id);
                        id
                    }
                };
                self.current = child;
                true
            }
            VisitMode::Read => match self.find_child(name) {
                Some(child) => {
                    self.current = child;
                    true
                }
                None => {
                    tracing::debug!("Visitor node `{}` is missing", name);
                    false
                }
            },
        }
    }

    pub fn leave_node(&mut self) {
        match self.nodes[self.current].parent {
            Some(parent) => self.current = parent,
            None => tracing::warn!("leave_node called at the visitor root"),
        }
    }

    /// Number of fields plus child nodes of the current node.
    pub fn entry_count(&self) -> usize {
        let node = &self.nodes[self.current];
        node.fields.len() + node.children.len()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.nodes[self.current].field(name).is_some()
    }

    /// Writes or reads one named field of the current node.
    ///
    /// On read, returns `false` when the field is absent or stored with a
    /// different type; `value` then keeps whatever the caller put there.
    pub fn visit_field<T: FieldType>(&mut self, name: &str, value: &mut T) -> bool {
        let node = &mut self.nodes[self.current];
        match self.mode {
            VisitMode::Write => {
                let encoded = value.to_field();
                match node.fields.iter_mut().find(|f| f.name == name) {
                    Some(existing) => existing.value = encoded,
                    None => node.fields.push(Field {
                        name: name.to_string(),
                        value: encoded,
                    }),
                }
                true
            }
            VisitMode::Read => {
                let Some(field) = node.field(name) else {
                    tracing::debug!("Field `{}` missing in node `{}`", name, node.name);
                    return false;
                };
                match T::from_field(&field.value) {
                    Some(decoded) => {
                        *value = decoded;
                        true
                    }
                    None => {
                        tracing::debug!(
                            "Field `{}` has tag {:?}, expected {:?}",
                            name,
                            field.value.tag(),
                            T::TAG
                        );
                        false
                    }
                }
            }
        }
    }
}
