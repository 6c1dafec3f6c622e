use crate::node::{Node, NodeKindTag};
use glam::Mat4;
use kestrel_base::{Visit, Visitor, visit_as_u32};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    pub struct NodeId;
}

/// Arena of scene nodes. The arena owns every node; `children` lists hold
/// owning handles and `parent` holds a back-reference.
#[derive(Default)]
pub struct Scene {
    pub name: String,
    nodes: SlotMap<NodeId, Node>,
    roots: SmallVec<[NodeId; 8]>,
}

impl Scene {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: SlotMap::with_key(),
            roots: SmallVec::new(),
        }
    }

    /// Creates a top-level node with the kind defaults applied.
    pub fn create_node(&mut self, tag: NodeKindTag) -> NodeId {
        let id = self.nodes.insert(Node::new(tag));
        self.roots.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.nodes.get(id).and_then(|n| n.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn unlink(&mut self, id: NodeId) {
        match self.nodes[id].parent.take() {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    /// Makes `child` the last child of `parent`, detaching it from wherever it
    /// was. Returns `false` (and changes nothing) if either handle is stale or
    /// the move would create a cycle.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> bool {
        if !self.contains(child) || !self.contains(parent) {
            return false;
        }
        if self.is_ancestor_or_self(child, parent) {
            tracing::warn!("Refusing to attach {:?} under its own descendant {:?}", child, parent);
            return false;
        }
        self.unlink(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        true
    }

    /// Moves `id` to the top level.
    pub fn detach(&mut self, id: NodeId) {
        if self.contains(id) && self.nodes[id].parent.is_some() {
            self.unlink(id);
            self.roots.push(id);
        }
    }

    /// Removes `id` and its whole subtree. Returns the number of nodes freed.
    pub fn remove_node(&mut self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        self.unlink(id);
        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children.iter().copied());
                removed += 1;
            }
        }
        removed
    }

    /// Deep-copies the subtree rooted at `id` into a new top-level subtree.
    pub fn copy_node(&mut self, id: NodeId) -> Option<NodeId> {
        let copy = self.copy_subtree(id)?;
        self.roots.push(copy);
        Some(copy)
    }

    fn copy_subtree(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        let duplicate = node.duplicate();
        let children = node.children.clone();
        let copy = self.nodes.insert(duplicate);
        for child in children {
            if let Some(child_copy) = self.copy_subtree(child) {
                self.nodes[child_copy].parent = Some(copy);
                self.nodes[copy].children.push(child_copy);
            }
        }
        Some(copy)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }

    /// Recomputes every global transform top-down.
    pub fn update_transforms(&mut self) {
        let mut stack: Vec<(NodeId, Mat4)> =
            self.roots.iter().map(|&r| (r, Mat4::IDENTITY)).collect();
        while let Some((id, parent_global)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            node.global_transform = parent_global * node.local_transform.matrix();
            let global = node.global_transform;
            stack.extend(node.children.iter().map(|&c| (c, global)));
        }
    }

    fn write_node(&mut self, id: NodeId, name: &str, visitor: &mut Visitor) -> bool {
        if !visitor.enter_node(name) {
            return false;
        }
        let node = &mut self.nodes[id];
        let mut tag = node.kind.tag();
        let mut ok = visit_as_u32(visitor, "Kind", &mut tag, NodeKindTag::to_u32, NodeKindTag::from_u32);
        ok &= node.name.visit("Name", visitor);
        ok &= node.local_transform.visit("Transform", visitor);
        ok &= (tag.dispatch().visit)(&mut node.kind, visitor);

        let children = node.children.clone();
        if visitor.enter_node("Children") {
            let mut count = children.len() as u32;
            ok &= count.visit("Count", visitor);
            for (i, child) in children.into_iter().enumerate() {
                ok &= self.write_node(child, &format!("Item{}", i), visitor);
            }
            visitor.leave_node();
        }
        visitor.leave_node();
        ok
    }

    fn read_node(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        visitor: &mut Visitor,
    ) -> (Option<NodeId>, bool) {
        if !visitor.enter_node(name) {
            return (None, false);
        }
        let mut tag = NodeKindTag::Base;
        if !visit_as_u32(visitor, "Kind", &mut tag, NodeKindTag::to_u32, NodeKindTag::from_u32) {
            tracing::warn!("Skipping scene node `{}` without a readable kind", name);
            visitor.leave_node();
            return (None, false);
        }
        let id = self.create_node(tag);
        if let Some(parent) = parent {
            self.attach(id, parent);
        }

        let node = &mut self.nodes[id];
        let mut ok = node.name.visit("Name", visitor);
        ok &= node.local_transform.visit("Transform", visitor);
        ok &= (tag.dispatch().visit)(&mut node.kind, visitor);

        if visitor.enter_node("Children") {
            let mut count = 0u32;
            ok &= count.visit("Count", visitor);
            for i in 0..count {
                let (_, child_ok) = self.read_node(&format!("Item{}", i), Some(id), visitor);
                ok &= child_ok;
            }
            visitor.leave_node();
        } else {
            ok = false;
        }
        visitor.leave_node();
        (Some(id), ok)
    }
}

impl Visit for Scene {
    /// Reading replaces the whole content of the scene.
    fn visit(&mut self, name: &str, visitor: &mut Visitor) -> bool {
        if !visitor.enter_node(name) {
            return false;
        }
        let mut ok = self.name.visit("Name", visitor);
        if visitor.enter_node("Nodes") {
            if visitor.is_reading() {
                self.clear();
                let mut count = 0u32;
                ok &= count.visit("Count", visitor);
                for i in 0..count {
                    let (_, node_ok) = self.read_node(&format!("Item{}", i), None, visitor);
                    ok &= node_ok;
                }
            } else {
                let roots = self.roots.clone();
                let mut count = roots.len() as u32;
                ok &= count.visit("Count", visitor);
                for (i, root) in roots.into_iter().enumerate() {
                    ok &= self.write_node(root, &format!("Item{}", i), visitor);
                }
            }
            visitor.leave_node();
        } else {
            ok = false;
        }
        visitor.leave_node();
        tracing::debug!("Visited scene `{}` ({} nodes, ok = {})", self.name, self.len(), ok);
        ok
    }
}
