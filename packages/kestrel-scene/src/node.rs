use crate::camera::{self, Camera};
use crate::light::{self, Light};
use crate::mesh::{self, Mesh};
use crate::scene::NodeId;
use glam::{Mat4, Quat, Vec3};
use kestrel_base::{Visit, Visitor};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKindTag {
    Base = 0,
    Light = 1,
    Mesh = 2,
    Camera = 3,
}

impl NodeKindTag {
    pub const COUNT: usize = 4;

    pub fn to_u32(self) -> u32 {
        self as u32
    }

    pub fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(NodeKindTag::Base),
            1 => Some(NodeKindTag::Light),
            2 => Some(NodeKindTag::Mesh),
            3 => Some(NodeKindTag::Camera),
            _ => None,
        }
    }

    pub fn dispatch(self) -> &'static NodeDispatchTable {
        &NODE_DISPATCH[self as usize]
    }
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Base,
    Light(Light),
    Mesh(Mesh),
    Camera(Camera),
}

macro_rules! kind_accessors {
    ($($variant:ident, $ty:ty, $get:ident, $get_mut:ident, $as:ident, $as_mut:ident;)*) => {$(
        pub fn $as(&self) -> Option<&$ty> {
            match self {
                NodeKind::$variant(payload) => Some(payload),
                _ => None,
            }
        }

        pub fn $as_mut(&mut self) -> Option<&mut $ty> {
            match self {
                NodeKind::$variant(payload) => Some(payload),
                _ => None,
            }
        }

        /// Panics if the node is of another kind.
        pub fn $get(&self) -> &$ty {
            match self {
                NodeKind::$variant(payload) => payload,
                other => panic!(
                    "node kind mismatch: expected {}, found {:?}",
                    stringify!($variant),
                    other.tag()
                ),
            }
        }

        /// Panics if the node is of another kind.
        pub fn $get_mut(&mut self) -> &mut $ty {
            let tag = self.tag();
            match self {
                NodeKind::$variant(payload) => payload,
                _ => panic!(
                    "node kind mismatch: expected {}, found {:?}",
                    stringify!($variant),
                    tag
                ),
            }
        }
    )*};
}

impl NodeKind {
    pub fn new(tag: NodeKindTag) -> Self {
        match tag {
            NodeKindTag::Base => NodeKind::Base,
            NodeKindTag::Light => NodeKind::Light(Light::default()),
            NodeKindTag::Mesh => NodeKind::Mesh(Mesh::default()),
            NodeKindTag::Camera => NodeKind::Camera(Camera::default()),
        }
    }

    pub fn tag(&self) -> NodeKindTag {
        match self {
            NodeKind::Base => NodeKindTag::Base,
            NodeKind::Light(_) => NodeKindTag::Light,
            NodeKind::Mesh(_) => NodeKindTag::Mesh,
            NodeKind::Camera(_) => NodeKindTag::Camera,
        }
    }

    kind_accessors! {
        Light, Light, light, light_mut, as_light, as_light_mut;
        Mesh, Mesh, mesh, mesh_mut, as_mesh, as_mesh_mut;
        Camera, Camera, camera, camera_mut, as_camera, as_camera_mut;
    }
}

/// Per-kind behavior of scene nodes.
///
/// Every callback receives the payload of a node of the table's own kind;
/// handing it any other kind panics.
pub struct NodeDispatchTable {
    /// Resets the payload to kind defaults.
    pub init: fn(&mut NodeKind),
    /// Deep-copies `src` into `dest`.
    pub copy: fn(&NodeKind, &mut NodeKind),
    /// Visits the payload; `true` only if every field was visited.
    pub visit: fn(&mut NodeKind, &mut Visitor) -> bool,
}

fn base_init(_: &mut NodeKind) {}

fn base_copy(_: &NodeKind, _: &mut NodeKind) {}

fn base_visit(_: &mut NodeKind, _: &mut Visitor) -> bool {
    true
}

/// Indexed by `NodeKindTag as usize`.
pub static NODE_DISPATCH: [NodeDispatchTable; NodeKindTag::COUNT] = [
    NodeDispatchTable {
        init: base_init,
        copy: base_copy,
        visit: base_visit,
    },
    NodeDispatchTable {
        init: light::init,
        copy: light::copy,
        visit: light::visit,
    },
    NodeDispatchTable {
        init: mesh::init,
        copy: mesh::copy,
        visit: mesh::visit,
    },
    NodeDispatchTable {
        init: camera::init,
        copy: camera::copy,
        visit: camera::visit,
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Visit for Transform {
    fn visit(&mut self, name: &str, visitor: &mut Visitor) -> bool {
        if !visitor.enter_node(name) {
            return false;
        }
        let mut ok = self.position.visit("Position", visitor);
        ok &= self.rotation.visit("Rotation", visitor);
        ok &= self.scale.visit("Scale", visitor);
        visitor.leave_node();
        ok
    }
}

#[derive(Debug)]
pub struct Node {
    pub name: String,
    pub local_transform: Transform,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    pub(crate) global_transform: Mat4,
}

impl Node {
    pub(crate) fn new(tag: NodeKindTag) -> Self {
        let mut kind = NodeKind::new(tag);
        (tag.dispatch().init)(&mut kind);
        Self {
            name: String::new(),
            local_transform: Transform::default(),
            kind,
            parent: None,
            children: SmallVec::new(),
            global_transform: Mat4::IDENTITY,
        }
    }

    /// Copy of everything but the tree links and the cached global transform.
    pub(crate) fn duplicate(&self) -> Self {
        let tag = self.kind.tag();
        let mut copy = Node::new(tag);
        copy.name = self.name.clone();
        copy.local_transform = self.local_transform;
        (tag.dispatch().copy)(&self.kind, &mut copy.kind);
        copy
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn tag(&self) -> NodeKindTag {
        self.kind.tag()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Valid after the last [`crate::Scene::update_transforms`].
    pub fn global_transform(&self) -> Mat4 {
        self.global_transform
    }

    pub fn global_position(&self) -> Vec3 {
        self.global_transform.w_axis.truncate()
    }

    pub fn light(&self) -> &Light {
        self.kind.light()
    }

    pub fn light_mut(&mut self) -> &mut Light {
        self.kind.light_mut()
    }

    pub fn mesh(&self) -> &Mesh {
        self.kind.mesh()
    }

    pub fn mesh_mut(&mut self) -> &mut Mesh {
        self.kind.mesh_mut()
    }

    pub fn camera(&self) -> &Camera {
        self.kind.camera()
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        self.kind.camera_mut()
    }
}
