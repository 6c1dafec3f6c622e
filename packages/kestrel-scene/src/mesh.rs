use crate::node::NodeKind;
use kestrel_base::{Visit, Visitor};

/// One drawable part of a mesh. Geometry lives in the renderer; the scene
/// only tracks which texture resource the surface samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    pub texture: Option<String>,
}

impl Visit for Surface {
    fn visit(&mut self, name: &str, visitor: &mut Visitor) -> bool {
        if !visitor.enter_node(name) {
            return false;
        }
        let ok = self.texture.visit("Texture", visitor);
        visitor.leave_node();
        ok
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    surfaces: Vec<Surface>,
    cast_shadows: bool,
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            surfaces: Vec::new(),
            cast_shadows: true,
        }
    }
}

impl Mesh {
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn add_surface(&mut self, surface: Surface) {
        self.surfaces.push(surface);
    }

    pub fn clear_surfaces(&mut self) {
        self.surfaces.clear();
    }

    pub fn cast_shadows(&self) -> bool {
        self.cast_shadows
    }

    pub fn set_cast_shadows(&mut self, value: bool) {
        self.cast_shadows = value;
    }
}

pub(crate) fn init(kind: &mut NodeKind) {
    *kind.mesh_mut() = Mesh::default();
}

pub(crate) fn copy(src: &NodeKind, dest: &mut NodeKind) {
    dest.mesh_mut().clone_from(src.mesh());
}

pub(crate) fn visit(kind: &mut NodeKind, visitor: &mut Visitor) -> bool {
    let mesh = kind.mesh_mut();
    let mut ok = mesh.surfaces.visit("Surfaces", visitor);
    ok &= mesh.cast_shadows.visit("CastShadows", visitor);
    ok
}
