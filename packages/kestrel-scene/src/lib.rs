pub mod camera;
pub mod light;
pub mod mesh;
pub mod node;
pub mod scene;

pub use camera::Camera;
pub use light::{Light, LightType};
pub use mesh::{Mesh, Surface};
pub use node::{NODE_DISPATCH, Node, NodeDispatchTable, NodeKind, NodeKindTag, Transform};
pub use scene::{NodeId, Scene};
