pub mod config;
pub mod engine;
pub mod error;
pub mod queue;
pub mod resource;
pub mod world;

pub use config::{CoreConfig, VideoMode};
pub use engine::{Core, VisitSession};
pub use error::{CoreError, ResourceError};
pub use queue::EventQueue;
pub use resource::{
    FsLoader, Resource, ResourceFlags, ResourceId, ResourceKind, ResourceLoader, ResourceManager,
};
pub use world::World;
