//! Reference-counted resources keyed by `(kind, path)`.
//!
//! Decoding is not done here. A [`ResourceLoader`] turns a path into raw
//! bytes and the subsystem that owns the kind interprets them. Dynamic
//! resources are created in memory with [`ResourceManager::add`] and carry
//! their bytes through save/load; file-backed ones are reloaded by path.

use crate::error::ResourceError;
use kestrel_base::{Visit, Visitor, visit_as_u32};
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::path::{Path, PathBuf};
use std::sync::Arc;

new_key_type! {
    pub struct ResourceId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Texture,
    Model,
    Sound,
    Font,
}

impl ResourceKind {
    pub fn to_u32(self) -> u32 {
        self as u32
    }

    pub fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Texture),
            1 => Some(Self::Model),
            2 => Some(Self::Sound),
            3 => Some(Self::Font),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResourceFlags(u32);

impl ResourceFlags {
    pub const NONE: Self = Self(0);
    /// Survives the purge that precedes loading a saved world.
    pub const PERSISTENT: Self = Self(1);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn from_bits(bits: u32) -> Self {
        Self(bits & Self::PERSISTENT.0)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

#[derive(Debug, Clone)]
pub struct Resource {
    kind: ResourceKind,
    path: PathBuf,
    ref_count: u32,
    flags: ResourceFlags,
    dynamic: bool,
    data: Vec<u8>,
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ref_count(&self) -> u32 {
        self.ref_count
    }

    pub fn flags(&self) -> ResourceFlags {
        self.flags
    }

    pub fn is_persistent(&self) -> bool {
        self.flags.contains(ResourceFlags::PERSISTENT)
    }

    /// Created in memory rather than loaded from a path.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Source of resource bytes.
pub trait ResourceLoader: Send + Sync {
    fn load(&self, kind: ResourceKind, path: &Path) -> Result<Vec<u8>, ResourceError>;
}

/// Reads resources from files below a root directory.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceLoader for FsLoader {
    fn load(&self, _kind: ResourceKind, path: &Path) -> Result<Vec<u8>, ResourceError> {
        let full = self.root.join(path);
        std::fs::read(&full).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => ResourceError::NotFound(full),
            _ => ResourceError::Io { path: full, source },
        })
    }
}

pub struct ResourceManager {
    resources: SlotMap<ResourceId, Resource>,
    index: FxHashMap<(ResourceKind, PathBuf), ResourceId>,
    loader: Arc<dyn ResourceLoader>,
}

impl ResourceManager {
    pub fn new(loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            resources: SlotMap::with_key(),
            index: FxHashMap::default(),
            loader,
        }
    }

    pub fn loader(&self) -> &Arc<dyn ResourceLoader> {
        &self.loader
    }

    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &Resource)> {
        self.resources.iter()
    }

    /// Looks a resource up without loading it.
    pub fn find(&self, kind: ResourceKind, path: impl AsRef<Path>) -> Option<ResourceId> {
        self.index.get(&(kind, path.as_ref().to_path_buf())).copied()
    }

    /// Returns the resource for `(kind, path)`, loading it on first request.
    /// Every successful call takes one reference.
    pub fn request(&mut self, kind: ResourceKind, path: impl AsRef<Path>) -> Result<ResourceId, ResourceError> {
        self.request_with_flags(kind, path, ResourceFlags::NONE)
    }

    /// Like [`request`](Self::request); `flags` are added to whatever flags
    /// the resource already has.
    pub fn request_with_flags(
        &mut self,
        kind: ResourceKind,
        path: impl AsRef<Path>,
        flags: ResourceFlags,
    ) -> Result<ResourceId, ResourceError> {
        let path = path.as_ref();
        if let Some(id) = self.find(kind, path) {
            let resource = &mut self.resources[id];
            resource.ref_count += 1;
            resource.flags.insert(flags);
            return Ok(id);
        }
        let data = self.loader.load(kind, path)?;
        tracing::debug!("Loaded {:?} `{}` ({} bytes)", kind, path.display(), data.len());
        Ok(self.insert(Resource {
            kind,
            path: path.to_path_buf(),
            ref_count: 1,
            flags,
            dynamic: false,
            data,
        }))
    }

    /// Registers an in-memory resource. If `(kind, path)` is taken, the
    /// existing resource gets the new bytes and one more reference.
    pub fn add(
        &mut self,
        kind: ResourceKind,
        path: impl AsRef<Path>,
        data: Vec<u8>,
        flags: ResourceFlags,
    ) -> ResourceId {
        let path = path.as_ref();
        if let Some(id) = self.find(kind, path) {
            tracing::warn!("Resource `{}` registered twice; replacing its data", path.display());
            let resource = &mut self.resources[id];
            resource.ref_count += 1;
            resource.flags.insert(flags);
            resource.data = data;
            return id;
        }
        self.insert(Resource {
            kind,
            path: path.to_path_buf(),
            ref_count: 1,
            flags,
            dynamic: true,
            data,
        })
    }

    fn insert(&mut self, resource: Resource) -> ResourceId {
        let key = (resource.kind, resource.path.clone());
        let id = self.resources.insert(resource);
        self.index.insert(key, id);
        id
    }

    fn remove(&mut self, id: ResourceId) -> Option<Resource> {
        let resource = self.resources.remove(id)?;
        self.index.remove(&(resource.kind, resource.path.clone()));
        Some(resource)
    }

    /// Drops one reference. Returns `true` when that was the last one and
    /// the resource is gone.
    pub fn release(&mut self, id: ResourceId) -> bool {
        let Some(resource) = self.resources.get_mut(id) else {
            return false;
        };
        resource.ref_count = resource.ref_count.saturating_sub(1);
        if resource.ref_count > 0 {
            return false;
        }
        if let Some(resource) = self.remove(id) {
            tracing::debug!("Freed {:?} `{}`", resource.kind, resource.path.display());
        }
        true
    }

    /// Destroys every resource without the persistent flag, regardless of
    /// its reference count. Returns how many were destroyed.
    pub fn purge_non_persistent(&mut self) -> usize {
        let doomed: Vec<ResourceId> = self
            .resources
            .iter()
            .filter(|(_, r)| !r.is_persistent())
            .map(|(id, _)| id)
            .collect();
        for &id in &doomed {
            self.remove(id);
        }
        doomed.len()
    }

    fn write_resource(resource: &mut Resource, name: &str, visitor: &mut Visitor) -> bool {
        if !visitor.enter_node(name) {
            return false;
        }
        let mut ok = visit_as_u32(visitor, "Kind", &mut resource.kind, ResourceKind::to_u32, ResourceKind::from_u32);
        let mut path = resource.path.to_string_lossy().into_owned();
        ok &= path.visit("Path", visitor);
        ok &= resource.ref_count.visit("RefCount", visitor);
        let mut flags = resource.flags.bits();
        ok &= flags.visit("Flags", visitor);
        ok &= resource.dynamic.visit("Dynamic", visitor);
        if resource.dynamic {
            ok &= visitor.visit_field("Data", &mut resource.data);
        }
        visitor.leave_node();
        ok
    }

    fn read_resource(&mut self, name: &str, visitor: &mut Visitor) -> bool {
        if !visitor.enter_node(name) {
            return false;
        }
        let mut kind = ResourceKind::Texture;
        let mut path = String::new();
        let mut ref_count = 1u32;
        let mut flags = 0u32;
        let mut dynamic = false;
        let mut ok = visit_as_u32(visitor, "Kind", &mut kind, ResourceKind::to_u32, ResourceKind::from_u32);
        ok &= path.visit("Path", visitor);
        ok &= ref_count.visit("RefCount", visitor);
        ok &= flags.visit("Flags", visitor);
        ok &= dynamic.visit("Dynamic", visitor);
        let mut data = Vec::new();
        if dynamic {
            ok &= visitor.visit_field("Data", &mut data);
        }
        visitor.leave_node();

        if !ok {
            tracing::warn!("Skipping unreadable resource record `{}`", name);
            return false;
        }
        // Persistent resources survived the purge and are kept as they are.
        if self.find(kind, &path).is_some() {
            return true;
        }
        let data = if dynamic {
            data
        } else {
            match self.loader.load(kind, Path::new(&path)) {
                Ok(data) => data,
                Err(err) => {
                    tracing::warn!("Failed to reload {:?} `{}`: {}", kind, path, err);
                    return false;
                }
            }
        };
        self.insert(Resource {
            kind,
            path: PathBuf::from(path),
            ref_count: ref_count.max(1),
            flags: ResourceFlags::from_bits(flags),
            dynamic,
            data,
        });
        true
    }
}

impl Visit for ResourceManager {
    /// Reading adds the stored resources to whatever is already registered.
    fn visit(&mut self, name: &str, visitor: &mut Visitor) -> bool {
        if !visitor.enter_node(name) {
            return false;
        }
        let mut ok;
        if visitor.is_reading() {
            let mut count = 0u32;
            ok = count.visit("Count", visitor);
            for i in 0..count {
                ok &= self.read_resource(&format!("Item{}", i), visitor);
            }
        } else {
            let mut count = self.resources.len() as u32;
            ok = count.visit("Count", visitor);
            for (i, resource) in self.resources.values_mut().enumerate() {
                ok &= Self::write_resource(resource, &format!("Item{}", i), visitor);
            }
        }
        visitor.leave_node();
        tracing::debug!("Visited resources ({} registered, ok = {})", self.len(), ok);
        ok
    }
}
