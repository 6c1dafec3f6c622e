use crate::resource::{ResourceLoader, ResourceManager};
use kestrel_base::{Visit, Visitor};
use kestrel_gui::Gui;
use kestrel_scene::Scene;
use std::sync::Arc;

/// Everything a saved game contains. Guarded as a whole by the core's lock.
pub struct World {
    pub scenes: Vec<Scene>,
    pub resources: ResourceManager,
    pub gui: Gui,
}

impl World {
    pub fn new(loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            scenes: Vec::new(),
            resources: ResourceManager::new(loader),
            gui: Gui::new(),
        }
    }

    pub fn add_scene(&mut self, scene: Scene) -> usize {
        self.scenes.push(scene);
        self.scenes.len() - 1
    }

    pub fn first_scene(&self) -> Option<&Scene> {
        self.scenes.first()
    }

    pub fn first_scene_mut(&mut self) -> Option<&mut Scene> {
        self.scenes.first_mut()
    }

    /// Destroys every scene, every non-persistent resource and all widgets.
    pub fn purge(&mut self) {
        let scenes = self.scenes.len();
        self.scenes.clear();
        let resources = self.resources.purge_non_persistent();
        self.gui.clear();
        tracing::info!("Purged world ({} scenes, {} resources)", scenes, resources);
    }
}

impl Visit for World {
    /// Reading purges the world first and then rebuilds it from the stream.
    /// Resources come first so scenes and widgets can refer to them.
    fn visit(&mut self, name: &str, visitor: &mut Visitor) -> bool {
        if !visitor.enter_node(name) {
            return false;
        }
        if visitor.is_reading() {
            self.purge();
        }
        let mut ok = self.resources.visit("Resources", visitor);
        ok &= self.scenes.visit("Scenes", visitor);
        ok &= self.gui.visit("Gui", visitor);
        visitor.leave_node();
        ok
    }
}
