use crate::config::{CoreConfig, VideoMode};
use crate::error::CoreError;
use crate::queue::EventQueue;
use crate::resource::{FsLoader, ResourceLoader};
use crate::world::World;
use glam::Vec2;
use kestrel_base::{Visit, Visitor};
use kestrel_gui::InputEvent;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Owns the world and drives it one frame at a time.
///
/// The world sits behind a single `RwLock`. Worker threads that touch scenes,
/// resources or the GUI take it through [`Core::shared_world`]; a save or
/// load holds it exclusively for the whole [`VisitSession`].
pub struct Core {
    config: CoreConfig,
    world: Arc<RwLock<World>>,
    events: EventQueue,
    running: AtomicBool,
}

impl Core {
    pub fn new(config: CoreConfig, loader: Arc<dyn ResourceLoader>) -> Self {
        let mut world = World::new(loader);
        let mode = config.video_mode;
        world
            .gui
            .set_screen_size(Vec2::new(mode.width as f32, mode.height as f32));
        tracing::info!(
            "Core `{}` started at {}x{}x{}",
            config.title,
            mode.width,
            mode.height,
            mode.bits_per_pixel
        );
        Self {
            config,
            world: Arc::new(RwLock::new(world)),
            events: EventQueue::new(),
            running: AtomicBool::new(true),
        }
    }

    /// Loads resources from files under `config.data_path`.
    pub fn with_fs_loader(config: CoreConfig) -> Self {
        let loader = Arc::new(FsLoader::new(config.data_path.clone()));
        Self::new(config, loader)
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn video_mode(&self) -> VideoMode {
        self.config.video_mode
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn stop(&self) {
        tracing::info!("Core stopping");
        self.running.store(false, Ordering::Release);
    }

    /// Injects an event; it is processed on the next [`tick`](Self::tick).
    pub fn push_event(&self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn poll_event(&self) -> Option<InputEvent> {
        self.events.pop()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Runs one frame: routes every queued event through the GUI, refreshes
    /// scene transforms and then updates, lays out and renders the GUI.
    /// Returns the number of events processed.
    pub fn tick(&self) -> usize {
        let mut world = self.world.write();
        let mut processed = 0;
        while let Some(event) = self.events.pop() {
            world.gui.process_input(&event);
            processed += 1;
        }
        for scene in &mut world.scenes {
            scene.update_transforms();
        }
        world.gui.frame();
        tracing::debug!("Tick processed {} events", processed);
        processed
    }

    pub fn shared_world(&self) -> Arc<RwLock<World>> {
        self.world.clone()
    }

    pub fn world(&self) -> RwLockReadGuard<'_, World> {
        self.world.read()
    }

    pub fn world_mut(&self) -> RwLockWriteGuard<'_, World> {
        self.world.write()
    }

    /// Takes the world lock exclusively. Every other thread blocks on the
    /// world until the session is ended or dropped.
    pub fn begin_visit(&self) -> VisitSession<'_> {
        tracing::debug!("Begin visit");
        VisitSession {
            world: self.world.write(),
        }
    }

    pub fn end_visit(&self, session: VisitSession<'_>) {
        drop(session);
    }

    /// Writes the whole world to `path`. A `false` from the visit only means
    /// some value could not be stored and is reported as a warning.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<bool, CoreError> {
        let path = path.as_ref();
        let mut visitor = Visitor::writer();
        let ok = self.begin_visit().visit(&mut visitor);
        if !ok {
            tracing::warn!("Save to `{}` is incomplete", path.display());
        }
        let mut file = BufWriter::new(File::create(path)?);
        visitor.save_binary(&mut file)?;
        file.flush()?;
        tracing::info!("Saved world to `{}`", path.display());
        Ok(ok)
    }

    /// Replaces the world with the one stored at `path`. Returns whether
    /// every stored value was restored.
    pub fn load_from(&self, path: impl AsRef<Path>) -> Result<bool, CoreError> {
        let path = path.as_ref();
        let mut file = BufReader::new(File::open(path)?);
        let mut visitor = Visitor::load_binary(&mut file)?;
        let ok = self.begin_visit().visit(&mut visitor);
        if !ok {
            tracing::warn!("Load from `{}` was partial", path.display());
        }
        tracing::info!("Loaded world from `{}`", path.display());
        Ok(ok)
    }
}

/// Exclusive access to the world for the duration of a save or load.
pub struct VisitSession<'a> {
    world: RwLockWriteGuard<'a, World>,
}

impl VisitSession<'_> {
    /// Visits the world under the root node `Core`. In read mode the world
    /// is purged before anything is read.
    pub fn visit(&mut self, visitor: &mut Visitor) -> bool {
        self.world.visit("Core", visitor)
    }

    pub fn world(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Drop for VisitSession<'_> {
    fn drop(&mut self) {
        tracing::debug!("End visit");
    }
}
