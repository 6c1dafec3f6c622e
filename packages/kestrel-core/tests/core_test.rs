use glam::Vec2;
use kestrel_base::Visitor;
use kestrel_core::{
    Core, CoreConfig, CoreError, EventQueue, ResourceError, ResourceFlags, ResourceKind,
    ResourceLoader,
};
use kestrel_gui::{Font, InputEvent, WidgetKindTag};
use kestrel_scene::{NodeKindTag, Scene};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MemoryLoader {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    loads: AtomicUsize,
}

impl MemoryLoader {
    fn with_files(files: &[(&str, &[u8])]) -> Arc<Self> {
        let loader = Self::default();
        for (path, data) in files {
            loader
                .files
                .lock()
                .unwrap()
                .insert(PathBuf::from(path), data.to_vec());
        }
        Arc::new(loader)
    }

    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ResourceLoader for MemoryLoader {
    fn load(&self, _kind: ResourceKind, path: &Path) -> Result<Vec<u8>, ResourceError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_path_buf()))
    }
}

fn test_core() -> (Core, Arc<MemoryLoader>) {
    let loader = MemoryLoader::with_files(&[("tex/a.png", &[1, 2, 3]), ("snd/b.wav", &[9])]);
    let core = Core::new(CoreConfig::default(), loader.clone());
    (core, loader)
}

fn save_bytes(core: &Core) -> Vec<u8> {
    let mut visitor = Visitor::writer();
    let mut session = core.begin_visit();
    assert!(session.visit(&mut visitor));
    core.end_visit(session);
    visitor.to_bytes().unwrap()
}

fn load_bytes(core: &Core, bytes: &[u8]) -> bool {
    let mut visitor = Visitor::reader_from(bytes).unwrap();
    let mut session = core.begin_visit();
    session.visit(&mut visitor)
}

#[test]
fn test_config_defaults_fill_missing_fields() {
    let config = CoreConfig::from_json(r#"{ "title": "Demo", "video_mode": { "width": 1024 } }"#).unwrap();
    assert_eq!(config.title, "Demo");
    assert_eq!(config.video_mode.width, 1024);
    assert_eq!(config.video_mode.height, 600);
    assert_eq!(config.video_mode.bits_per_pixel, 32);
    assert!(!config.borderless);
    assert_eq!(config.data_path, PathBuf::from("data"));

    let json = config.to_json().unwrap();
    assert_eq!(CoreConfig::from_json(&json).unwrap(), config);
}

#[test]
fn test_malformed_config_is_rejected() {
    let err = CoreConfig::from_json("{ \"title\": 5 }").unwrap_err();
    assert!(matches!(err, CoreError::Config(_)));
}

#[test]
fn test_event_queue_is_fifo() {
    let queue = EventQueue::new();
    assert!(queue.is_empty());
    queue.push(InputEvent::Text('a'));
    queue.push(InputEvent::Text('b'));
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.pop(), Some(InputEvent::Text('a')));
    assert_eq!(queue.pop(), Some(InputEvent::Text('b')));
    assert_eq!(queue.pop(), None);
}

#[test]
fn test_core_lifecycle() {
    let (core, _) = test_core();
    assert!(core.is_running());
    assert_eq!(core.world().gui.screen_size(), Vec2::new(800.0, 600.0));

    core.push_event(InputEvent::Text('x'));
    assert_eq!(core.pending_events(), 1);
    assert_eq!(core.poll_event(), Some(InputEvent::Text('x')));
    assert_eq!(core.poll_event(), None);

    core.stop();
    assert!(!core.is_running());
}

#[test]
fn test_request_deduplicates_and_counts_references() {
    let (core, loader) = test_core();
    let mut world = core.world_mut();
    let a = world.resources.request(ResourceKind::Texture, "tex/a.png").unwrap();
    let again = world.resources.request(ResourceKind::Texture, "tex/a.png").unwrap();
    assert_eq!(a, again);
    assert_eq!(loader.loads(), 1);
    assert_eq!(world.resources.get(a).unwrap().ref_count(), 2);
    assert_eq!(world.resources.get(a).unwrap().data(), &[1, 2, 3]);

    // Same path under another kind is a different resource.
    let model = world.resources.request(ResourceKind::Model, "tex/a.png").unwrap();
    assert_ne!(model, a);
    assert_eq!(loader.loads(), 2);

    assert!(!world.resources.release(a));
    assert!(world.resources.release(a));
    assert!(world.resources.get(a).is_none());
    assert_eq!(world.resources.find(ResourceKind::Texture, "tex/a.png"), None);
    assert!(!world.resources.release(a));
}

#[test]
fn test_missing_resource_is_an_error() {
    let (core, _) = test_core();
    let mut world = core.world_mut();
    let err = world
        .resources
        .request(ResourceKind::Sound, "missing.wav")
        .unwrap_err();
    assert!(matches!(err, ResourceError::NotFound(_)));
    assert!(world.resources.is_empty());
}

#[test]
fn test_purge_keeps_persistent_resources() {
    let (core, _) = test_core();
    let mut world = core.world_mut();
    let a = world.resources.request(ResourceKind::Texture, "tex/a.png").unwrap();
    let b = world.resources.request(ResourceKind::Sound, "snd/b.wav").unwrap();
    world
        .resources
        .request_with_flags(ResourceKind::Texture, "tex/a.png", ResourceFlags::PERSISTENT)
        .unwrap();
    assert!(world.resources.get(a).unwrap().is_persistent());

    assert_eq!(world.resources.purge_non_persistent(), 1);
    assert!(world.resources.get(a).is_some());
    assert!(world.resources.get(b).is_none());
}

#[test]
fn test_add_registers_dynamic_resource() {
    let (core, loader) = test_core();
    let mut world = core.world_mut();
    let id = world
        .resources
        .add(ResourceKind::Font, "generated", vec![7, 7], ResourceFlags::NONE);
    assert_eq!(loader.loads(), 0);
    let resource = world.resources.get(id).unwrap();
    assert!(resource.is_dynamic());
    assert_eq!(resource.data(), &[7, 7]);

    let same = world
        .resources
        .request(ResourceKind::Font, "generated")
        .unwrap();
    assert_eq!(same, id);
    assert_eq!(world.resources.get(id).unwrap().ref_count(), 2);
    assert_eq!(loader.loads(), 0);
}

#[test]
fn test_tick_routes_queued_events_to_gui() {
    let (core, _) = test_core();
    let text_box = {
        let mut world = core.world_mut();
        world
            .gui
            .set_default_font(Some(Arc::new(Font::monospace(16.0, 10.0, 1, 'a'..='z'))));
        let id = world.gui.create_node(WidgetKindTag::TextBox);
        world.gui.widget_mut(id).unwrap().desired_size = Vec2::new(200.0, 40.0);
        world.gui.layout();
        world.gui.set_focus(Some(id));
        id
    };

    core.push_event(InputEvent::Text('o'));
    core.push_event(InputEvent::Text('k'));
    assert_eq!(core.tick(), 2);
    assert_eq!(core.pending_events(), 0);

    let world = core.world();
    let widget = world.gui.widget(text_box).unwrap();
    assert_eq!(widget.text_box().text(), "ok");
    assert!(!world.gui.draw_list().is_empty());
}

fn populate(core: &Core) {
    let mut world = core.world_mut();
    world
        .resources
        .request_with_flags(ResourceKind::Texture, "tex/a.png", ResourceFlags::PERSISTENT)
        .unwrap();
    world.resources.request(ResourceKind::Sound, "snd/b.wav").unwrap();
    world
        .resources
        .add(ResourceKind::Font, "generated", vec![7, 7], ResourceFlags::NONE);

    let mut scene = Scene::new("level");
    let lamp = scene.create_node(NodeKindTag::Light);
    let node = scene.node_mut(lamp).unwrap();
    node.name = "Lamp".to_string();
    node.light_mut().set_radius(5.0);
    world.add_scene(scene);

    let input = world.gui.create_node(WidgetKindTag::TextBox);
    let widget = world.gui.widget_mut(input).unwrap();
    widget.name = "Input".to_string();
    widget.text_box_mut().set_text("hi");
}

#[test]
fn test_visit_round_trip_purges_then_restores() {
    let (core, loader) = test_core();
    populate(&core);
    let bytes = save_bytes(&core);
    assert_eq!(loader.loads(), 2);

    {
        let mut world = core.world_mut();
        world.add_scene(Scene::new("scratch"));
        world.gui.create_node(WidgetKindTag::Button);
    }

    assert!(load_bytes(&core, &bytes));
    // Only the non-persistent file-backed resource is loaded again.
    assert_eq!(loader.loads(), 3);

    let world = core.world();
    assert_eq!(world.scenes.len(), 1);
    let scene = world.first_scene().unwrap();
    assert_eq!(scene.name, "level");
    let lamp = scene.find_by_name("Lamp").unwrap();
    assert_eq!(scene.node(lamp).unwrap().light().radius(), 5.0);

    assert_eq!(world.resources.len(), 3);
    let a = world.resources.find(ResourceKind::Texture, "tex/a.png").unwrap();
    assert_eq!(world.resources.get(a).unwrap().ref_count(), 1);
    let b = world.resources.find(ResourceKind::Sound, "snd/b.wav").unwrap();
    assert_eq!(world.resources.get(b).unwrap().data(), &[9]);
    let generated = world.resources.find(ResourceKind::Font, "generated").unwrap();
    let generated = world.resources.get(generated).unwrap();
    assert!(generated.is_dynamic());
    assert_eq!(generated.data(), &[7, 7]);

    assert_eq!(world.gui.len(), 1);
    let input = world.gui.find_by_name("Input").unwrap();
    assert_eq!(world.gui.widget(input).unwrap().text_box().text(), "hi");
}

#[test]
fn test_missing_file_makes_load_partial() {
    let (core, loader) = test_core();
    populate(&core);
    let bytes = save_bytes(&core);
    loader.files.lock().unwrap().remove(Path::new("snd/b.wav"));

    assert!(!load_bytes(&core, &bytes));
    let world = core.world();
    assert_eq!(world.resources.find(ResourceKind::Sound, "snd/b.wav"), None);
    assert_eq!(world.scenes.len(), 1);
    assert!(world.gui.find_by_name("Input").is_some());
}

#[test]
fn test_visit_session_holds_the_world_exclusively() {
    let (core, _) = test_core();
    let shared = core.shared_world();
    let session = core.begin_visit();
    assert!(shared.try_read().is_none());
    assert!(shared.try_write().is_none());
    core.end_visit(session);
    assert!(shared.try_read().is_some());
}

#[test]
fn test_world_is_shared_with_other_threads() {
    let (core, _) = test_core();
    let shared = core.shared_world();
    std::thread::spawn(move || {
        shared.write().add_scene(Scene::new("from worker"));
    })
    .join()
    .unwrap();
    assert_eq!(core.world().first_scene().unwrap().name, "from worker");
}

#[test]
fn test_save_and_load_files() {
    let (core, loader) = test_core();
    populate(&core);
    let path = std::env::temp_dir().join(format!("kestrel-core-test-{}.bin", std::process::id()));
    assert!(core.save_to(&path).unwrap());

    let restored = Core::new(CoreConfig::default(), loader.clone());
    assert!(restored.load_from(&path).unwrap());
    assert_eq!(restored.world().scenes.len(), 1);
    assert_eq!(restored.world().resources.len(), 3);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(restored.load_from(&path), Err(CoreError::Io(_))));
}
