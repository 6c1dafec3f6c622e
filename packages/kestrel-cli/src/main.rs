mod dump;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dump::DumpNode;
use glam::{Vec2, Vec3};
use kestrel_base::{Color, Visitor};
use kestrel_core::{Core, CoreConfig, ResourceFlags, ResourceKind};
use kestrel_gui::WidgetKindTag;
use kestrel_scene::{LightType, NodeKindTag, Scene};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "kestrel")]
#[command(about = "Kestrel engine tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the node tree of a save file
    Inspect {
        file: PathBuf,
        /// Emit JSON instead of an indented tree
        #[arg(long)]
        json: bool,
    },
    /// Write a small demo world to a save file
    Sample {
        out: PathBuf,
        /// Core configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the effective core configuration
    Config { path: Option<PathBuf> },
}

fn load_config(path: Option<&PathBuf>) -> Result<CoreConfig> {
    match path {
        Some(path) => CoreConfig::load(path).with_context(|| format!("reading config {}", path.display())),
        None => Ok(CoreConfig::default()),
    }
}

fn inspect(file: &Path, json: bool) -> Result<()> {
    let mut reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    let visitor = Visitor::load_binary(&mut reader)?;
    let tree = DumpNode::from_visitor(&visitor).context("save file has no root node")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        tree.print(0);
        println!("{} nodes", tree.count());
    }
    Ok(())
}

fn build_sample(core: &Core) {
    let mut world = core.world_mut();
    world.resources.add(
        ResourceKind::Texture,
        "generated/checker",
        vec![0xff, 0x00, 0xff, 0x00],
        ResourceFlags::PERSISTENT,
    );

    let mut scene = Scene::new("demo");
    let camera = scene.create_node(NodeKindTag::Camera);
    if let Some(node) = scene.node_mut(camera) {
        node.name = "Camera".to_string();
        node.local_transform.position = Vec3::new(0.0, 2.0, 5.0);
    }
    let lamp = scene.create_node(NodeKindTag::Light);
    if let Some(node) = scene.node_mut(lamp) {
        node.name = "Flashlight".to_string();
        let light = node.light_mut();
        light.set_light_type(LightType::Spot);
        light.set_cone_angle(0.6);
        light.set_radius(10.0);
        light.set_color(Color::rgb(255, 240, 200));
    }
    scene.attach(lamp, camera);
    let floor = scene.create_node(NodeKindTag::Mesh);
    if let Some(node) = scene.node_mut(floor) {
        node.name = "Floor".to_string();
    }
    scene.update_transforms();
    world.add_scene(scene);

    let gui = &mut world.gui;
    let panel = gui.create_node(WidgetKindTag::Border);
    if let Some(w) = gui.widget_mut(panel) {
        w.name = "Menu".to_string();
        w.desired_position = Vec2::new(20.0, 20.0);
        w.desired_size = Vec2::new(240.0, 120.0);
    }
    let start = gui.create_node(WidgetKindTag::Button);
    gui.attach(start, panel);
    if let Some(w) = gui.widget_mut(start) {
        w.name = "Start".to_string();
        w.desired_position = Vec2::new(10.0, 10.0);
        w.desired_size = Vec2::new(220.0, 30.0);
    }
    gui.set_button_text(start, "Start");
    let input = gui.create_node(WidgetKindTag::TextBox);
    gui.attach(input, panel);
    if let Some(w) = gui.widget_mut(input) {
        w.name = "PlayerName".to_string();
        w.desired_position = Vec2::new(10.0, 60.0);
        w.desired_size = Vec2::new(220.0, 40.0);
        w.text_box_mut().set_text("player");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Inspect { file, json } => inspect(file, *json)?,
        Commands::Sample { out, config } => {
            let core = Core::with_fs_loader(load_config(config.as_ref())?);
            build_sample(&core);
            core.tick();
            let complete = core
                .save_to(out)
                .with_context(|| format!("writing {}", out.display()))?;
            if !complete {
                tracing::warn!("Some values could not be saved");
            }
            println!("Wrote {}", out.display());
        }
        Commands::Config { path } => {
            let config = load_config(path.as_ref())?;
            println!("{}", config.to_json()?);
        }
    }

    Ok(())
}
