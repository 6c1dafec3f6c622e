use glam::Vec2;
use kestrel_base::{Color, Visit, Visitor};
use kestrel_gui::{Font, Gui, HorizontalAlignment, WidgetKindTag};
use std::sync::Arc;

fn new_gui() -> Gui {
    let mut gui = Gui::new();
    gui.set_screen_size(Vec2::new(640.0, 480.0));
    gui.set_default_font(Some(Arc::new(Font::monospace(
        16.0,
        10.0,
        7,
        ('a'..='z').chain([' ']),
    ))));
    gui
}

fn save(gui: &mut Gui) -> Vec<u8> {
    let mut visitor = Visitor::writer();
    assert!(gui.visit("Gui", &mut visitor));
    visitor.to_bytes().unwrap()
}

fn load(gui: &mut Gui, bytes: &[u8]) -> bool {
    let mut visitor = Visitor::reader_from(bytes).unwrap();
    gui.visit("Gui", &mut visitor)
}

#[test]
fn test_gui_round_trip() {
    let mut gui = new_gui();
    let panel = gui.create_node(WidgetKindTag::Border);
    {
        let w = gui.widget_mut(panel).unwrap();
        w.name = "Panel".to_string();
        w.desired_size = Vec2::new(300.0, 200.0);
        w.border_mut().stroke_thickness = 2.5;
    }
    let button = gui.create_node(WidgetKindTag::Button);
    gui.attach(button, panel);
    {
        let w = gui.widget_mut(button).unwrap();
        w.name = "Ok".to_string();
        w.desired_position = Vec2::new(10.0, 20.0);
        w.button_mut().hover_color = Color::rgb(1, 2, 3);
    }
    let text = gui.widget(button).unwrap().button().text();
    gui.widget_mut(text).unwrap().text_mut().set_text("ok");

    let text_box = gui.create_node(WidgetKindTag::TextBox);
    {
        let w = gui.widget_mut(text_box).unwrap();
        w.name = "Input".to_string();
        w.visible = false;
        let payload = w.text_box_mut();
        payload.set_text("hello\nworld");
        payload.blink_interval = 12;
        payload.horizontal_alignment = HorizontalAlignment::Right;
    }

    let bytes = save(&mut gui);
    let mut restored = new_gui();
    assert!(load(&mut restored, &bytes));
    assert_eq!(restored.len(), 5);
    assert_eq!(restored.roots().len(), 2);

    let panel = restored.find_by_name("Panel").unwrap();
    let w = restored.widget(panel).unwrap();
    assert_eq!(w.tag(), WidgetKindTag::Border);
    assert_eq!(w.desired_size, Vec2::new(300.0, 200.0));
    assert_eq!(w.border().stroke_thickness, 2.5);

    let button = restored.find_by_name("Ok").unwrap();
    let w = restored.widget(button).unwrap();
    assert_eq!(w.parent(), Some(panel));
    assert_eq!(w.desired_position, Vec2::new(10.0, 20.0));
    assert_eq!(w.button().hover_color, Color::rgb(1, 2, 3));

    let (border, text) = (w.button().border(), w.button().text());
    assert_eq!(w.children(), &[border, text]);
    assert_eq!(restored.widget(border).unwrap().tag(), WidgetKindTag::Border);
    let text = restored.widget(text).unwrap();
    assert_eq!(text.text().text(), "ok");
    assert!(!text.hit_test_visible);
    assert!(text.text().font().is_some());

    let text_box = restored.find_by_name("Input").unwrap();
    let w = restored.widget(text_box).unwrap();
    assert!(!w.visible);
    assert_eq!(w.text_box().text(), "hello\nworld");
    assert_eq!(w.text_box().blink_interval, 12);
    assert_eq!(w.text_box().horizontal_alignment, HorizontalAlignment::Right);
    assert_eq!(w.text_box().caret(), (0, 0));
}

#[test]
fn test_restored_button_reacts_to_input() {
    let mut gui = new_gui();
    let button = gui.create_node(WidgetKindTag::Button);
    gui.widget_mut(button).unwrap().desired_size = Vec2::new(100.0, 30.0);
    let bytes = save(&mut gui);

    let mut restored = new_gui();
    assert!(load(&mut restored, &bytes));
    restored.layout();
    let button = restored.roots()[0];
    let border = restored.widget(button).unwrap().button().border();
    assert_eq!(restored.hit_test(Vec2::new(50.0, 15.0)), Some(border));

    restored.process_input(&kestrel_gui::InputEvent::MouseMove {
        pos: Vec2::new(50.0, 15.0),
    });
    assert_eq!(
        restored.widget(border).unwrap().color,
        restored.widget(button).unwrap().button().hover_color
    );
}

#[test]
fn test_reading_replaces_existing_widgets() {
    let mut source = new_gui();
    source.create_node(WidgetKindTag::Text);
    let bytes = save(&mut source);

    let mut target = new_gui();
    let stale = target.create_node(WidgetKindTag::Button);
    target.set_focus(Some(stale));
    assert!(load(&mut target, &bytes));
    assert_eq!(target.len(), 1);
    assert!(!target.contains(stale));
    assert_eq!(target.focused(), None);
    assert_eq!(target.widget(target.roots()[0]).unwrap().tag(), WidgetKindTag::Text);
}

#[test]
fn test_missing_gui_node_fails_to_read() {
    let mut other = Visitor::writer();
    let mut value = 5u32;
    value.visit("Unrelated", &mut other);
    let bytes = other.to_bytes().unwrap();

    let mut gui = new_gui();
    let kept = gui.create_node(WidgetKindTag::Border);
    assert!(!load(&mut gui, &bytes));
    assert!(gui.contains(kept));
}
