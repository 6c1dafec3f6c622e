use crate::draw::DrawList;
use crate::event::{RoutedEvent, RoutedEventArgs};
use crate::gui::Gui;
use crate::property::{PropertyEntry, property};
use crate::widget::{HorizontalAlignment, VerticalAlignment, Widget, WidgetId, WidgetKind};
use crate::widgets::{border, text};
use kestrel_base::{Color, Visit, Visitor};
use std::sync::Arc;

pub type ClickHandler = Arc<dyn Fn(&mut Gui, WidgetId) + Send + Sync>;

/// Clickable widget composed of a border child and a text child.
///
/// The border's color tracks the interaction state: `normal_color` at rest,
/// `hover_color` under the pointer and `pressed_color` while held down.
pub struct Button {
    pub normal_color: Color,
    pub hover_color: Color,
    pub pressed_color: Color,
    pub(crate) border: WidgetId,
    pub(crate) text: WidgetId,
    pub(crate) was_pressed: bool,
    pub(crate) click: Option<ClickHandler>,
}

impl Button {
    /// Children are wired up by the caller.
    pub(crate) fn detached() -> Self {
        Self {
            normal_color: Color::rgb(120, 120, 120),
            hover_color: Color::rgb(140, 140, 140),
            pressed_color: Color::rgb(100, 100, 100),
            border: WidgetId::default(),
            text: WidgetId::default(),
            was_pressed: false,
            click: None,
        }
    }

    pub fn border(&self) -> WidgetId {
        self.border
    }

    pub fn text(&self) -> WidgetId {
        self.text
    }

    pub fn was_pressed(&self) -> bool {
        self.was_pressed
    }

    pub fn has_click(&self) -> bool {
        self.click.is_some()
    }
}

pub(crate) fn create(gui: &mut Gui) -> WidgetId {
    let button = Button::detached();
    let normal_color = button.normal_color;

    let border = border::create(gui);
    if let Some(w) = gui.widget_mut(border) {
        w.color = normal_color;
        w.border_mut().stroke_color = Color::rgb(80, 80, 80);
    }

    let text = text::create(gui);
    if let Some(w) = gui.widget_mut(text) {
        w.hit_test_visible = false;
        w.color = Color::rgb(220, 220, 220);
        let payload = w.text_mut();
        payload.horizontal_alignment = HorizontalAlignment::Center;
        payload.vertical_alignment = VerticalAlignment::Center;
    }

    let id = gui.insert_widget(Widget::new(WidgetKind::Button(Button {
        border,
        text,
        ..button
    })));
    gui.attach(border, id);
    gui.attach(text, id);
    id
}

pub(crate) fn deinit(widget: &mut Widget) {
    widget.button_mut().click = None;
}

/// The button draws nothing itself; its border and text children do.
pub(crate) fn render(_: WidgetId, _: &mut Widget, _: &mut DrawList) {}

fn set_border_color(gui: &mut Gui, border: WidgetId, color: Color) {
    if let Some(w) = gui.widget_mut(border) {
        w.color = color;
    }
}

pub(crate) fn on_routed_event(gui: &mut Gui, id: WidgetId, args: &mut RoutedEventArgs) {
    let Some(widget) = gui.widget_mut(id) else {
        return;
    };
    let is_mouse_over = widget.is_mouse_over;
    let button = widget.button_mut();
    let border = button.border;
    match args.event {
        RoutedEvent::MouseDown { .. } => {
            button.was_pressed = true;
            let color = button.pressed_color;
            set_border_color(gui, border, color);
            args.handled = true;
        }
        RoutedEvent::MouseUp { .. } => {
            let color = if is_mouse_over {
                button.hover_color
            } else {
                button.normal_color
            };
            let click = if button.was_pressed {
                button.click.clone()
            } else {
                None
            };
            button.was_pressed = false;
            set_border_color(gui, border, color);
            args.handled = true;
            if let Some(click) = click {
                tracing::debug!("Button {:?} clicked", id);
                click(gui, id);
            }
        }
        RoutedEvent::MouseEnter => {
            let color = button.hover_color;
            set_border_color(gui, border, color);
            args.handled = true;
        }
        RoutedEvent::MouseLeave => {
            button.was_pressed = false;
            let color = button.normal_color;
            set_border_color(gui, border, color);
            args.handled = true;
        }
        _ => {}
    }
}

/// Border and text are stored as indices into the children list, which has
/// already been rebuilt when this runs on read.
pub(crate) fn visit(widget: &mut Widget, visitor: &mut Visitor) -> bool {
    let children = widget.children.clone();
    let button = widget.button_mut();
    let mut ok = button.normal_color.visit("NormalColor", visitor);
    ok &= button.hover_color.visit("HoverColor", visitor);
    ok &= button.pressed_color.visit("PressedColor", visitor);

    let index_of = |target: WidgetId| {
        children
            .iter()
            .position(|&c| c == target)
            .map_or(u32::MAX, |i| i as u32)
    };
    let mut border_index = index_of(button.border);
    let mut text_index = index_of(button.text);
    ok &= border_index.visit("BorderIndex", visitor);
    ok &= text_index.visit("TextIndex", visitor);
    if visitor.is_reading() {
        match (
            children.get(border_index as usize),
            children.get(text_index as usize),
        ) {
            (Some(&border), Some(&text)) => {
                button.border = border;
                button.text = text;
            }
            _ => {
                tracing::warn!("Button children out of range on read");
                ok = false;
            }
        }
    }
    ok
}

pub(crate) const PROPERTIES: &[PropertyEntry] = &[
    property!(
        "NormalColor",
        Color,
        |w| w.button().normal_color,
        w.button_mut().normal_color
    ),
    property!(
        "HoverColor",
        Color,
        |w| w.button().hover_color,
        w.button_mut().hover_color
    ),
    property!(
        "PressedColor",
        Color,
        |w| w.button().pressed_color,
        w.button_mut().pressed_color
    ),
];
