use crate::draw::DrawList;
use crate::event::{RoutedEventArgs, RoutedEventHandler, RoutedEventKind};
use crate::gui::Gui;
use crate::property::PropertyEntry;
use crate::widgets::{border, button, text, text_box};
use crate::widgets::{Border, Button, Text, TextBox};
use glam::Vec2;
use kestrel_base::{Color, Visitor};
use slotmap::new_key_type;
use smallvec::SmallVec;

new_key_type! {
    pub struct WidgetId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKindTag {
    Border = 0,
    Text = 1,
    Button = 2,
    TextBox = 3,
}

impl WidgetKindTag {
    pub const COUNT: usize = 4;

    pub fn to_u32(self) -> u32 {
        self as u32
    }

    pub fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(WidgetKindTag::Border),
            1 => Some(WidgetKindTag::Text),
            2 => Some(WidgetKindTag::Button),
            3 => Some(WidgetKindTag::TextBox),
            _ => None,
        }
    }

    pub fn dispatch(self) -> &'static WidgetDispatchTable {
        &WIDGET_DISPATCH[self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    /// Laid out as `Left`.
    Stretch,
}

impl HorizontalAlignment {
    pub fn to_u32(self) -> u32 {
        self as u32
    }

    pub fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(HorizontalAlignment::Left),
            1 => Some(HorizontalAlignment::Center),
            2 => Some(HorizontalAlignment::Right),
            3 => Some(HorizontalAlignment::Stretch),
            _ => None,
        }
    }

    /// X of a run `width` wide inside `[x, x + extent)`.
    pub fn place(self, x: f32, extent: f32, width: f32) -> f32 {
        match self {
            HorizontalAlignment::Left | HorizontalAlignment::Stretch => x,
            HorizontalAlignment::Center => x + extent * 0.5 - width * 0.5,
            HorizontalAlignment::Right => x + extent - width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
    /// Laid out as `Top`.
    Stretch,
}

impl VerticalAlignment {
    pub fn to_u32(self) -> u32 {
        self as u32
    }

    pub fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(VerticalAlignment::Top),
            1 => Some(VerticalAlignment::Center),
            2 => Some(VerticalAlignment::Bottom),
            3 => Some(VerticalAlignment::Stretch),
            _ => None,
        }
    }

    pub fn place(self, y: f32, extent: f32, height: f32) -> f32 {
        match self {
            VerticalAlignment::Top | VerticalAlignment::Stretch => y,
            VerticalAlignment::Center => y + extent * 0.5 - height * 0.5,
            VerticalAlignment::Bottom => y + extent - height,
        }
    }
}

/// Kind-specific payload of a widget.
pub enum WidgetKind {
    Border(Border),
    Text(Text),
    Button(Button),
    TextBox(TextBox),
}

macro_rules! kind_accessors {
    ($($variant:ident, $get:ident, $get_mut:ident, $as:ident, $as_mut:ident;)*) => {$(
        pub fn $as(&self) -> Option<&$variant> {
            match self {
                WidgetKind::$variant(payload) => Some(payload),
                _ => None,
            }
        }

        pub fn $as_mut(&mut self) -> Option<&mut $variant> {
            match self {
                WidgetKind::$variant(payload) => Some(payload),
                _ => None,
            }
        }

        /// Panics if the widget is of another kind.
        pub fn $get(&self) -> &$variant {
            match self {
                WidgetKind::$variant(payload) => payload,
                other => panic!(
                    "widget kind mismatch: expected {}, found {:?}",
                    stringify!($variant),
                    other.tag()
                ),
            }
        }

        /// Panics if the widget is of another kind.
        pub fn $get_mut(&mut self) -> &mut $variant {
            let tag = self.tag();
            match self {
                WidgetKind::$variant(payload) => payload,
                _ => panic!(
                    "widget kind mismatch: expected {}, found {:?}",
                    stringify!($variant),
                    tag
                ),
            }
        }
    )*};
}

impl WidgetKind {
    pub fn tag(&self) -> WidgetKindTag {
        match self {
            WidgetKind::Border(_) => WidgetKindTag::Border,
            WidgetKind::Text(_) => WidgetKindTag::Text,
            WidgetKind::Button(_) => WidgetKindTag::Button,
            WidgetKind::TextBox(_) => WidgetKindTag::TextBox,
        }
    }

    kind_accessors! {
        Border, border, border_mut, as_border, as_border_mut;
        Text, text, text_mut, as_text, as_text_mut;
        Button, button, button_mut, as_button, as_button_mut;
        TextBox, text_box, text_box_mut, as_text_box, as_text_box_mut;
    }
}

/// Per-kind behavior of widgets.
pub struct WidgetDispatchTable {
    /// Releases kind resources before the widget leaves the arena.
    pub deinit: fn(&mut Widget),
    /// Once per frame, before layout.
    pub update: fn(&mut Widget),
    /// Emits the widget's own primitives; children render after it.
    pub render: fn(WidgetId, &mut Widget, &mut DrawList),
    pub on_routed_event: fn(&mut Gui, WidgetId, &mut RoutedEventArgs),
    /// Visits the payload. Runs after the widget's children were visited so
    /// payloads can refer to children by index.
    pub visit: fn(&mut Widget, &mut Visitor) -> bool,
    pub properties: &'static [PropertyEntry],
}

fn no_deinit(_: &mut Widget) {}

fn no_update(_: &mut Widget) {}

fn no_event(_: &mut Gui, _: WidgetId, _: &mut RoutedEventArgs) {}

/// Indexed by `WidgetKindTag as usize`.
pub static WIDGET_DISPATCH: [WidgetDispatchTable; WidgetKindTag::COUNT] = [
    WidgetDispatchTable {
        deinit: no_deinit,
        update: no_update,
        render: border::render,
        on_routed_event: no_event,
        visit: border::visit,
        properties: border::PROPERTIES,
    },
    WidgetDispatchTable {
        deinit: no_deinit,
        update: no_update,
        render: text::render,
        on_routed_event: no_event,
        visit: text::visit,
        properties: text::PROPERTIES,
    },
    WidgetDispatchTable {
        deinit: button::deinit,
        update: no_update,
        render: button::render,
        on_routed_event: button::on_routed_event,
        visit: button::visit,
        properties: button::PROPERTIES,
    },
    WidgetDispatchTable {
        deinit: text_box::deinit,
        update: text_box::update,
        render: text_box::render,
        on_routed_event: text_box::on_routed_event,
        visit: text_box::visit,
        properties: text_box::PROPERTIES,
    },
];

/// A node of the widget tree.
///
/// `desired_position` and `desired_size` are layout inputs. `actual_size`
/// and `screen_position` are outputs of [`Gui::layout`] and only valid for
/// the frame they were computed in.
pub struct Widget {
    pub name: String,
    pub desired_position: Vec2,
    /// A zero component stretches to the remaining extent of the parent.
    pub desired_size: Vec2,
    pub color: Color,
    pub visible: bool,
    /// When `false`, hit testing skips this widget together with its whole
    /// subtree.
    pub hit_test_visible: bool,
    pub(crate) kind: WidgetKind,
    pub(crate) actual_size: Vec2,
    pub(crate) screen_position: Vec2,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: SmallVec<[WidgetId; 4]>,
    pub(crate) is_mouse_over: bool,
    pub(crate) handlers: SmallVec<[(RoutedEventKind, RoutedEventHandler); 2]>,
}

impl Widget {
    pub(crate) fn new(kind: WidgetKind) -> Self {
        Self {
            name: String::new(),
            desired_position: Vec2::ZERO,
            desired_size: Vec2::ZERO,
            color: Color::WHITE,
            visible: true,
            hit_test_visible: true,
            kind,
            actual_size: Vec2::ZERO,
            screen_position: Vec2::ZERO,
            parent: None,
            children: SmallVec::new(),
            is_mouse_over: false,
            handlers: SmallVec::new(),
        }
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut WidgetKind {
        &mut self.kind
    }

    pub fn tag(&self) -> WidgetKindTag {
        self.kind.tag()
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn actual_size(&self) -> Vec2 {
        self.actual_size
    }

    pub fn screen_position(&self) -> Vec2 {
        self.screen_position
    }

    pub fn is_mouse_over(&self) -> bool {
        self.is_mouse_over
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let min = self.screen_position;
        let max = min + self.actual_size;
        point.x >= min.x && point.y >= min.y && point.x < max.x && point.y < max.y
    }

    pub fn border(&self) -> &Border {
        self.kind.border()
    }

    pub fn border_mut(&mut self) -> &mut Border {
        self.kind.border_mut()
    }

    pub fn text(&self) -> &Text {
        self.kind.text()
    }

    pub fn text_mut(&mut self) -> &mut Text {
        self.kind.text_mut()
    }

    pub fn button(&self) -> &Button {
        self.kind.button()
    }

    pub fn button_mut(&mut self) -> &mut Button {
        self.kind.button_mut()
    }

    pub fn text_box(&self) -> &TextBox {
        self.kind.text_box()
    }

    pub fn text_box_mut(&mut self) -> &mut TextBox {
        self.kind.text_box_mut()
    }
}
