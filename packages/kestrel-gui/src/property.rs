use crate::widget::Widget;
use glam::Vec2;
use kestrel_base::Color;

/// Value carried through the reflective property interface.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    U32(u32),
    F32(f32),
    Vec2(Vec2),
    Color(Color),
    String(String),
}

/// One named accessor pair of a widget kind's property registry.
///
/// `set` returns `false` when handed a value of the wrong variant.
pub struct PropertyEntry {
    pub name: &'static str,
    pub get: fn(&Widget) -> PropertyValue,
    pub set: fn(&mut Widget, PropertyValue) -> bool,
}

/// Builds a [`PropertyEntry`] over a widget field. Kind payload fields need
/// separate shared and mutable paths.
macro_rules! property {
    ($name:literal, $variant:ident, |$w:ident| $place:expr) => {
        property!($name, $variant, |$w| $place, $place)
    };
    ($name:literal, $variant:ident, |$w:ident| $get:expr, $set:expr) => {
        $crate::property::PropertyEntry {
            name: $name,
            get: |$w| $crate::property::PropertyValue::$variant(($get).clone()),
            set: |$w, value| match value {
                $crate::property::PropertyValue::$variant(v) => {
                    $set = v;
                    true
                }
                _ => false,
            },
        }
    };
}

pub(crate) use property;

/// Properties every widget has, looked up after the kind registry.
pub static COMMON_PROPERTIES: &[PropertyEntry] = &[
    property!("Color", Color, |w| w.color),
    property!("DesiredPosition", Vec2, |w| w.desired_position),
    property!("DesiredSize", Vec2, |w| w.desired_size),
    property!("Visible", Bool, |w| w.visible),
    property!("HitTestVisible", Bool, |w| w.hit_test_visible),
    property!("Name", String, |w| w.name),
];

pub(crate) fn find(widget: &Widget, name: &str) -> Option<&'static PropertyEntry> {
    let kind_registry = widget.tag().dispatch().properties;
    kind_registry
        .iter()
        .chain(COMMON_PROPERTIES.iter())
        .find(|entry| entry.name == name)
}
