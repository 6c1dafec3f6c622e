pub mod draw;
pub mod event;
pub mod font;
pub mod gui;
pub mod input;
pub mod layout;
pub mod persist;
pub mod property;
pub mod widget;
pub mod widgets;

pub use draw::{DrawCommand, DrawList, Primitive};
pub use event::{RoutedEvent, RoutedEventArgs, RoutedEventHandler, RoutedEventKind};
pub use font::{Font, Glyph};
pub use gui::Gui;
pub use input::{InputEvent, Key, MouseButton};
pub use layout::{TextLine, break_on_lines};
pub use property::{PropertyEntry, PropertyValue};
pub use widget::{
    HorizontalAlignment, VerticalAlignment, WIDGET_DISPATCH, Widget, WidgetDispatchTable, WidgetId,
    WidgetKind, WidgetKindTag,
};
pub use widgets::{Border, Button, ClickHandler, Text, TextBox};
