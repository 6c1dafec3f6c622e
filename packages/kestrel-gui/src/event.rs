use crate::gui::Gui;
use crate::input::{Key, MouseButton};
use crate::widget::WidgetId;
use glam::Vec2;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutedEventKind {
    MouseDown,
    MouseUp,
    MouseEnter,
    MouseLeave,
    KeyDown,
    Text,
    GotFocus,
    LostFocus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoutedEvent {
    MouseDown { pos: Vec2, button: MouseButton },
    MouseUp { pos: Vec2, button: MouseButton },
    MouseEnter,
    MouseLeave,
    KeyDown { key: Key },
    Text { code: char },
    GotFocus,
    LostFocus,
}

impl RoutedEvent {
    pub fn kind(&self) -> RoutedEventKind {
        match self {
            RoutedEvent::MouseDown { .. } => RoutedEventKind::MouseDown,
            RoutedEvent::MouseUp { .. } => RoutedEventKind::MouseUp,
            RoutedEvent::MouseEnter => RoutedEventKind::MouseEnter,
            RoutedEvent::MouseLeave => RoutedEventKind::MouseLeave,
            RoutedEvent::KeyDown { .. } => RoutedEventKind::KeyDown,
            RoutedEvent::Text { .. } => RoutedEventKind::Text,
            RoutedEvent::GotFocus => RoutedEventKind::GotFocus,
            RoutedEvent::LostFocus => RoutedEventKind::LostFocus,
        }
    }
}

/// Arguments handed to every widget on an event's route.
///
/// `source` is the widget the route started at. Setting `handled` stops a
/// bubbling event before it reaches the next ancestor.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEventArgs {
    pub source: WidgetId,
    pub event: RoutedEvent,
    pub handled: bool,
}

impl RoutedEventArgs {
    pub fn new(source: WidgetId, event: RoutedEvent) -> Self {
        Self {
            source,
            event,
            handled: false,
        }
    }

    pub fn kind(&self) -> RoutedEventKind {
        self.event.kind()
    }
}

/// User callback attached to a widget for one event kind. Receives the
/// widget it is attached to, which differs from `args.source` while
/// bubbling.
pub type RoutedEventHandler = Arc<dyn Fn(&mut Gui, WidgetId, &mut RoutedEventArgs) + Send + Sync>;
