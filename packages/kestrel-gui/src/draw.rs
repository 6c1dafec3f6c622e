use crate::widget::WidgetId;
use glam::Vec2;
use kestrel_base::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    RectFilled {
        position: Vec2,
        size: Vec2,
        color: Color,
    },
    /// A run of glyphs laid out left to right from `position`.
    Text {
        position: Vec2,
        text: String,
        color: Color,
    },
}

/// A batch of primitives sharing one texture, scoped to the widget that
/// emitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub texture: u32,
    pub widget: WidgetId,
    pub primitives: Vec<Primitive>,
}

/// Per-frame command buffer shared by every widget's render callback.
///
/// Primitives accumulate until [`DrawList::commit`] closes them into a
/// command. The renderer takes the commands with
/// [`crate::Gui::drain_draw_commands`]; nothing is retained across frames.
#[derive(Debug, Default)]
pub struct DrawList {
    pending: Vec<Primitive>,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_rect_filled(&mut self, position: Vec2, size: Vec2, color: Color) {
        self.pending.push(Primitive::RectFilled {
            position,
            size,
            color,
        });
    }

    /// Outline of thickness `thickness` drawn inside the rectangle.
    pub fn push_rect_stroke(&mut self, position: Vec2, size: Vec2, thickness: f32, color: Color) {
        let t = thickness.min(size.x * 0.5).min(size.y * 0.5).max(0.0);
        if t <= 0.0 {
            return;
        }
        self.push_rect_filled(position, Vec2::new(size.x, t), color);
        self.push_rect_filled(
            Vec2::new(position.x, position.y + size.y - t),
            Vec2::new(size.x, t),
            color,
        );
        self.push_rect_filled(
            Vec2::new(position.x, position.y + t),
            Vec2::new(t, size.y - 2.0 * t),
            color,
        );
        self.push_rect_filled(
            Vec2::new(position.x + size.x - t, position.y + t),
            Vec2::new(t, size.y - 2.0 * t),
            color,
        );
    }

    pub fn push_text(&mut self, position: Vec2, text: &[char], color: Color) {
        if text.is_empty() {
            return;
        }
        self.pending.push(Primitive::Text {
            position,
            text: text.iter().collect(),
            color,
        });
    }

    /// Closes the pending primitives into one command. Does nothing when no
    /// primitive was pushed since the last commit.
    pub fn commit(&mut self, texture: u32, widget: WidgetId) {
        if self.pending.is_empty() {
            return;
        }
        let primitives = std::mem::take(&mut self.pending);
        self.commands.push(DrawCommand {
            texture,
            widget,
            primitives,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.commands.clear();
    }

    pub fn drain(&mut self) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        std::mem::swap(&mut self.commands, &mut commands);
        commands
    }
}
