use crate::draw::DrawList;
use crate::font::Font;
use crate::gui::Gui;
use crate::property::{PropertyEntry, property};
use crate::widget::{HorizontalAlignment, VerticalAlignment, Widget, WidgetId, WidgetKind};
use glam::Vec2;
use kestrel_base::{Visit, Visitor, visit_as_u32};
use std::sync::Arc;

/// Single-run label.
#[derive(Debug, Clone, Default)]
pub struct Text {
    text: String,
    font: Option<Arc<Font>>,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
}

impl Text {
    pub fn new(font: Option<Arc<Font>>) -> Self {
        Self {
            font,
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn font(&self) -> Option<&Arc<Font>> {
        self.font.as_ref()
    }

    pub fn set_font(&mut self, font: Option<Arc<Font>>) {
        self.font = font;
    }
}

pub(crate) fn create(gui: &mut Gui) -> WidgetId {
    let font = gui.default_font();
    gui.insert_widget(Widget::new(WidgetKind::Text(Text::new(font))))
}

pub(crate) fn render(id: WidgetId, widget: &mut Widget, draw_list: &mut DrawList) {
    let text = widget.kind.text();
    let Some(font) = text.font.as_ref() else {
        return;
    };
    let chars: Vec<char> = text.text.chars().collect();
    let width = font.text_width(chars.iter().copied());
    let pos = widget.screen_position;
    let size = widget.actual_size;
    let origin = Vec2::new(
        text.horizontal_alignment.place(pos.x, size.x, width),
        text.vertical_alignment.place(pos.y, size.y, font.ascender()),
    );
    draw_list.push_text(origin, &chars, widget.color);
    draw_list.commit(font.texture_id(), id);
}

pub(crate) fn visit(widget: &mut Widget, visitor: &mut Visitor) -> bool {
    let text = widget.text_mut();
    let mut ok = text.text.visit("Text", visitor);
    ok &= visit_as_u32(
        visitor,
        "HorizontalAlignment",
        &mut text.horizontal_alignment,
        HorizontalAlignment::to_u32,
        HorizontalAlignment::from_u32,
    );
    ok &= visit_as_u32(
        visitor,
        "VerticalAlignment",
        &mut text.vertical_alignment,
        VerticalAlignment::to_u32,
        VerticalAlignment::from_u32,
    );
    ok
}

pub(crate) const PROPERTIES: &[PropertyEntry] = &[property!(
    "Text",
    String,
    |w| w.text().text,
    w.text_mut().text
)];
