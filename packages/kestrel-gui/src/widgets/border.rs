use crate::draw::DrawList;
use crate::gui::Gui;
use crate::property::{PropertyEntry, property};
use crate::widget::{Widget, WidgetId, WidgetKind};
use kestrel_base::{Color, Visit, Visitor};

/// Filled rectangle with an inner stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub stroke_color: Color,
    pub stroke_thickness: f32,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            stroke_thickness: 1.0,
        }
    }
}

pub(crate) fn create(gui: &mut Gui) -> WidgetId {
    gui.insert_widget(Widget::new(WidgetKind::Border(Border::default())))
}

pub(crate) fn render(id: WidgetId, widget: &mut Widget, draw_list: &mut DrawList) {
    let border = widget.kind.border();
    draw_list.push_rect_filled(widget.screen_position, widget.actual_size, widget.color);
    draw_list.push_rect_stroke(
        widget.screen_position,
        widget.actual_size,
        border.stroke_thickness,
        border.stroke_color,
    );
    draw_list.commit(0, id);
}

pub(crate) fn visit(widget: &mut Widget, visitor: &mut Visitor) -> bool {
    let border = widget.border_mut();
    let mut ok = border.stroke_color.visit("StrokeColor", visitor);
    ok &= border.stroke_thickness.visit("StrokeThickness", visitor);
    ok
}

pub(crate) const PROPERTIES: &[PropertyEntry] = &[
    property!("StrokeColor", Color, |w| w.border().stroke_color, w.border_mut().stroke_color),
    property!(
        "StrokeThickness",
        F32,
        |w| w.border().stroke_thickness,
        w.border_mut().stroke_thickness
    ),
];
