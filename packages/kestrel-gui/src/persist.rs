//! Save/load of the widget tree.
//!
//! Geometry inputs, colors, flags and kind payloads are stored. Layout
//! outputs, hover/focus state, fonts and callbacks are not: text widgets get
//! the GUI's default font on load, and click and event handlers have to be
//! attached again.

use crate::gui::Gui;
use crate::widget::{Widget, WidgetId, WidgetKind, WidgetKindTag};
use crate::widgets::{Border, Button, Text, TextBox};
use kestrel_base::{Visit, Visitor, visit_as_u32};

impl Gui {
    fn empty_kind(&self, tag: WidgetKindTag) -> WidgetKind {
        match tag {
            WidgetKindTag::Border => WidgetKind::Border(Border::default()),
            WidgetKindTag::Text => WidgetKind::Text(Text::new(self.default_font())),
            WidgetKindTag::Button => WidgetKind::Button(Button::detached()),
            WidgetKindTag::TextBox => WidgetKind::TextBox(TextBox::new(self.default_font())),
        }
    }

    fn visit_common(widget: &mut Widget, visitor: &mut Visitor) -> bool {
        let mut ok = widget.name.visit("Name", visitor);
        ok &= widget.desired_position.visit("DesiredPosition", visitor);
        ok &= widget.desired_size.visit("DesiredSize", visitor);
        ok &= widget.color.visit("Color", visitor);
        ok &= widget.visible.visit("Visible", visitor);
        ok &= widget.hit_test_visible.visit("HitTestVisible", visitor);
        ok
    }

    fn write_widget(&mut self, id: WidgetId, name: &str, visitor: &mut Visitor) -> bool {
        if !visitor.enter_node(name) {
            return false;
        }
        let widget = &mut self.widgets[id];
        let mut tag = widget.tag();
        let mut ok = visit_as_u32(visitor, "Kind", &mut tag, WidgetKindTag::to_u32, WidgetKindTag::from_u32);
        ok &= Self::visit_common(widget, visitor);

        let children = widget.children.clone();
        if visitor.enter_node("Children") {
            let mut count = children.len() as u32;
            ok &= count.visit("Count", visitor);
            for (i, child) in children.into_iter().enumerate() {
                ok &= self.write_widget(child, &format!("Item{}", i), visitor);
            }
            visitor.leave_node();
        }

        ok &= (tag.dispatch().visit)(&mut self.widgets[id], visitor);
        visitor.leave_node();
        ok
    }

    fn read_widget(&mut self, name: &str, parent: Option<WidgetId>, visitor: &mut Visitor) -> bool {
        if !visitor.enter_node(name) {
            return false;
        }
        let mut tag = WidgetKindTag::Border;
        if !visit_as_u32(visitor, "Kind", &mut tag, WidgetKindTag::to_u32, WidgetKindTag::from_u32) {
            tracing::warn!("Skipping widget `{}` without a readable kind", name);
            visitor.leave_node();
            return false;
        }
        let id = self.insert_widget(Widget::new(self.empty_kind(tag)));
        if let Some(parent) = parent {
            self.attach(id, parent);
        }
        let mut ok = Self::visit_common(&mut self.widgets[id], visitor);

        if visitor.enter_node("Children") {
            let mut count = 0u32;
            ok &= count.visit("Count", visitor);
            for i in 0..count {
                ok &= self.read_widget(&format!("Item{}", i), Some(id), visitor);
            }
            visitor.leave_node();
        } else {
            ok = false;
        }

        ok &= (tag.dispatch().visit)(&mut self.widgets[id], visitor);
        visitor.leave_node();
        ok
    }
}

impl Visit for Gui {
    /// Reading destroys every existing widget first.
    fn visit(&mut self, name: &str, visitor: &mut Visitor) -> bool {
        if !visitor.enter_node(name) {
            return false;
        }
        let mut ok = true;
        if visitor.enter_node("Widgets") {
            if visitor.is_reading() {
                self.clear();
                let mut count = 0u32;
                ok &= count.visit("Count", visitor);
                for i in 0..count {
                    ok &= self.read_widget(&format!("Item{}", i), None, visitor);
                }
            } else {
                let roots = self.roots.clone();
                let mut count = roots.len() as u32;
                ok &= count.visit("Count", visitor);
                for (i, root) in roots.into_iter().enumerate() {
                    ok &= self.write_widget(root, &format!("Item{}", i), visitor);
                }
            }
            visitor.leave_node();
        } else {
            ok = false;
        }
        visitor.leave_node();
        tracing::debug!("Visited gui ({} widgets, ok = {})", self.len(), ok);
        ok
    }
}
