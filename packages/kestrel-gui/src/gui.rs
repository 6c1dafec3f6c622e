use crate::draw::{DrawCommand, DrawList};
use crate::event::{RoutedEvent, RoutedEventArgs, RoutedEventHandler, RoutedEventKind};
use crate::font::Font;
use crate::input::InputEvent;
use crate::property::{self, PropertyValue};
use crate::widget::{Widget, WidgetId, WidgetKindTag};
use crate::widgets::{ClickHandler, border, button, text, text_box};
use glam::Vec2;
use slotmap::SlotMap;
use smallvec::SmallVec;
use std::sync::Arc;

/// Owner of the widget tree.
///
/// The arena owns every widget; `children` lists hold owning handles and
/// `parent` a back-reference. Besides the tree, the only shared state is the
/// currently hovered leaf and the currently focused widget.
pub struct Gui {
    pub(crate) widgets: SlotMap<WidgetId, Widget>,
    pub(crate) roots: SmallVec<[WidgetId; 8]>,
    draw_list: DrawList,
    default_font: Option<Arc<Font>>,
    screen_size: Vec2,
    hovered: Option<WidgetId>,
    focused: Option<WidgetId>,
}

impl Default for Gui {
    fn default() -> Self {
        Self::new()
    }
}

impl Gui {
    pub fn new() -> Self {
        Self {
            widgets: SlotMap::with_key(),
            roots: SmallVec::new(),
            draw_list: DrawList::new(),
            default_font: None,
            screen_size: Vec2::ZERO,
            hovered: None,
            focused: None,
        }
    }

    pub fn default_font(&self) -> Option<Arc<Font>> {
        self.default_font.clone()
    }

    /// Font given to text widgets created from now on.
    pub fn set_default_font(&mut self, font: Option<Arc<Font>>) {
        self.default_font = font;
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    pub fn set_screen_size(&mut self, size: Vec2) {
        self.screen_size = size;
    }

    pub(crate) fn insert_widget(&mut self, widget: Widget) -> WidgetId {
        let id = self.widgets.insert(widget);
        self.roots.push(id);
        id
    }

    /// Creates a top-level widget of the given kind with its defaults.
    pub fn create_node(&mut self, kind: WidgetKindTag) -> WidgetId {
        let id = match kind {
            WidgetKindTag::Border => border::create(self),
            WidgetKindTag::Text => text::create(self),
            WidgetKindTag::Button => button::create(self),
            WidgetKindTag::TextBox => text_box::create(self),
        };
        tracing::debug!("Created {:?} widget {:?}", kind, id);
        id
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id)
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(id)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn roots(&self) -> &[WidgetId] {
        &self.roots
    }

    pub fn find_by_name(&self, name: &str) -> Option<WidgetId> {
        self.widgets
            .iter()
            .find(|(_, w)| w.name == name)
            .map(|(id, _)| id)
    }

    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    fn is_ancestor_or_self(&self, ancestor: WidgetId, mut id: WidgetId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.widgets.get(id).and_then(|w| w.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn unlink(&mut self, id: WidgetId) {
        match self.widgets[id].parent.take() {
            Some(parent) => {
                if let Some(p) = self.widgets.get_mut(parent) {
                    p.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    /// Appends `child` to the children of `parent`, detaching it from its
    /// previous parent first. Returns `false` for stale handles or when the
    /// move would create a cycle.
    pub fn attach(&mut self, child: WidgetId, parent: WidgetId) -> bool {
        if !self.contains(child) || !self.contains(parent) {
            return false;
        }
        if self.is_ancestor_or_self(child, parent) {
            tracing::warn!("Refusing to attach widget {:?} under its own descendant {:?}", child, parent);
            return false;
        }
        self.unlink(child);
        self.widgets[child].parent = Some(parent);
        self.widgets[parent].children.push(child);
        true
    }

    /// Moves `id` to the top level.
    pub fn detach(&mut self, id: WidgetId) {
        if self.contains(id) && self.widgets[id].parent.is_some() {
            self.unlink(id);
            self.roots.push(id);
        }
    }

    /// Destroys `id` and its subtree: each widget is deinitialized before its
    /// children. Returns the number of widgets removed.
    ///
    /// If the hovered leaf was inside the subtree, hover falls back to the
    /// surviving parent so the next pointer move still sends `MouseLeave` to
    /// the ancestors that remain.
    pub fn remove_node(&mut self, id: WidgetId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        let parent = self.widgets[id].parent;
        self.unlink(id);
        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(mut widget) = self.widgets.remove(next) else {
                continue;
            };
            (widget.tag().dispatch().deinit)(&mut widget);
            if self.hovered == Some(next) {
                self.hovered = parent;
            }
            if self.focused == Some(next) {
                self.focused = None;
            }
            stack.extend(widget.children.iter().rev().copied());
            removed += 1;
        }
        tracing::debug!("Removed {} widgets", removed);
        removed
    }

    /// Destroys every widget.
    pub fn clear(&mut self) {
        let roots = self.roots.clone();
        for root in roots {
            self.remove_node(root);
        }
        self.draw_list.clear();
        self.hovered = None;
        self.focused = None;
    }

    /// Attaches a user handler that runs after the kind's own handling of
    /// `kind` events on `id`.
    pub fn add_handler(&mut self, id: WidgetId, kind: RoutedEventKind, handler: RoutedEventHandler) -> bool {
        match self.widgets.get_mut(id) {
            Some(widget) => {
                widget.handlers.push((kind, handler));
                true
            }
            None => false,
        }
    }

    /// Sets the click callback of a button. Panics if `id` is not a button.
    pub fn set_click(&mut self, id: WidgetId, click: ClickHandler) {
        if let Some(widget) = self.widgets.get_mut(id) {
            widget.button_mut().click = Some(click);
        }
    }

    /// Replaces the caption of a button. Returns `false` when `id` is not a
    /// button.
    pub fn set_button_text(&mut self, id: WidgetId, text: &str) -> bool {
        let Some(label) = self.button_text_id(id) else {
            return false;
        };
        match self.widgets.get_mut(label).and_then(|w| w.kind.as_text_mut()) {
            Some(label) => {
                label.set_text(text);
                true
            }
            None => false,
        }
    }

    pub fn button_text(&self, id: WidgetId) -> Option<&str> {
        let label = self.button_text_id(id)?;
        self.widgets
            .get(label)
            .and_then(|w| w.kind.as_text())
            .map(|t| t.text())
    }

    fn button_text_id(&self, id: WidgetId) -> Option<WidgetId> {
        self.widgets
            .get(id)
            .and_then(|w| w.kind.as_button())
            .map(|b| b.text())
    }

    pub fn set_property(&mut self, id: WidgetId, name: &str, value: PropertyValue) -> bool {
        let Some(widget) = self.widgets.get_mut(id) else {
            return false;
        };
        match property::find(widget, name) {
            Some(entry) => (entry.set)(widget, value),
            None => {
                tracing::debug!("Unknown property `{}` on {:?}", name, widget.tag());
                false
            }
        }
    }

    pub fn get_property(&self, id: WidgetId, name: &str) -> Option<PropertyValue> {
        let widget = self.widgets.get(id)?;
        property::find(widget, name).map(|entry| (entry.get)(widget))
    }

    fn hit_test_widget(&self, id: WidgetId, point: Vec2) -> Option<WidgetId> {
        let widget = self.widgets.get(id)?;
        if !widget.visible || !widget.hit_test_visible {
            return None;
        }
        widget
            .children
            .iter()
            .rev()
            .find_map(|&child| self.hit_test_widget(child, point))
            .or_else(|| widget.contains_point(point).then_some(id))
    }

    /// Topmost hit-testable widget under `point`, front-most child first.
    pub fn hit_test(&self, point: Vec2) -> Option<WidgetId> {
        self.roots
            .iter()
            .rev()
            .find_map(|&root| self.hit_test_widget(root, point))
    }

    /// `id` and its ancestors, leaf first.
    fn route(&self, id: Option<WidgetId>) -> SmallVec<[WidgetId; 8]> {
        let mut path = SmallVec::new();
        let mut current = id;
        while let Some(next) = current {
            let Some(widget) = self.widgets.get(next) else {
                break;
            };
            path.push(next);
            current = widget.parent;
        }
        path
    }

    /// Runs the kind handler and then the user handlers of `target`.
    fn deliver(&mut self, target: WidgetId, args: &mut RoutedEventArgs) {
        let Some(widget) = self.widgets.get(target) else {
            return;
        };
        let tag = widget.tag();
        let kind = args.kind();
        let handlers: SmallVec<[RoutedEventHandler; 2]> = widget
            .handlers
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, h)| h.clone())
            .collect();
        (tag.dispatch().on_routed_event)(self, target, args);
        for handler in handlers {
            handler(self, target, args);
        }
    }

    /// Offers the event to `source` and then each ancestor until one of them
    /// marks it handled. Returns whether it was handled.
    pub fn bubble(&mut self, source: WidgetId, event: RoutedEvent) -> bool {
        let mut args = RoutedEventArgs::new(source, event);
        let mut current = Some(source);
        while let Some(id) = current {
            self.deliver(id, &mut args);
            if args.handled {
                break;
            }
            current = self.widgets.get(id).and_then(|w| w.parent);
        }
        args.handled
    }

    /// Moves keyboard focus. The previous holder always gets `LostFocus` and
    /// the new one `GotFocus`, even when focus does not actually change.
    pub fn set_focus(&mut self, target: Option<WidgetId>) {
        let target = target.filter(|&id| self.contains(id));
        if let Some(previous) = self.focused {
            let mut args = RoutedEventArgs::new(previous, RoutedEvent::LostFocus);
            self.deliver(previous, &mut args);
        }
        self.focused = target;
        if let Some(next) = target {
            let mut args = RoutedEventArgs::new(next, RoutedEvent::GotFocus);
            self.deliver(next, &mut args);
        }
    }

    /// Diffs the hovered path against the one under `point`, sending
    /// `MouseLeave` to widgets no longer under the pointer and `MouseEnter`
    /// to newly covered ones, leaf first in both cases.
    fn update_hover(&mut self, point: Vec2) {
        let hit = self.hit_test(point);
        if hit == self.hovered {
            return;
        }
        let old_path = self.route(self.hovered);
        let new_path = self.route(hit);
        self.hovered = hit;

        for &id in old_path.iter().filter(|id| !new_path.contains(*id)) {
            if let Some(widget) = self.widgets.get_mut(id) {
                widget.is_mouse_over = false;
            }
            let source = old_path[0];
            let mut args = RoutedEventArgs::new(source, RoutedEvent::MouseLeave);
            self.deliver(id, &mut args);
        }
        for &id in new_path.iter().filter(|id| !old_path.contains(*id)) {
            if let Some(widget) = self.widgets.get_mut(id) {
                widget.is_mouse_over = true;
            }
            let source = new_path[0];
            let mut args = RoutedEventArgs::new(source, RoutedEvent::MouseEnter);
            self.deliver(id, &mut args);
        }
    }

    /// Routes one raw input event through the tree.
    pub fn process_input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::MouseMove { pos } => self.update_hover(pos),
            InputEvent::MouseDown { pos, button } => {
                self.update_hover(pos);
                let hit = self.hit_test(pos);
                self.set_focus(hit);
                if let Some(leaf) = hit {
                    self.bubble(leaf, RoutedEvent::MouseDown { pos, button });
                }
            }
            InputEvent::MouseUp { pos, button } => {
                self.update_hover(pos);
                if let Some(leaf) = self.hit_test(pos) {
                    self.bubble(leaf, RoutedEvent::MouseUp { pos, button });
                }
            }
            InputEvent::KeyDown { key } => {
                if let Some(focused) = self.focused {
                    let mut args = RoutedEventArgs::new(focused, RoutedEvent::KeyDown { key });
                    self.deliver(focused, &mut args);
                }
            }
            InputEvent::Text(code) => {
                if let Some(focused) = self.focused {
                    let mut args = RoutedEventArgs::new(focused, RoutedEvent::Text { code });
                    self.deliver(focused, &mut args);
                }
            }
            InputEvent::KeyUp { .. } => {}
        }
    }

    /// Runs every widget's per-frame update.
    pub fn update(&mut self) {
        for widget in self.widgets.values_mut() {
            (widget.tag().dispatch().update)(widget);
        }
    }

    /// Recomputes `screen_position` and `actual_size` top-down.
    pub fn layout(&mut self) {
        let mut stack: Vec<(WidgetId, Vec2, Vec2)> = self
            .roots
            .iter()
            .rev()
            .map(|&r| (r, Vec2::ZERO, self.screen_size))
            .collect();
        while let Some((id, parent_position, parent_size)) = stack.pop() {
            let Some(widget) = self.widgets.get_mut(id) else {
                continue;
            };
            let remaining = (parent_size - widget.desired_position).max(Vec2::ZERO);
            widget.screen_position = parent_position + widget.desired_position;
            widget.actual_size = Vec2::new(
                if widget.desired_size.x > 0.0 {
                    widget.desired_size.x
                } else {
                    remaining.x
                },
                if widget.desired_size.y > 0.0 {
                    widget.desired_size.y
                } else {
                    remaining.y
                },
            );
            let (position, size) = (widget.screen_position, widget.actual_size);
            stack.extend(widget.children.iter().rev().map(|&c| (c, position, size)));
        }
    }

    /// Emits draw commands for every visible widget, parents before children.
    pub fn render(&mut self) {
        let mut stack: Vec<WidgetId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(widget) = self.widgets.get_mut(id) else {
                continue;
            };
            if !widget.visible {
                continue;
            }
            (widget.tag().dispatch().render)(id, widget, &mut self.draw_list);
            stack.extend(widget.children.iter().rev().copied());
        }
    }

    /// Update, layout and render in frame order.
    pub fn frame(&mut self) {
        self.update();
        self.layout();
        self.render();
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Hands this frame's commands to the renderer.
    pub fn drain_draw_commands(&mut self) -> Vec<DrawCommand> {
        self.draw_list.drain()
    }
}
