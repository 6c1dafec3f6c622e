use crate::draw::DrawList;
use crate::event::{RoutedEvent, RoutedEventArgs};
use crate::font::Font;
use crate::gui::Gui;
use crate::input::Key;
use crate::layout::{TextLine, break_on_lines};
use crate::property::{PropertyEntry, PropertyValue, property};
use crate::widget::{HorizontalAlignment, VerticalAlignment, Widget, WidgetId, WidgetKind};
use glam::Vec2;
use kestrel_base::{Color, Visit, Visitor, visit_as_u32};
use std::sync::Arc;

pub const DEFAULT_BLINK_INTERVAL: u32 = 35;
pub const CARET_WIDTH: f32 = 2.0;
const BACKGROUND: Color = Color::rgb(120, 120, 120);

/// Editable multi-line text with a blinking caret.
///
/// The caret is a `(line, offset)` pair into `lines`. Insertion re-breaks
/// the lines immediately; backspace and delete leave them stale until the
/// next render re-breaks them.
#[derive(Debug, Clone)]
pub struct TextBox {
    chars: Vec<char>,
    lines: Vec<TextLine>,
    total_lines_height: f32,
    caret_line: usize,
    caret_offset: usize,
    caret_visible: bool,
    show_caret: bool,
    blink_timer: u32,
    pub blink_interval: u32,
    font: Option<Arc<Font>>,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
}

impl TextBox {
    pub fn new(font: Option<Arc<Font>>) -> Self {
        Self {
            chars: Vec::new(),
            lines: Vec::new(),
            total_lines_height: 0.0,
            caret_line: 0,
            caret_offset: 0,
            caret_visible: true,
            show_caret: false,
            blink_timer: 0,
            blink_interval: DEFAULT_BLINK_INTERVAL,
            font,
            horizontal_alignment: HorizontalAlignment::Left,
            vertical_alignment: VerticalAlignment::Top,
        }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Replaces the buffer and puts the caret at the start. Lines are rebuilt
    /// on the next render.
    pub fn set_text(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.lines.clear();
        self.total_lines_height = 0.0;
        self.caret_line = 0;
        self.caret_offset = 0;
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn total_lines_height(&self) -> f32 {
        self.total_lines_height
    }

    pub fn font(&self) -> Option<&Arc<Font>> {
        self.font.as_ref()
    }

    pub fn set_font(&mut self, font: Option<Arc<Font>>) {
        self.font = font;
        self.lines.clear();
    }

    /// `(line, offset)` of the caret.
    pub fn caret(&self) -> (usize, usize) {
        (self.caret_line, self.caret_offset)
    }

    pub fn is_caret_visible(&self) -> bool {
        self.caret_visible
    }

    /// Whether the caret is drawn at all; true while focused.
    pub fn shows_caret(&self) -> bool {
        self.show_caret
    }

    /// Re-breaks the buffer for a box `max_width` wide. Without a font the
    /// lines are left as they are.
    pub fn rebuild_lines(&mut self, max_width: f32) {
        let Some(font) = self.font.as_ref() else {
            return;
        };
        self.total_lines_height = break_on_lines(&self.chars, font, max_width, &mut self.lines);
        if self.caret_line >= self.lines.len() {
            self.caret_line = self.lines.len().saturating_sub(1);
        }
    }

    /// Buffer index under the caret, always within `[0, chars.len()]`.
    pub fn caret_to_index(&self) -> usize {
        let Some(line) = self
            .lines
            .get(self.caret_line)
            .or_else(|| self.lines.last())
        else {
            return 0;
        };
        (line.begin + self.caret_offset).min(self.chars.len())
    }

    pub fn reset_caret_blink(&mut self) {
        self.caret_visible = true;
        self.blink_timer = 0;
    }

    /// Moves the caret `amount` chars along the current line.
    ///
    /// Past the line start it continues at the end of the previous line.
    /// Past the line end it continues at offset 1 of the next line, skipping
    /// the implicit break between the two. At document edges it clamps.
    pub fn move_caret_x(&mut self, amount: i32) {
        let Some(line) = self.lines.get(self.caret_line) else {
            return;
        };
        let len = line.len();
        if amount < 0 {
            let back = amount.unsigned_abs() as usize;
            if back <= self.caret_offset {
                self.caret_offset -= back;
            } else if self.caret_line > 0 {
                self.caret_line -= 1;
                self.caret_offset = self.lines[self.caret_line].len();
            } else {
                self.caret_offset = 0;
            }
            self.reset_caret_blink();
        } else if amount > 0 {
            let offset = self.caret_offset + amount as usize;
            if offset <= len {
                self.caret_offset = offset;
            } else if self.caret_line + 1 < self.lines.len() {
                self.caret_line += 1;
                self.caret_offset = 1;
            } else {
                self.caret_offset = len;
            }
            self.reset_caret_blink();
        }
    }

    /// Moves the caret one line up (`dir < 0`) or down (`dir > 0`) keeping
    /// its char offset.
    pub fn move_caret_y(&mut self, dir: i32) {
        if dir > 0 && self.caret_line + 1 < self.lines.len() {
            self.caret_line += 1;
            self.reset_caret_blink();
        } else if dir < 0 && self.caret_line > 0 {
            self.caret_line -= 1;
            self.reset_caret_blink();
        }
    }

    /// Inserts `code` at the caret and steps past it. Control characters are
    /// rejected.
    pub fn insert_char(&mut self, code: char, max_width: f32) -> bool {
        if code.is_control() {
            return false;
        }
        let index = self.caret_to_index();
        self.chars.insert(index, code);
        self.rebuild_lines(max_width);
        self.move_caret_x(1);
        true
    }

    /// Removes the char before the caret. No-op at the buffer start.
    pub fn backspace(&mut self) -> bool {
        let index = self.caret_to_index();
        if index == 0 {
            return false;
        }
        self.chars.remove(index - 1);
        self.move_caret_x(-1);
        true
    }

    /// Removes the char under the caret. No-op at the buffer end.
    pub fn delete(&mut self) -> bool {
        let index = self.caret_to_index();
        if index >= self.chars.len() {
            return false;
        }
        self.chars.remove(index);
        true
    }

    /// Advances the blink counter by one frame.
    pub fn tick_blink(&mut self) {
        self.blink_timer += 1;
        if self.blink_timer >= self.blink_interval {
            self.blink_timer = 0;
            self.caret_visible = !self.caret_visible;
        }
    }
}

pub(crate) fn create(gui: &mut Gui) -> WidgetId {
    let mut widget = Widget::new(WidgetKind::TextBox(TextBox::new(gui.default_font())));
    widget.color = Color::WHITE;
    gui.insert_widget(widget)
}

pub(crate) fn deinit(widget: &mut Widget) {
    let text_box = widget.text_box_mut();
    text_box.chars.clear();
    text_box.lines.clear();
}

pub(crate) fn update(widget: &mut Widget) {
    widget.text_box_mut().tick_blink();
}

pub(crate) fn on_routed_event(gui: &mut Gui, id: WidgetId, args: &mut RoutedEventArgs) {
    let Some(widget) = gui.widget_mut(id) else {
        return;
    };
    let width = widget.actual_size.x;
    let text_box = widget.text_box_mut();
    match args.event {
        RoutedEvent::GotFocus => {
            text_box.show_caret = true;
            text_box.reset_caret_blink();
        }
        RoutedEvent::LostFocus => text_box.show_caret = false,
        RoutedEvent::KeyDown { key } => {
            match key {
                Key::Left => text_box.move_caret_x(-1),
                Key::Right => text_box.move_caret_x(1),
                Key::Up => text_box.move_caret_y(-1),
                Key::Down => text_box.move_caret_y(1),
                Key::Backspace => {
                    text_box.backspace();
                }
                Key::Delete => {
                    text_box.delete();
                }
                _ => return,
            }
            args.handled = true;
        }
        RoutedEvent::Text { code } => {
            if text_box.insert_char(code, width) {
                args.handled = true;
            }
        }
        _ => {}
    }
}

pub(crate) fn render(id: WidgetId, widget: &mut Widget, draw_list: &mut DrawList) {
    let pos = widget.screen_position;
    let size = widget.actual_size;
    let color = widget.color;
    let text_box = widget.text_box_mut();

    draw_list.push_rect_filled(pos, size, BACKGROUND);
    draw_list.commit(0, id);

    let Some(font) = text_box.font.clone() else {
        return;
    };
    text_box.rebuild_lines(size.x);

    let mut y = text_box
        .vertical_alignment
        .place(pos.y, size.y, text_box.total_lines_height);
    for line in &text_box.lines {
        let x = text_box.horizontal_alignment.place(pos.x, size.x, line.width);
        draw_list.push_text(Vec2::new(x, y), &text_box.chars[line.begin..line.end], color);
        y += font.ascender();
    }
    draw_list.commit(font.texture_id(), id);

    if text_box.show_caret && text_box.caret_visible {
        let mut x = pos.x;
        if let Some(line) = text_box.lines.get(text_box.caret_line) {
            x += text_box.chars[line.begin..line.end]
                .iter()
                .take(text_box.caret_offset)
                .map(|&c| font.advance(c))
                .sum::<f32>();
        }
        let caret_y = pos.y + text_box.caret_line as f32 * font.ascender();
        draw_list.push_rect_filled(
            Vec2::new(x, caret_y),
            Vec2::new(CARET_WIDTH, font.ascender()),
            color,
        );
        draw_list.commit(0, id);
    }
}

pub(crate) fn visit(widget: &mut Widget, visitor: &mut Visitor) -> bool {
    let text_box = widget.text_box_mut();
    let mut text = text_box.text();
    let mut ok = text.visit("Text", visitor);
    ok &= text_box.blink_interval.visit("BlinkInterval", visitor);
    ok &= visit_as_u32(
        visitor,
        "HorizontalAlignment",
        &mut text_box.horizontal_alignment,
        HorizontalAlignment::to_u32,
        HorizontalAlignment::from_u32,
    );
    ok &= visit_as_u32(
        visitor,
        "VerticalAlignment",
        &mut text_box.vertical_alignment,
        VerticalAlignment::to_u32,
        VerticalAlignment::from_u32,
    );
    if visitor.is_reading() {
        text_box.set_text(&text);
    }
    ok
}

fn get_text(widget: &Widget) -> PropertyValue {
    PropertyValue::String(widget.text_box().text())
}

fn set_text(widget: &mut Widget, value: PropertyValue) -> bool {
    match value {
        PropertyValue::String(text) => {
            widget.text_box_mut().set_text(&text);
            true
        }
        _ => false,
    }
}

pub(crate) const PROPERTIES: &[PropertyEntry] = &[
    PropertyEntry {
        name: "Text",
        get: get_text,
        set: set_text,
    },
    property!(
        "BlinkInterval",
        U32,
        |w| w.text_box().blink_interval,
        w.text_box_mut().blink_interval
    ),
];
