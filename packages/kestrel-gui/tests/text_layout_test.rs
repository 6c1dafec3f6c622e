use kestrel_gui::{Font, Glyph, TextBox, TextLine, break_on_lines};
use std::sync::Arc;

fn test_font() -> Font {
    Font::monospace(16.0, 10.0, 7, ('a'..='z').chain([' ']))
}

fn lines_of(text: &str, max_width: f32) -> (Vec<TextLine>, f32) {
    let chars: Vec<char> = text.chars().collect();
    let mut lines = Vec::new();
    let height = break_on_lines(&chars, &test_font(), max_width, &mut lines);
    (lines, height)
}

fn ranges(lines: &[TextLine]) -> Vec<(usize, usize)> {
    lines.iter().map(|l| (l.begin, l.end)).collect()
}

fn text_box_with(text: &str) -> TextBox {
    let mut text_box = TextBox::new(Some(Arc::new(test_font())));
    text_box.set_text(text);
    text_box.rebuild_lines(f32::INFINITY);
    text_box
}

#[test]
fn test_newline_is_excluded_from_both_lines() {
    let (lines, height) = lines_of("ab\ncd", f32::INFINITY);
    assert_eq!(ranges(&lines), vec![(0, 2), (3, 5)]);
    assert_eq!(lines[0].width, 20.0);
    assert_eq!(lines[1].width, 20.0);
    assert_eq!(height, 32.0);
}

#[test]
fn test_carriage_return_breaks_too() {
    let (lines, _) = lines_of("ab\rcd", f32::INFINITY);
    assert_eq!(ranges(&lines), vec![(0, 2), (3, 5)]);
}

#[test]
fn test_overflow_wraps_before_the_glyph() {
    let (lines, height) = lines_of("abcde", 25.0);
    assert_eq!(ranges(&lines), vec![(0, 2), (2, 4), (4, 5)]);
    assert_eq!(height, 48.0);
}

#[test]
fn test_glyph_wider_than_box_gets_its_own_line() {
    let (lines, _) = lines_of("abc", 5.0);
    assert_eq!(ranges(&lines), vec![(0, 1), (1, 2), (2, 3)]);
}

#[test]
fn test_missing_glyphs_take_no_width() {
    let (lines, _) = lines_of("a\u{20ac}b", f32::INFINITY);
    assert_eq!(ranges(&lines), vec![(0, 3)]);
    assert_eq!(lines[0].width, 20.0);
}

#[test]
fn test_empty_lines_between_terminators_are_kept() {
    let (lines, _) = lines_of("a\n\nb", f32::INFINITY);
    assert_eq!(ranges(&lines), vec![(0, 1), (2, 2), (3, 4)]);
}

#[test]
fn test_trailing_terminator_adds_no_line() {
    let (lines, _) = lines_of("ab\n", f32::INFINITY);
    assert_eq!(ranges(&lines), vec![(0, 2)]);
    let (lines, height) = lines_of("", f32::INFINITY);
    assert!(lines.is_empty());
    assert_eq!(height, 0.0);
}

#[test]
fn test_line_breaking_is_idempotent() {
    let chars: Vec<char> = "the quick brown\nfox jumps over the lazy dog".chars().collect();
    let font = test_font();
    let mut first = Vec::new();
    let mut second = Vec::new();
    let h1 = break_on_lines(&chars, &font, 70.0, &mut first);
    let h2 = break_on_lines(&chars, &font, 70.0, &mut second);
    assert_eq!(first, second);
    assert_eq!(h1, h2);

    // Reusing the output buffer gives the same result too.
    let h3 = break_on_lines(&chars, &font, 70.0, &mut first);
    assert_eq!(first, second);
    assert_eq!(h1, h3);
}

#[test]
fn test_caret_right_past_line_end_lands_at_offset_one() {
    let mut tb = text_box_with("ab\ncd");
    tb.move_caret_x(1);
    tb.move_caret_x(1);
    assert_eq!(tb.caret(), (0, 2));
    tb.move_caret_x(1);
    assert_eq!(tb.caret(), (1, 1));
}

#[test]
fn test_caret_left_past_line_start_goes_to_previous_end() {
    let mut tb = text_box_with("ab\ncd");
    tb.move_caret_y(1);
    assert_eq!(tb.caret(), (1, 0));
    tb.move_caret_x(-1);
    assert_eq!(tb.caret(), (0, 2));
}

#[test]
fn test_caret_clamps_at_document_edges() {
    let mut tb = text_box_with("ab\ncd");
    tb.move_caret_x(-1);
    assert_eq!(tb.caret(), (0, 0));
    tb.move_caret_y(-1);
    assert_eq!(tb.caret(), (0, 0));

    tb.move_caret_y(1);
    tb.move_caret_x(5);
    assert_eq!(tb.caret(), (1, 2));
    tb.move_caret_y(1);
    assert_eq!(tb.caret(), (1, 2));
}

#[test]
fn test_vertical_move_keeps_offset_not_column() {
    let mut tb = text_box_with("abcd\nx");
    tb.move_caret_x(3);
    tb.move_caret_y(1);
    assert_eq!(tb.caret(), (1, 3));
    // Offset past the short line is clamped only when converted to an index.
    assert_eq!(tb.caret_to_index(), 6);
}

#[test]
fn test_insert_into_empty_box() {
    let mut tb = TextBox::new(Some(Arc::new(test_font())));
    assert!(tb.insert_char('h', 100.0));
    assert!(tb.insert_char('i', 100.0));
    assert_eq!(tb.text(), "hi");
    assert_eq!(tb.caret(), (0, 2));
    assert!(!tb.insert_char('\n', 100.0));
    assert!(!tb.insert_char('\u{8}', 100.0));
    assert_eq!(tb.text(), "hi");
}

#[test]
fn test_insert_in_the_middle() {
    let mut tb = text_box_with("ac");
    tb.move_caret_x(1);
    tb.insert_char('b', f32::INFINITY);
    assert_eq!(tb.text(), "abc");
    assert_eq!(tb.caret(), (0, 2));
}

#[test]
fn test_insert_that_wraps_moves_caret_to_next_line() {
    let mut tb = text_box_with("abc");
    tb.rebuild_lines(30.0);
    tb.move_caret_x(3);
    assert_eq!(tb.caret(), (0, 3));
    tb.insert_char('d', 30.0);
    assert_eq!(ranges(tb.lines()), vec![(0, 3), (3, 4)]);
    assert_eq!(tb.caret(), (1, 1));
    assert_eq!(tb.caret_to_index(), 4);
}

#[test]
fn test_backspace_and_delete_leave_lines_stale() {
    let mut tb = text_box_with("ab\ncd");
    tb.move_caret_y(1);
    tb.move_caret_x(1);
    assert_eq!(tb.caret_to_index(), 4);

    assert!(tb.backspace());
    assert_eq!(tb.text(), "ab\nd");
    assert_eq!(tb.caret(), (1, 0));
    assert_eq!(ranges(tb.lines()), vec![(0, 2), (3, 5)]);

    tb.rebuild_lines(f32::INFINITY);
    assert_eq!(ranges(tb.lines()), vec![(0, 2), (3, 4)]);

    assert!(tb.delete());
    assert_eq!(tb.text(), "ab\n");
    assert_eq!(ranges(tb.lines()), vec![(0, 2), (3, 4)]);
}

#[test]
fn test_edits_out_of_range_are_no_ops() {
    let mut tb = text_box_with("ab");
    assert!(!tb.backspace());
    tb.move_caret_x(2);
    assert!(!tb.delete());
    assert_eq!(tb.text(), "ab");

    let mut empty = TextBox::new(Some(Arc::new(test_font())));
    assert!(!empty.backspace());
    assert!(!empty.delete());
    assert_eq!(empty.caret_to_index(), 0);
}

#[test]
fn test_caret_index_stays_in_bounds_through_edits() {
    let mut tb = text_box_with("hello\nworld");
    let script: &[(&str, char)] = &[
        ("right", ' '),
        ("right", ' '),
        ("backspace", ' '),
        ("down", ' '),
        ("delete", ' '),
        ("delete", ' '),
        ("delete", ' '),
        ("delete", ' '),
        ("delete", ' '),
        ("insert", 'z'),
        ("backspace", ' '),
        ("backspace", ' '),
        ("backspace", ' '),
        ("right", ' '),
        ("right", ' '),
        ("right", ' '),
        ("backspace", ' '),
        ("up", ' '),
        ("insert", 'q'),
        ("delete", ' '),
    ];
    for (op, c) in script {
        match *op {
            "right" => tb.move_caret_x(1),
            "left" => tb.move_caret_x(-1),
            "up" => tb.move_caret_y(-1),
            "down" => tb.move_caret_y(1),
            "backspace" => {
                tb.backspace();
            }
            "delete" => {
                tb.delete();
            }
            "insert" => {
                tb.insert_char(*c, 30.0);
            }
            _ => unreachable!(),
        }
        assert!(tb.caret_to_index() <= tb.chars().len(), "after {}", op);
    }
}

#[test]
fn test_blink_toggles_on_interval() {
    let mut tb = text_box_with("ab");
    assert_eq!(tb.blink_interval, 35);
    assert!(tb.is_caret_visible());
    for _ in 0..34 {
        tb.tick_blink();
    }
    assert!(tb.is_caret_visible());
    tb.tick_blink();
    assert!(!tb.is_caret_visible());
    for _ in 0..35 {
        tb.tick_blink();
    }
    assert!(tb.is_caret_visible());
}

#[test]
fn test_caret_movement_resets_blink() {
    let mut tb = text_box_with("ab");
    for _ in 0..35 {
        tb.tick_blink();
    }
    assert!(!tb.is_caret_visible());
    tb.move_caret_x(1);
    assert!(tb.is_caret_visible());
}

#[test]
fn test_font_lookup() {
    let mut font = Font::new(12.0, 3);
    font.insert_glyph('x', Glyph { advance: 6.5 });
    assert_eq!(font.get_glyph('x'), Some(&Glyph { advance: 6.5 }));
    assert!(font.get_glyph('y').is_none());
    assert_eq!(font.text_width("xyx".chars()), 13.0);
}
