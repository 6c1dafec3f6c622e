use glam::Vec3;
use kestrel_base::binary::{FORMAT_VERSION, MAGIC, MAX_DEPTH};
use kestrel_base::{Color, FieldValue, Visit, VisitError, VisitMode, Visitor, visit_as_u32};

fn reread(writer: Visitor) -> Visitor {
    let bytes = writer.to_bytes().unwrap();
    Visitor::reader_from(&bytes).unwrap()
}

#[test]
fn test_nested_fields_survive_the_binary_stream() {
    let mut w = Visitor::writer();
    assert_eq!(w.mode(), VisitMode::Write);

    let mut name = "lamp".to_string();
    let mut pos = Vec3::new(1.0, 2.0, 3.0);
    let mut color = Color::rgb(10, 20, 30);
    assert!(w.enter_node("Scene"));
    assert!(name.visit("Name", &mut w));
    assert!(w.enter_node("Node"));
    assert!(pos.visit("Position", &mut w));
    assert!(color.visit("Color", &mut w));
    w.leave_node();
    w.leave_node();

    let mut r = reread(w);
    assert!(r.is_reading());

    let mut name_back = String::new();
    let mut pos_back = Vec3::ZERO;
    let mut color_back = Color::default();
    assert!(r.enter_node("Scene"));
    assert!(name_back.visit("Name", &mut r));
    assert!(r.enter_node("Node"));
    // Field order on read does not need to match the write order.
    assert!(color_back.visit("Color", &mut r));
    assert!(pos_back.visit("Position", &mut r));
    r.leave_node();
    r.leave_node();

    assert_eq!(name_back, "lamp");
    assert_eq!(pos_back, pos);
    assert_eq!(color_back, color);
}

#[test]
fn test_missing_or_mistyped_field_keeps_default() {
    let mut w = Visitor::writer();
    let mut radius = 4.5f32;
    assert!(radius.visit("Radius", &mut w));

    let mut r = w.into_reader();

    let mut missing = 7u32;
    assert!(!missing.visit("Count", &mut r));
    assert_eq!(missing, 7);

    let mut wrong_type = 3u32;
    assert!(!wrong_type.visit("Radius", &mut r));
    assert_eq!(wrong_type, 3);

    assert!(!r.enter_node("Nope"));
    // A failed enter leaves the cursor where it was.
    let mut radius_back = 0.0f32;
    assert!(radius_back.visit("Radius", &mut r));
    assert_eq!(radius_back, 4.5);
}

#[test]
fn test_duplicate_field_name_last_write_wins() {
    let mut w = Visitor::writer();
    let mut a = 1u32;
    let mut b = 2u32;
    a.visit("Value", &mut w);
    b.visit("Value", &mut w);

    let root = w.node(w.root()).unwrap();
    assert_eq!(root.fields().len(), 1);
    assert_eq!(root.fields()[0].value, FieldValue::U32(2));
}

#[test]
fn test_reentering_a_node_while_writing_reuses_it() {
    let mut w = Visitor::writer();
    assert!(w.enter_node("Gui"));
    w.leave_node();
    assert!(w.enter_node("Gui"));
    w.leave_node();
    assert_eq!(w.node(w.root()).unwrap().children().len(), 1);
}

#[test]
fn test_vec_and_option_round_trip() {
    let mut w = Visitor::writer();
    let mut values = vec![1.0f32, 2.5, -3.0];
    let mut some: Option<String> = Some("data/font.ttf".to_string());
    let mut none: Option<u32> = None;
    assert!(values.visit("Values", &mut w));
    assert!(some.visit("Font", &mut w));
    assert!(none.visit("Limit", &mut w));

    let mut r = reread(w);
    let mut values_back: Vec<f32> = vec![9.0];
    let mut some_back: Option<String> = None;
    let mut none_back: Option<u32> = Some(5);
    assert!(values_back.visit("Values", &mut r));
    assert!(some_back.visit("Font", &mut r));
    assert!(none_back.visit("Limit", &mut r));

    assert_eq!(values_back, values);
    assert_eq!(some_back.as_deref(), Some("data/font.ttf"));
    assert_eq!(none_back, None);
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Fast,
    Slow,
}

#[test]
fn test_enum_with_unknown_discriminant_is_rejected() {
    let mut w = Visitor::writer();
    let mut raw = 9u32;
    raw.visit("Mode", &mut w);

    let mut r = w.into_reader();
    let mut mode = Mode::Slow;
    let ok = visit_as_u32(
        &mut r,
        "Mode",
        &mut mode,
        |m| m as u32,
        |raw| match raw {
            0 => Some(Mode::Fast),
            1 => Some(Mode::Slow),
            _ => None,
        },
    );
    assert!(!ok);
    assert_eq!(mode, Mode::Slow);
}

#[test]
fn test_corrupt_streams_are_errors() {
    let err = Visitor::reader_from(b"NOPE\x01\x00\x00\x00").err().unwrap();
    assert!(matches!(err, VisitError::BadMagic(_)));

    let mut w = Visitor::writer();
    let mut v = 1u64;
    v.visit("Big", &mut w);
    let bytes = w.to_bytes().unwrap();
    let err = Visitor::reader_from(&bytes[..bytes.len() - 3]).err().unwrap();
    assert!(matches!(err, VisitError::Truncated));

    let mut versioned = bytes.clone();
    versioned[4] = 99;
    let err = Visitor::reader_from(&versioned).err().unwrap();
    assert!(matches!(err, VisitError::UnsupportedVersion(99)));
}

#[test]
fn test_raw_bytes_field() {
    let mut w = Visitor::writer();
    let mut blob = vec![0u8, 255, 7, 7];
    assert!(w.visit_field("Data", &mut blob));
    let node = w.node(w.root()).unwrap();
    assert_eq!(node.field("Data").unwrap().value, FieldValue::Bytes(vec![0, 255, 7, 7]));

    let mut r = reread(w);
    let mut back: Vec<u8> = Vec::new();
    assert!(r.visit_field("Data", &mut back));
    assert_eq!(back, blob);

    // A byte blob is not a list node.
    let mut items: Vec<u32> = Vec::new();
    assert!(!items.visit("Data", &mut r));
}

#[test]
fn test_list_count_is_capped_by_stored_items() {
    let mut w = Visitor::writer();
    assert!(w.enter_node("Items"));
    let mut count = 100_000_000u32;
    let mut first = 5u32;
    assert!(count.visit("Count", &mut w));
    assert!(first.visit("Item0", &mut w));
    w.leave_node();

    let mut r = reread(w);
    let mut items: Vec<u32> = Vec::new();
    assert!(!items.visit("Items", &mut r));
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], 5);
}

#[test]
fn test_deeply_nested_stream_is_rejected() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    for _ in 0..MAX_DEPTH + 10 {
        // Unnamed node, no fields, one child.
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
    }
    let err = Visitor::reader_from(&bytes).err().unwrap();
    assert!(matches!(err, VisitError::TooDeep(MAX_DEPTH)));
}
