use crate::color::Color;
use glam::{Quat, Vec2, Vec3};
use serde::Serialize;

/// On-stream discriminant of a field payload.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTag {
    Bool = 0,
    U8 = 1,
    U32 = 2,
    I32 = 3,
    U64 = 4,
    F32 = 5,
    F64 = 6,
    String = 7,
    Vec2 = 8,
    Vec3 = 9,
    Quat = 10,
    Color = 11,
    Bytes = 12,
}

impl FieldTag {
    pub fn from_u8(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => FieldTag::Bool,
            1 => FieldTag::U8,
            2 => FieldTag::U32,
            3 => FieldTag::I32,
            4 => FieldTag::U64,
            5 => FieldTag::F32,
            6 => FieldTag::F64,
            7 => FieldTag::String,
            8 => FieldTag::Vec2,
            9 => FieldTag::Vec3,
            10 => FieldTag::Quat,
            11 => FieldTag::Color,
            12 => FieldTag::Bytes,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum FieldValue {
    Bool(bool),
    U8(u8),
    U32(u32),
    I32(i32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Vec2(Vec2),
    Vec3(Vec3),
    Quat(Quat),
    Color(Color),
    Bytes(Vec<u8>),
}

impl FieldValue {
    pub fn tag(&self) -> FieldTag {
        match self {
            FieldValue::Bool(_) => FieldTag::Bool,
            FieldValue::U8(_) => FieldTag::U8,
            FieldValue::U32(_) => FieldTag::U32,
            FieldValue::I32(_) => FieldTag::I32,
            FieldValue::U64(_) => FieldTag::U64,
            FieldValue::F32(_) => FieldTag::F32,
            FieldValue::F64(_) => FieldTag::F64,
            FieldValue::String(_) => FieldTag::String,
            FieldValue::Vec2(_) => FieldTag::Vec2,
            FieldValue::Vec3(_) => FieldTag::Vec3,
            FieldValue::Quat(_) => FieldTag::Quat,
            FieldValue::Color(_) => FieldTag::Color,
            FieldValue::Bytes(_) => FieldTag::Bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

/// A value that can be stored as a single named field.
pub trait FieldType: Sized {
    const TAG: FieldTag;

    fn to_field(&self) -> FieldValue;

    /// `None` when `value` carries a different tag.
    fn from_field(value: &FieldValue) -> Option<Self>;
}

macro_rules! impl_field_type {
    ($($ty:ty => $variant:ident,)*) => {$(
        impl FieldType for $ty {
            const TAG: FieldTag = FieldTag::$variant;

            fn to_field(&self) -> FieldValue {
                FieldValue::$variant(self.clone())
            }

            fn from_field(value: &FieldValue) -> Option<Self> {
                match value {
                    FieldValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    )*};
}

impl_field_type!(
    bool => Bool,
    u8 => U8,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Quat => Quat,
    Color => Color,
    Vec<u8> => Bytes,
);
