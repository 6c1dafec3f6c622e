//! Binary layout of a visitor tree.
//!
//! ```text
//! stream := MAGIC version:u32 node
//! node   := name:str field_count:u32 field* child_count:u32 node*
//! field  := name:str tag:u8 payload
//! str    := len:u32 utf8-bytes
//! bytes  := len:u32 raw-bytes
//! ```
//!
//! All integers and floats are little-endian.

use crate::color::Color;
use crate::error::VisitError;
use crate::field::{Field, FieldTag, FieldValue};
use crate::visitor::{VisitorNode, VisitorNodeId};
use glam::{Quat, Vec2, Vec3};
use slotmap::SlotMap;
use std::io::{ErrorKind, Read, Write};

pub const MAGIC: [u8; 4] = *b"KVIS";
pub const FORMAT_VERSION: u32 = 1;
/// Deepest node nesting accepted when reading a stream.
pub const MAX_DEPTH: usize = 1024;

pub(crate) fn write_tree<W: Write>(
    w: &mut W,
    nodes: &SlotMap<VisitorNodeId, VisitorNode>,
    root: VisitorNodeId,
) -> Result<(), VisitError> {
    w.write_all(&MAGIC)?;
    w.write_all(&FORMAT_VERSION.to_le_bytes())?;
    write_node(w, nodes, root)
}

fn write_node<W: Write>(
    w: &mut W,
    nodes: &SlotMap<VisitorNodeId, VisitorNode>,
    id: VisitorNodeId,
) -> Result<(), VisitError> {
    let node = &nodes[id];
    write_str(w, &node.name)?;
    w.write_all(&(node.fields.len() as u32).to_le_bytes())?;
    for field in &node.fields {
        write_str(w, &field.name)?;
        w.write_all(&[field.value.tag() as u8])?;
        write_payload(w, &field.value)?;
    }
    w.write_all(&(node.children.len() as u32).to_le_bytes())?;
    for &child in &node.children {
        write_node(w, nodes, child)?;
    }
    Ok(())
}

fn write_str<W: Write>(w: &mut W, s: &str) -> Result<(), VisitError> {
    write_bytes(w, s.as_bytes())
}

fn write_bytes<W: Write>(w: &mut W, bytes: &[u8]) -> Result<(), VisitError> {
    w.write_all(&(bytes.len() as u32).to_le_bytes())?;
    w.write_all(bytes)?;
    Ok(())
}

fn write_f32s<W: Write>(w: &mut W, values: &[f32]) -> Result<(), VisitError> {
    for v in values {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

fn write_payload<W: Write>(w: &mut W, value: &FieldValue) -> Result<(), VisitError> {
    match value {
        FieldValue::Bool(v) => w.write_all(&[*v as u8])?,
        FieldValue::U8(v) => w.write_all(&[*v])?,
        FieldValue::U32(v) => w.write_all(&v.to_le_bytes())?,
        FieldValue::I32(v) => w.write_all(&v.to_le_bytes())?,
        FieldValue::U64(v) => w.write_all(&v.to_le_bytes())?,
        FieldValue::F32(v) => w.write_all(&v.to_le_bytes())?,
        FieldValue::F64(v) => w.write_all(&v.to_le_bytes())?,
        FieldValue::String(v) => write_str(w, v)?,
        FieldValue::Vec2(v) => write_f32s(w, &v.to_array())?,
        FieldValue::Vec3(v) => write_f32s(w, &v.to_array())?,
        FieldValue::Quat(v) => write_f32s(w, &v.to_array())?,
        FieldValue::Color(v) => w.write_all(&v.to_bytes())?,
        FieldValue::Bytes(v) => write_bytes(w, v)?,
    }
    Ok(())
}

pub(crate) fn read_tree<R: Read>(
    r: &mut R,
) -> Result<(SlotMap<VisitorNodeId, VisitorNode>, VisitorNodeId), VisitError> {
    let magic: [u8; 4] = read_array(r)?;
    if magic != MAGIC {
        return Err(VisitError::BadMagic(magic));
    }
    let version = read_u32(r)?;
    if version != FORMAT_VERSION {
        return Err(VisitError::UnsupportedVersion(version));
    }
    let mut nodes = SlotMap::with_key();
    let root = read_node(r, &mut nodes, None, 0)?;
    Ok((nodes, root))
}

fn read_node<R: Read>(
    r: &mut R,
    nodes: &mut SlotMap<VisitorNodeId, VisitorNode>,
    parent: Option<VisitorNodeId>,
    depth: usize,
) -> Result<VisitorNodeId, VisitError> {
    if depth > MAX_DEPTH {
        return Err(VisitError::TooDeep(MAX_DEPTH));
    }
    let name = read_str(r)?;
    let id = nodes.insert(VisitorNode::named(&name, parent));

    let field_count = read_u32(r)?;
    for _ in 0..field_count {
        let field_name = read_str(r)?;
        let [raw_tag] = read_array::<R, 1>(r)?;
        let tag = FieldTag::from_u8(raw_tag).ok_or_else(|| VisitError::UnknownTag {
            tag: raw_tag,
            field: field_name.clone(),
        })?;
        let value = read_payload(r, tag)?;
        nodes[id].fields.push(Field {
            name: field_name,
            value,
        });
    }

    let child_count = read_u32(r)?;
    for _ in 0..child_count {
        let child = read_node(r, nodes, Some(id), depth + 1)?;
        nodes[id].children.push(child);
    }
    Ok(id)
}

fn map_eof(e: std::io::Error) -> VisitError {
    if e.kind() == ErrorKind::UnexpectedEof {
        VisitError::Truncated
    } else {
        VisitError::Io(e)
    }
}

fn read_array<R: Read, const N: usize>(r: &mut R) -> Result<[u8; N], VisitError> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf).map_err(map_eof)?;
    Ok(buf)
}

fn read_u32<R: Read>(r: &mut R) -> Result<u32, VisitError> {
    Ok(u32::from_le_bytes(read_array(r)?))
}

fn read_f32<R: Read>(r: &mut R) -> Result<f32, VisitError> {
    Ok(f32::from_le_bytes(read_array(r)?))
}

fn read_bytes<R: Read>(r: &mut R) -> Result<Vec<u8>, VisitError> {
    let len = read_u32(r)? as u64;
    let mut bytes = Vec::new();
    r.by_ref().take(len).read_to_end(&mut bytes)?;
    if bytes.len() as u64 != len {
        return Err(VisitError::Truncated);
    }
    Ok(bytes)
}

fn read_str<R: Read>(r: &mut R) -> Result<String, VisitError> {
    Ok(String::from_utf8(read_bytes(r)?)?)
}

fn read_payload<R: Read>(r: &mut R, tag: FieldTag) -> Result<FieldValue, VisitError> {
    Ok(match tag {
        FieldTag::Bool => FieldValue::Bool(read_array::<R, 1>(r)?[0] != 0),
        FieldTag::U8 => FieldValue::U8(read_array::<R, 1>(r)?[0]),
        FieldTag::U32 => FieldValue::U32(read_u32(r)?),
        FieldTag::I32 => FieldValue::I32(i32::from_le_bytes(read_array(r)?)),
        FieldTag::U64 => FieldValue::U64(u64::from_le_bytes(read_array(r)?)),
        FieldTag::F32 => FieldValue::F32(read_f32(r)?),
        FieldTag::F64 => FieldValue::F64(f64::from_le_bytes(read_array(r)?)),
        FieldTag::String => FieldValue::String(read_str(r)?),
        FieldTag::Vec2 => FieldValue::Vec2(Vec2::new(read_f32(r)?, read_f32(r)?)),
        FieldTag::Vec3 => FieldValue::Vec3(Vec3::new(read_f32(r)?, read_f32(r)?, read_f32(r)?)),
        FieldTag::Quat => FieldValue::Quat(Quat::from_xyzw(
            read_f32(r)?,
            read_f32(r)?,
            read_f32(r)?,
            read_f32(r)?,
        )),
        FieldTag::Color => FieldValue::Color(Color::from_bytes(read_array(r)?)),
        FieldTag::Bytes => FieldValue::Bytes(read_bytes(r)?),
    })
}
