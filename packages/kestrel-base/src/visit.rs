use crate::color::Color;
use crate::visitor::Visitor;
use glam::{Quat, Vec2, Vec3};

/// Anything that can be written to or restored from a [`Visitor`].
///
/// Implementations return the conjunction of their field results so the
/// caller can tell a partial read from a complete one. A `false` is never
/// fatal: every value that was found has been applied, the rest keep their
/// previous contents.
pub trait Visit {
    fn visit(&mut self, name: &str, visitor: &mut Visitor) -> bool;
}

macro_rules! impl_visit_for_field {
    ($($ty:ty),* $(,)?) => {$(
        impl Visit for $ty {
            fn visit(&mut self, name: &str, visitor: &mut Visitor) -> bool {
                visitor.visit_field(name, self)
            }
        }
    )*};
}

impl_visit_for_field!(bool, u8, u32, i32, u64, f32, f64, String, Vec2, Vec3, Quat, Color);

impl<T: Visit + Default> Visit for Vec<T> {
    fn visit(&mut self, name: &str, visitor: &mut Visitor) -> bool {
        if !visitor.enter_node(name) {
            return false;
        }
        let mut count = self.len() as u32;
        let mut ok = visitor.visit_field("Count", &mut count);
        if visitor.is_reading() && ok {
            // Items are stored as fields or child nodes, so a valid count
            // never exceeds the number of entries the node holds.
            let stored = visitor.entry_count();
            if count as usize > stored {
                tracing::warn!("List `{}` claims {} items but holds {} entries", name, count, stored);
                count = stored as u32;
                ok = false;
            }
            self.clear();
            self.resize_with(count as usize, T::default);
        }
        for (i, item) in self.iter_mut().enumerate() {
            ok &= item.visit(&format!("Item{}", i), visitor);
        }
        visitor.leave_node();
        ok
    }
}

impl<T: Visit + Default> Visit for Option<T> {
    fn visit(&mut self, name: &str, visitor: &mut Visitor) -> bool {
        if !visitor.enter_node(name) {
            return false;
        }
        let mut is_some = self.is_some();
        let mut ok = visitor.visit_field("IsSome", &mut is_some);
        if visitor.is_reading() && ok {
            *self = if is_some { Some(T::default()) } else { None };
        }
        if let Some(value) = self {
            ok &= value.visit("Value", visitor);
        }
        visitor.leave_node();
        ok
    }
}

/// Visits a fieldless enum through its `u32` discriminant.
///
/// An unknown discriminant on read keeps the current value and reports
/// `false`, the same way a missing field does.
pub fn visit_as_u32<E: Copy>(
    visitor: &mut Visitor,
    name: &str,
    value: &mut E,
    encode: impl Fn(E) -> u32,
    decode: impl Fn(u32) -> Option<E>,
) -> bool {
    let mut raw = encode(*value);
    if !visitor.visit_field(name, &mut raw) {
        return false;
    }
    if !visitor.is_reading() {
        return true;
    }
    match decode(raw) {
        Some(decoded) => {
            *value = decoded;
            true
        }
        None => {
            tracing::warn!("Field `{}` holds unknown discriminant {}", name, raw);
            false
        }
    }
}
