use crate::node::NodeKind;
use kestrel_base::{Color, Visit, Visitor, visit_as_u32};
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightType {
    #[default]
    Point,
    Directional,
    Spot,
}

impl LightType {
    pub fn to_u32(self) -> u32 {
        match self {
            LightType::Point => 0,
            LightType::Directional => 1,
            LightType::Spot => 2,
        }
    }

    pub fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(LightType::Point),
            1 => Some(LightType::Directional),
            2 => Some(LightType::Spot),
            _ => None,
        }
    }
}

/// Light payload of a scene node.
///
/// `cone_angle_cos` is a cache of `cos(cone_angle)` and is only ever written
/// by [`Light::set_cone_angle`].
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    light_type: LightType,
    radius: f32,
    color: Color,
    cone_angle: f32,
    cone_angle_cos: f32,
    cast_shadows: bool,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            light_type: LightType::Point,
            radius: 2.0,
            color: Color::WHITE,
            cone_angle: PI,
            cone_angle_cos: -1.0,
            cast_shadows: true,
        }
    }
}

impl Light {
    pub fn light_type(&self) -> LightType {
        self.light_type
    }

    pub fn set_light_type(&mut self, light_type: LightType) {
        self.light_type = light_type;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Radius never drops to zero or below.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(f32::EPSILON);
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn cone_angle(&self) -> f32 {
        self.cone_angle
    }

    pub fn cone_angle_cos(&self) -> f32 {
        self.cone_angle_cos
    }

    pub fn set_cone_angle(&mut self, angle: f32) {
        self.cone_angle = angle;
        self.cone_angle_cos = angle.cos();
    }

    pub fn cast_shadows(&self) -> bool {
        self.cast_shadows
    }

    pub fn set_cast_shadows(&mut self, value: bool) {
        self.cast_shadows = value;
    }

    fn visit_fields(&mut self, visitor: &mut Visitor) -> bool {
        let mut ok = visit_as_u32(
            visitor,
            "Type",
            &mut self.light_type,
            LightType::to_u32,
            LightType::from_u32,
        );
        ok &= self.color.visit("Color", visitor);
        ok &= self.cone_angle.visit("ConeAngle", visitor);
        ok &= self.cone_angle_cos.visit("CosConeAngle", visitor);
        ok &= self.radius.visit("Radius", visitor);
        ok &= self.cast_shadows.visit("CastShadows", visitor);
        if visitor.is_reading() {
            // CosConeAngle is written for readers that expect it; the cache is
            // always re-derived from ConeAngle here.
            self.set_cone_angle(self.cone_angle);
            self.set_radius(self.radius);
        }
        ok
    }
}

pub(crate) fn init(kind: &mut NodeKind) {
    *kind.light_mut() = Light::default();
}

pub(crate) fn copy(src: &NodeKind, dest: &mut NodeKind) {
    dest.light_mut().clone_from(src.light());
}

pub(crate) fn visit(kind: &mut NodeKind, visitor: &mut Visitor) -> bool {
    kind.light_mut().visit_fields(visitor)
}
