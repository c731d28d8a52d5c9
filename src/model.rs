use std::fmt;

use glam::{Mat4, Vec3};

/// A model matrix built up by post-multiplying transformations, so each new transformation
/// applies in the model's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub matrix: Mat4,
    /// Sum of every translation since the last reset
    pub position: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            position: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn reset(&mut self) {
        self.matrix = Mat4::IDENTITY;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.matrix *= Mat4::from_translation(offset);
    }

    pub fn scale(&mut self, factor: Vec3) {
        self.matrix *= Mat4::from_scale(factor);
    }

    /// `angle` in radians; a zero axis leaves the matrix untouched
    pub fn rotate(&mut self, angle: f32, axis: Vec3) {
        if let Some(axis) = axis.try_normalize() {
            self.matrix *= Mat4::from_axis_angle(axis, angle);
        }
    }
}

/// Anything the keyboard can select and move around
pub trait Model {
    fn name(&self) -> &str;
    fn transform(&self) -> &Transform;
    fn transform_mut(&mut self) -> &mut Transform;
    fn draw_mode(&self) -> DrawMode;
    fn set_draw_mode(&mut self, mode: DrawMode);

    fn reset_model(&mut self) {
        self.transform_mut().reset();
    }

    fn translate(&mut self, offset: Vec3) {
        self.transform_mut().translate(offset);
    }

    fn scale(&mut self, factor: Vec3) {
        self.transform_mut().scale(factor);
    }

    fn rotate(&mut self, angle: f32, axis: Vec3) {
        self.transform_mut().rotate(angle, axis);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawMode {
    Points,
    Lines,
    #[default]
    Polygons,
}

impl DrawMode {
    pub fn next(self) -> Self {
        match self {
            Self::Points => Self::Lines,
            Self::Lines => Self::Polygons,
            Self::Polygons => Self::Points,
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Points => "[ Draw Points ]",
            Self::Lines => "[ Draw Lines ]",
            Self::Polygons => "[ Draw Polygons ]",
        })
    }
}

/// Whether shaders use the vertex colours or a single solid colour
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColourMode {
    #[default]
    PerSide,
    Solid,
}

impl ColourMode {
    pub fn toggle(self) -> Self {
        match self {
            Self::PerSide => Self::Solid,
            Self::Solid => Self::PerSide,
        }
    }

    pub fn as_uniform(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for ColourMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PerSide => "[ Color per side ]",
            Self::Solid => "[ Solid Color ]",
        })
    }
}

/// `Bright` skips lighting entirely; the light point is drawn this way
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmitMode {
    #[default]
    Coloured,
    Bright,
}

impl EmitMode {
    pub fn as_uniform(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for EmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Coloured => "[ Emit Colored ]",
            Self::Bright => "[ Emit Bright ]",
        })
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn draw_mode_cycles() {
        let mut mode = DrawMode::Points;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(
            seen,
            vec![
                DrawMode::Points,
                DrawMode::Lines,
                DrawMode::Polygons,
                DrawMode::Points
            ]
        );
    }

    #[test]
    fn mode_names() {
        assert_eq!(DrawMode::Lines.to_string(), "[ Draw Lines ]");
        assert_eq!(ColourMode::Solid.to_string(), "[ Solid Color ]");
        assert_eq!(EmitMode::Bright.to_string(), "[ Emit Bright ]");
        assert_eq!(ColourMode::PerSide.toggle(), ColourMode::Solid);
        assert_eq!(ColourMode::Solid.as_uniform(), 1);
    }

    #[test]
    fn transformations_apply_in_local_space() {
        let mut transform = Transform::default();
        transform.translate(Vec3::X);
        transform.rotate(FRAC_PI_2, Vec3::Z);
        transform.translate(Vec3::X);

        // the second step runs along the rotated x axis, which now points along y
        let origin = transform.matrix.transform_point3(Vec3::ZERO);
        assert_relative_eq!(origin.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(origin.y, 1.0, epsilon = 1e-6);
        // the tracked position only sums the raw offsets
        assert_eq!(transform.position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn reset_keeps_position() {
        let mut transform = Transform::default();
        transform.translate(Vec3::Z);
        transform.scale(Vec3::splat(0.05));
        transform.reset();
        assert_eq!(transform.matrix, Mat4::IDENTITY);
        assert_eq!(transform.position, Vec3::Z);
    }

    #[test]
    fn zero_axis_is_ignored() {
        let mut transform = Transform::default();
        transform.rotate(1.0, Vec3::ZERO);
        assert_eq!(transform.matrix, Mat4::IDENTITY);
    }
}
