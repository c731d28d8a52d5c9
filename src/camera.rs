use std::fmt;

use glam::{Mat4, Vec3};

use crate::model::{DrawMode, Model, Transform};

const FOV_Y_DEGREES: f32 = 45.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// The view transform plus the projection it is rendered through.
///
/// The view can be selected and moved like any other model; transformations post-multiply
/// the view matrix.
pub struct Camera {
    name: String,
    view: Transform,
    aspect: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            name: "Camera / View".to_string(),
            view: Transform {
                matrix: Mat4::look_at_rh(Vec3::new(0.0, 0.0, 2.5), Vec3::ZERO, Vec3::Y),
                position: Vec3::ZERO,
            },
            aspect: 4.0 / 3.0,
        };
        camera.resize(width, height);
        camera
    }

    /// A zero height keeps the previous aspect ratio
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        self.view.matrix
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(FOV_Y_DEGREES.to_radians(), self.aspect, NEAR, FAR)
    }
}

impl Model for Camera {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self) -> &Transform {
        &self.view
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.view
    }

    fn draw_mode(&self) -> DrawMode {
        DrawMode::Polygons
    }

    fn set_draw_mode(&mut self, _mode: DrawMode) {}
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Camera --> {}", self.name)?;
        writeln!(f, "view: {}", self.view.matrix)?;
        write!(f, "aspect: {:.3}", self.aspect)
    }
}
