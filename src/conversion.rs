use glam::Vec3;

/// Spherical coordinates in radians, z up: `lat` is measured from the xy plane and `long`
/// from the x axis towards y.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct PolarCoords {
    pub r: f32,
    pub long: f32,
    pub lat: f32,
}

impl PolarCoords {
    pub fn from_degrees(r: f32, long: f32, lat: f32) -> Self {
        Self {
            r,
            long: long.to_radians(),
            lat: lat.to_radians(),
        }
    }
}

impl From<&PolarCoords> for Vec3 {
    fn from(polar_coords: &PolarCoords) -> Self {
        let (sin_lat, cos_lat) = polar_coords.lat.sin_cos();
        let (sin_long, cos_long) = polar_coords.long.sin_cos();
        polar_coords.r * Vec3::new(cos_lat * cos_long, cos_lat * sin_long, sin_lat)
    }
}

impl From<Vec3> for PolarCoords {
    fn from(cartesian_coords: Vec3) -> Self {
        let r = cartesian_coords.length();
        if r == 0.0 {
            return Self::default();
        }

        Self {
            r,
            long: f32::atan2(cartesian_coords.y, cartesian_coords.x),
            lat: (cartesian_coords.z / r).clamp(-1.0, 1.0).asin(),
        }
    }
}

/// A point on a horizontal circle, y up; `angle` is in radians, measured from x towards z.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct RingCoords {
    pub radius: f32,
    pub angle: f32,
    pub y: f32,
}

impl From<&RingCoords> for Vec3 {
    fn from(ring: &RingCoords) -> Self {
        let (sin, cos) = ring.angle.sin_cos();
        Vec3::new(ring.radius * cos, ring.y, ring.radius * sin)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn poles_sit_on_the_z_axis() {
        let north = Vec3::from(&PolarCoords::from_degrees(1.0, 37.0, 90.0));
        assert_relative_eq!(north.z, 1.0, epsilon = 1e-6);
        assert_relative_eq!(north.truncate().length(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn cartesian_round_trip_keeps_direction() {
        let point = Vec3::new(0.3, -0.4, 1.2);
        let back = Vec3::from(&PolarCoords::from(point));
        assert_relative_eq!(point.x, back.x, epsilon = 1e-5);
        assert_relative_eq!(point.y, back.y, epsilon = 1e-5);
        assert_relative_eq!(point.z, back.z, epsilon = 1e-5);
    }

    #[test]
    fn origin_converts_to_zero_radius() {
        assert_eq!(PolarCoords::from(Vec3::ZERO), PolarCoords::default());
    }

    #[test]
    fn ring_quarter_turn_lands_on_z() {
        let point = Vec3::from(&RingCoords {
            radius: 2.0,
            angle: FRAC_PI_2,
            y: 0.5,
        });
        assert_relative_eq!(point.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(point.y, 0.5);
        assert_relative_eq!(point.z, 2.0, epsilon = 1e-6);
    }
}
