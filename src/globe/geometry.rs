use glam::{DMat3, DVec3};

/// Globe orientation shared by the sphere, the atmosphere shell and the
/// marker group. Applied as pitch about X after yaw about Y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    /// Rotation about the Y axis, radians
    pub yaw: f64,
    /// Rotation about the X axis, radians
    pub pitch: f64,
}

impl Orientation {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    /// Local (globe) to world rotation.
    #[inline]
    pub fn matrix(&self) -> DMat3 {
        DMat3::from_rotation_x(self.pitch) * DMat3::from_rotation_y(self.yaw)
    }

    /// Component-wise linear interpolation.
    pub fn lerp(&self, to: Orientation, t: f64) -> Orientation {
        Orientation {
            yaw: self.yaw + (to.yaw - self.yaw) * t,
            pitch: self.pitch + (to.pitch - self.pitch) * t,
        }
    }
}

/// Point on a sphere of `radius` for a geographic coordinate.
///
/// Longitude is shifted by 180° to line up with the texture seam:
/// (lat 0, lon 0) lands on +X and the north pole is +Y.
#[inline]
pub fn latlon_to_local(lat: f64, lon: f64, radius: f64) -> DVec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (lon + 180.0).to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    DVec3::new(
        -radius * sin_phi * cos_theta,
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

/// Orientation the fly-to animation heads for when focusing (lat, lon).
pub fn target_orientation(lat: f64, lon: f64) -> Orientation {
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    let v = DVec3::new(-sin_lon * cos_lat, sin_lat, cos_lon * cos_lat);

    let yaw = v.x.atan2(v.z);
    let pitch = -(v.y / v.length()).clamp(-1.0, 1.0).asin();
    Orientation { yaw, pitch }
}

/// Quadratic ease-in for the first half, ease-out for the second.
#[inline]
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Outward facing orthonormal basis (u, v) of the plane tangent at `normal`.
pub fn tangent_basis(normal: DVec3) -> (DVec3, DVec3) {
    let n = normal.normalize();
    let helper = if n.y.abs() < 0.99 { DVec3::Y } else { DVec3::X };
    let u = helper.cross(n).normalize();
    let v = n.cross(u);
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_equator_prime_meridian_on_positive_x() {
        let p = latlon_to_local(0.0, 0.0, 1.02);
        assert!((p.x - 1.02).abs() < EPS);
        assert!(p.y.abs() < EPS);
        assert!(p.z.abs() < EPS);
    }

    #[test]
    fn test_north_pole_ignores_longitude() {
        for lon in [-180.0, -74.0, 0.0, 45.0, 139.0, 180.0] {
            let p = latlon_to_local(90.0, lon, 1.02);
            assert!(p.x.abs() < EPS && p.z.abs() < EPS, "lon {lon}: {p:?}");
            assert!((p.y - 1.02).abs() < EPS);
        }
    }

    #[test]
    fn test_marker_sits_on_radius() {
        let p = latlon_to_local(40.0, -74.0, 1.02);
        assert!((p.length() - 1.02).abs() < EPS);
    }

    #[test]
    fn test_west_90_faces_camera() {
        // lon -90 lands on +Z, i.e. straight at an unrotated camera
        let p = latlon_to_local(0.0, -90.0, 1.0);
        assert!((p.z - 1.0).abs() < EPS);
    }

    #[test]
    fn test_target_for_origin_is_zero() {
        let o = target_orientation(0.0, 0.0);
        assert!(o.yaw.abs() < EPS);
        assert!(o.pitch.abs() < EPS);
    }

    #[test]
    fn test_target_pitch_follows_latitude() {
        let o = target_orientation(30.0, 0.0);
        assert!((o.pitch + 30f64.to_radians()).abs() < EPS);
        let o = target_orientation(0.0, 90.0);
        assert!((o.yaw + FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_ease_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert!((ease_in_out_quad(0.5) - 0.5).abs() < EPS);
        assert!((ease_in_out_quad(1.0) - 1.0).abs() < EPS);
        assert!((ease_in_out_quad(0.25) - 0.125).abs() < EPS);
        assert!((ease_in_out_quad(0.75) - 0.875).abs() < EPS);
        // Clamped outside [0, 1]
        assert!((ease_in_out_quad(3.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_matrix_identity_at_rest() {
        let m = Orientation::default().matrix();
        let p = DVec3::new(0.3, -0.2, 0.9);
        assert!((m * p - p).length() < EPS);
    }

    #[test]
    fn test_yaw_half_turn_flips_z() {
        let m = Orientation::new(PI, 0.0).matrix();
        let p = m * DVec3::Z;
        assert!((p.z + 1.0).abs() < EPS);
    }

    #[test]
    fn test_tangent_basis_is_orthonormal() {
        for n in [DVec3::X, DVec3::Y, DVec3::new(0.2, 0.9, -0.4)] {
            let (u, v) = tangent_basis(n);
            let n = n.normalize();
            assert!(u.dot(n).abs() < EPS);
            assert!(v.dot(n).abs() < EPS);
            assert!(u.dot(v).abs() < EPS);
            assert!((u.length() - 1.0).abs() < EPS);
        }
    }
}
