use glam::DVec3;

/// A ray in world space. `dir` is normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub dir: DVec3,
}

impl Ray {
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.dir * t
    }
}

/// Perspective camera on the +Z axis looking at the origin.
/// Screen coordinates are canvas pixels with y growing downward.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: DVec3,
    /// tan(fov_y / 2)
    half_height: f64,
    pub width: usize,
    pub height: usize,
}

impl Camera {
    pub fn new(distance: f64, fov_y_deg: f64, width: usize, height: usize) -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, distance),
            half_height: (fov_y_deg.to_radians() / 2.0).tan(),
            width,
            height,
        }
    }

    /// Track the canvas size (aspect ratio follows it)
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    #[inline]
    fn aspect(&self) -> f64 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f64 / self.height as f64
        }
    }

    /// Pixel → normalized device coordinates in [-1, 1], +y up.
    pub fn to_ndc(&self, px: f64, py: f64) -> (f64, f64) {
        let w = self.width.max(1) as f64;
        let h = self.height.max(1) as f64;
        (px / w * 2.0 - 1.0, -(py / h) * 2.0 + 1.0)
    }

    /// Ray from the camera through a canvas pixel.
    pub fn ray_through(&self, px: f64, py: f64) -> Ray {
        let (nx, ny) = self.to_ndc(px, py);
        let dir = DVec3::new(nx * self.half_height * self.aspect(), ny * self.half_height, -1.0);
        Ray {
            origin: self.position,
            dir: dir.normalize(),
        }
    }

    /// Project a world point to canvas pixels. `None` behind the camera.
    pub fn project(&self, p: DVec3) -> Option<(f64, f64)> {
        let rel = p - self.position;
        let depth = -rel.z;
        if depth <= 1e-9 {
            return None;
        }
        let nx = rel.x / depth / (self.half_height * self.aspect());
        let ny = rel.y / depth / self.half_height;
        let px = (nx + 1.0) / 2.0 * self.width as f64;
        let py = (1.0 - ny) / 2.0 * self.height as f64;
        Some((px, py))
    }

    /// Screen radius in pixels of the silhouette of a sphere of `radius`
    /// centered at the origin.
    pub fn silhouette_radius(&self, radius: f64) -> f64 {
        let d = self.position.length();
        if radius >= d {
            return self.height as f64;
        }
        let angle = (radius / d).asin();
        angle.tan() / self.half_height * self.height as f64 / 2.0
    }

    /// Pixel size of a world-space length at the depth of `p`.
    pub fn pixels_at(&self, p: DVec3, length: f64) -> f64 {
        let depth = (self.position - p).z.max(1e-9);
        length / depth / self.half_height * self.height as f64 / 2.0
    }

    /// Whether a point on a sphere centered at the origin faces the camera.
    #[inline]
    pub fn faces(&self, p: DVec3) -> bool {
        p.dot(self.position - p) > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_center_pixel_ray_points_at_origin() {
        let cam = Camera::new(3.0, 45.0, 200, 100);
        let ray = cam.ray_through(100.0, 50.0);
        assert!((ray.dir - DVec3::NEG_Z).length() < EPS);
        assert!((ray.origin.z - 3.0).abs() < EPS);
    }

    #[test]
    fn test_project_then_ray_hits_point() {
        let cam = Camera::new(3.0, 45.0, 160, 120);
        let p = DVec3::new(0.4, -0.3, 0.8);
        let (px, py) = cam.project(p).unwrap();
        let ray = cam.ray_through(px, py);
        let to_p = (p - ray.origin).normalize();
        assert!((to_p - ray.dir).length() < 1e-9);
    }

    #[test]
    fn test_project_origin_is_center() {
        let cam = Camera::new(3.0, 45.0, 80, 40);
        let (px, py) = cam.project(DVec3::ZERO).unwrap();
        assert!((px - 40.0).abs() < EPS);
        assert!((py - 20.0).abs() < EPS);
    }

    #[test]
    fn test_behind_camera_not_projected() {
        let cam = Camera::new(3.0, 45.0, 80, 40);
        assert!(cam.project(DVec3::new(0.0, 0.0, 4.0)).is_none());
    }

    #[test]
    fn test_silhouette_fits_in_view() {
        let cam = Camera::new(3.0, 45.0, 100, 100);
        let r = cam.silhouette_radius(1.0);
        assert!(r > 30.0 && r < 50.0, "radius {r}");
        assert!(cam.silhouette_radius(1.05) > r);
    }

    #[test]
    fn test_faces_front_and_back() {
        let cam = Camera::new(3.0, 45.0, 100, 100);
        assert!(cam.faces(DVec3::Z));
        assert!(!cam.faces(DVec3::NEG_Z));
        // Limb from distance 3 is slightly in front of the z=0 plane
        assert!(!cam.faces(DVec3::X));
    }
}
