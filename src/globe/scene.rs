use glam::DVec3;

use super::camera::Ray;
use super::geometry::tangent_basis;
use super::location::Category;

/// Handle into the scene's mesh arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(u32);

/// Marker primitive shapes.
#[derive(Clone, Debug)]
pub enum Shape {
    /// Small sphere at `center`
    Dot { center: DVec3, radius: f64 },
    /// Flat annulus at `center` facing the globe center. `outline` holds the
    /// outer edge vertices, precomputed once per marker.
    Ring {
        center: DVec3,
        inner: f64,
        outer: f64,
        outline: Vec<DVec3>,
    },
}

impl Shape {
    pub fn center(&self) -> DVec3 {
        match self {
            Shape::Dot { center, .. } | Shape::Ring { center, .. } => *center,
        }
    }

    /// Build a ring centered at `center` facing the origin.
    pub fn ring(center: DVec3, inner: f64, outer: f64, segments: usize) -> Self {
        let (u, v) = tangent_basis(center);
        let segments = segments.max(3);
        let outline = (0..segments)
            .map(|i| {
                let a = i as f64 / segments as f64 * std::f64::consts::TAU;
                center + (u * a.cos() + v * a.sin()) * outer
            })
            .collect();
        Shape::Ring {
            center,
            inner,
            outer,
            outline,
        }
    }

    /// Distance along the ray to the first intersection, in local space.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        match self {
            Shape::Dot { center, radius } => ray_sphere(ray, *center, *radius),
            Shape::Ring {
                center, inner, outer, ..
            } => {
                let normal = center.normalize();
                let denom = ray.dir.dot(normal);
                if denom.abs() < 1e-12 {
                    return None;
                }
                let t = (*center - ray.origin).dot(normal) / denom;
                if t < 0.0 {
                    return None;
                }
                let r = (ray.at(t) - *center).length();
                (r >= *inner && r <= *outer).then_some(t)
            }
        }
    }
}

/// Nearest non-negative hit of a ray on a sphere.
fn ray_sphere(ray: &Ray, center: DVec3, radius: f64) -> Option<f64> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t0 = -b - sq;
    let t1 = -b + sq;
    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        Some(t1)
    } else {
        None
    }
}

/// Marker material. Colors are derived from category and display mode at
/// draw time, so recoloring never touches geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub category: Category,
    pub dark_mode: bool,
}

/// A marker primitive tagged with the location it represents.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub shape: Shape,
    pub material: Material,
    pub location_id: u32,
}

/// A nearest-hit result from a pick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub mesh: MeshId,
    pub location_id: u32,
    pub distance: f64,
}

/// Arena of marker meshes. Slots are released eagerly through `dispose_all`;
/// nothing is reclaimed implicitly.
#[derive(Default)]
pub struct MarkerGroup {
    slots: Vec<Option<Mesh>>,
    free: Vec<u32>,
    /// Insertion order of live meshes
    order: Vec<MeshId>,
}

impl MarkerGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mesh: Mesh) -> MeshId {
        let id = match self.free.pop() {
            Some(idx) => {
                self.slots[idx as usize] = Some(mesh);
                MeshId(idx)
            }
            None => {
                self.slots.push(Some(mesh));
                MeshId(self.slots.len() as u32 - 1)
            }
        };
        self.order.push(id);
        id
    }

    fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Release every mesh, returning how many were live.
    pub fn dispose_all(&mut self) -> usize {
        let n = self.order.len();
        for id in std::mem::take(&mut self.order) {
            if let Some(slot) = self.slots.get_mut(id.0 as usize) {
                *slot = None;
                self.free.push(id.0);
            }
        }
        n
    }

    pub fn live_count(&self) -> usize {
        self.order.len()
    }

    /// Arena capacity; stays bounded across rebuilds because slots are reused.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &Mesh)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.get(*id).map(|m| (*id, m)))
    }

    /// Recolor in place; positions are untouched.
    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        for mesh in self.slots.iter_mut().flatten() {
            mesh.material.dark_mode = dark_mode;
        }
    }

    /// Nearest mesh hit by a ray given in the group's local space.
    pub fn pick(&self, ray: &Ray) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        for (id, mesh) in self.iter() {
            let Some(t) = mesh.shape.intersect(ray) else {
                continue;
            };
            if best.map_or(true, |b| t < b.distance) {
                best = Some(Hit {
                    mesh: id,
                    location_id: mesh.location_id,
                    distance: t,
                });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material() -> Material {
        Material {
            category: Category::Sales,
            dark_mode: false,
        }
    }

    fn dot(center: DVec3, location_id: u32) -> Mesh {
        Mesh {
            shape: Shape::Dot { center, radius: 0.03 },
            material: material(),
            location_id,
        }
    }

    fn ray_down_z() -> Ray {
        Ray {
            origin: DVec3::new(0.0, 0.0, 3.0),
            dir: DVec3::NEG_Z,
        }
    }

    #[test]
    fn test_pick_nearest_dot() {
        let mut group = MarkerGroup::new();
        group.add(dot(DVec3::new(0.0, 0.0, -1.02), 7));
        group.add(dot(DVec3::new(0.0, 0.0, 1.02), 9));
        let hit = group.pick(&ray_down_z()).unwrap();
        assert_eq!(hit.location_id, 9);
        assert!((hit.distance - (3.0 - 1.02 - 0.03)).abs() < 1e-9);
    }

    #[test]
    fn test_pick_miss_returns_none() {
        let mut group = MarkerGroup::new();
        group.add(dot(DVec3::new(0.5, 0.5, 0.7), 1));
        assert!(group.pick(&ray_down_z()).is_none());
    }

    #[test]
    fn test_ring_hit_only_inside_annulus() {
        let center = DVec3::new(0.0, 0.0, 1.02);
        let ring = Shape::ring(center, 0.035, 0.045, 32);
        // Through the hole
        assert!(ring.intersect(&ray_down_z()).is_none());
        // Through the band
        let ray = Ray {
            origin: DVec3::new(0.04, 0.0, 3.0),
            dir: DVec3::NEG_Z,
        };
        let t = ring.intersect(&ray).unwrap();
        assert!((t - (3.0 - 1.02)).abs() < 1e-9);
        // Outside
        let ray = Ray {
            origin: DVec3::new(0.06, 0.0, 3.0),
            dir: DVec3::NEG_Z,
        };
        assert!(ring.intersect(&ray).is_none());
    }

    #[test]
    fn test_ring_outline_lies_on_outer_edge() {
        let center = DVec3::new(0.3, 0.8, 0.5).normalize() * 1.02;
        if let Shape::Ring { outline, .. } = Shape::ring(center, 0.035, 0.045, 32) {
            assert_eq!(outline.len(), 32);
            for p in outline {
                assert!(((p - center).length() - 0.045).abs() < 1e-9);
                assert!((p - center).dot(center).abs() < 1e-9);
            }
        } else {
            panic!("expected ring");
        }
    }

    #[test]
    fn test_dispose_reuses_slots() {
        let mut group = MarkerGroup::new();
        for round in 0..10 {
            group.dispose_all();
            for i in 0..5 {
                group.add(dot(DVec3::X * 1.02, round * 10 + i));
            }
        }
        assert_eq!(group.live_count(), 5);
        assert_eq!(group.capacity(), 5);
    }

    #[test]
    fn test_set_dark_mode_keeps_positions() {
        let mut group = MarkerGroup::new();
        let id = group.add(dot(DVec3::new(0.1, 0.2, 0.9), 1));
        group.set_dark_mode(true);
        let mesh = group.get(id).unwrap();
        assert!(mesh.material.dark_mode);
        assert_eq!(mesh.shape.center(), DVec3::new(0.1, 0.2, 0.9));
    }
}
