use std::time::Instant;

use super::animation::FlyTo;
use super::camera::{Camera, Ray};
use super::geometry::{latlon_to_local, target_orientation, Orientation};
use super::location::{visible_indices, Category, Location};
use super::pointer::{DragGesture, PointerSource, Release};
use super::scene::{MarkerGroup, Material, Mesh, Shape};
use super::texture::{Texture, TextureLoad, TextureRequest};
use crate::config::GlobeConfig;

/// Interactive globe showing office locations.
///
/// Owns the whole scene: camera, surface texture, the marker group and the
/// single orientation shared by sphere, atmosphere and markers. Rotation has
/// two writers, the drag handler and the fly-to ticker; both run on the UI
/// thread and the latest write wins.
pub struct GlobeWidget {
    config: GlobeConfig,
    locations: Vec<Location>,
    camera: Camera,
    orientation: Orientation,
    markers: MarkerGroup,
    texture: Option<Texture>,
    /// Set once the first texture load finished, successfully or not
    loaded: bool,
    texture_generation: u64,
    pending_texture: Option<TextureRequest>,
    dark_mode: bool,
    category: Category,
    search: String,
    /// Indices into `locations` of the current filter result
    visible: Vec<usize>,
    selected: Option<u32>,
    gesture: DragGesture,
    fly: FlyTo,
    mounted: bool,
}

impl GlobeWidget {
    /// Build the scene for a canvas of `width` x `height` pixels.
    ///
    /// Queues the first texture load; drain it with [`Self::take_texture_request`].
    pub fn new(locations: Vec<Location>, dark_mode: bool, config: GlobeConfig, width: usize, height: usize) -> Self {
        let camera = Camera::new(config.camera_distance, config.fov_y_deg, width, height);
        let mut widget = Self {
            config,
            locations,
            camera,
            orientation: Orientation::default(),
            markers: MarkerGroup::new(),
            texture: None,
            loaded: false,
            texture_generation: 0,
            pending_texture: None,
            dark_mode,
            category: Category::Sales,
            search: String::new(),
            visible: Vec::new(),
            selected: None,
            gesture: DragGesture::new(),
            fly: FlyTo::Idle,
            mounted: true,
        };
        widget.queue_texture();
        widget.rebuild_markers();
        log::info!(
            "globe mounted with {} locations ({}x{} px, dark={})",
            widget.locations.len(),
            width,
            height,
            dark_mode
        );
        widget
    }

    fn queue_texture(&mut self) {
        self.texture_generation += 1;
        self.pending_texture = Some(TextureRequest {
            generation: self.texture_generation,
            dark_mode: self.dark_mode,
            path: self.config.texture_path(self.dark_mode),
        });
    }

    /// Texture load the shell should start, if one is queued.
    pub fn take_texture_request(&mut self) -> Option<TextureRequest> {
        self.pending_texture.take()
    }

    /// Apply a finished load. Loads superseded by a newer request are dropped.
    /// A failed load is logged and replaced by fallback linework.
    pub fn apply_texture(&mut self, load: TextureLoad) {
        if !self.mounted {
            return;
        }
        if load.generation != self.texture_generation {
            log::debug!(
                "dropping stale texture load {} (current {})",
                load.generation,
                self.texture_generation
            );
            return;
        }
        match load.result {
            Ok(texture) => {
                log::info!("texture loaded: {} lines, {} vertices", texture.lines.len(), texture.vertex_count());
                self.texture = Some(texture);
            }
            Err(e) => {
                log::warn!("failed to load texture, using fallback: {e:#}");
                self.texture = Some(Texture::fallback());
            }
        }
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Discard every marker and recreate them for the current filter.
    pub fn rebuild_markers(&mut self) {
        let disposed = self.markers.dispose_all();

        self.visible = visible_indices(&self.locations, self.category, &self.search).collect();

        let material = Material {
            category: self.category,
            dark_mode: self.dark_mode,
        };
        for &idx in &self.visible {
            let loc = &self.locations[idx];
            let center = latlon_to_local(loc.lat, loc.lon, self.config.marker_radius);
            self.markers.add(Mesh {
                shape: Shape::Dot {
                    center,
                    radius: self.config.dot_radius,
                },
                material,
                location_id: loc.id,
            });
            self.markers.add(Mesh {
                shape: Shape::ring(center, self.config.ring_inner, self.config.ring_outer, self.config.ring_segments),
                material,
                location_id: loc.id,
            });
        }

        if let Some(sel) = self.selected() {
            if sel.category != self.category {
                log::debug!("clearing selection {} after switching to {:?}", sel.id, self.category);
                self.selected = None;
            }
        }

        log::debug!(
            "rebuilt markers: disposed {}, created {} for {:?} search={:?}",
            disposed,
            self.markers.live_count(),
            self.category,
            self.search
        );
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn set_category(&mut self, category: Category) {
        if category != self.category {
            self.category = category;
            self.rebuild_markers();
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: &str) {
        if search != self.search {
            self.search = search.to_string();
            self.rebuild_markers();
        }
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Switch palette: reload the texture and recolor markers in place.
    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        if dark_mode == self.dark_mode {
            return;
        }
        self.dark_mode = dark_mode;
        self.markers.set_dark_mode(dark_mode);
        self.queue_texture();
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Locations matching the active category and search, in source order
    pub fn visible_locations(&self) -> impl Iterator<Item = &Location> + '_ {
        self.visible.iter().map(move |&i| &self.locations[i])
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Location ids that currently have a marker, one per location
    pub fn marker_location_ids(&self) -> Vec<u32> {
        self.markers
            .iter()
            .filter(|(_, m)| matches!(m.shape, Shape::Dot { .. }))
            .map(|(_, m)| m.location_id)
            .collect()
    }

    pub fn markers(&self) -> &MarkerGroup {
        &self.markers
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.camera.set_size(width, height);
    }

    pub fn selected(&self) -> Option<&Location> {
        let id = self.selected?;
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Choose a location from the list panel. Same effect as clicking its
    /// marker: select and fly to it. Returns false if it is not visible.
    pub fn select_location(&mut self, id: u32, now: Instant) -> bool {
        let Some(loc) = self.visible_locations().find(|l| l.id == id) else {
            return false;
        };
        let (lat, lon) = (loc.lat, loc.lon);
        log::info!("selected {} ({})", loc.id, loc.city);
        self.selected = Some(id);
        self.rotate_to(lat, lon, now);
        true
    }

    /// Start (or restart) the fly-to animation from the current orientation.
    pub fn rotate_to(&mut self, lat: f64, lon: f64, now: Instant) {
        let target = target_orientation(lat, lon);
        self.fly.start(self.orientation, target, now, self.config.fly_duration);
    }

    pub fn is_animating(&self) -> bool {
        self.fly.is_active()
    }

    /// Advance the animation one frame. Returns true if rotation changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.fly.tick(now) {
            Some(o) => {
                self.orientation = o;
                true
            }
            None => false,
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, source: PointerSource) {
        log::trace!("{source:?} down at ({x:.1}, {y:.1})");
        self.gesture.press(x, y);
    }

    /// Drag rotation. A drag overrides any flight in progress.
    pub fn pointer_move(&mut self, x: f64, y: f64, _source: PointerSource) {
        let Some((dx, dy)) = self.gesture.motion(x, y, self.config.drag_threshold) else {
            return;
        };
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.fly.cancel();
        let s = self.config.drag_sensitivity;
        self.orientation.yaw += dx * s;
        self.orientation.pitch += dy * s;
    }

    /// End of a gesture. A release that never dragged is a click and picks
    /// the marker under the pointer. Returns the newly selected id.
    pub fn pointer_up(&mut self, x: f64, y: f64, source: PointerSource, now: Instant) -> Option<u32> {
        match self.gesture.release(x, y) {
            Release::Click { x, y } => {
                let id = self.hit_test(x, y)?;
                log::debug!("{source:?} click picked location {id}");
                self.select_location(id, now).then_some(id)
            }
            Release::DragEnd | Release::Ignored => None,
        }
    }

    pub fn pointer_leave(&mut self) {
        self.gesture.leave();
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// Location under a canvas pixel. Only markers are tested, the globe
    /// itself never occludes.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<u32> {
        let ray = self.camera.ray_through(x, y);
        // Markers live in globe space: undo the rotation on the ray
        let inv = self.orientation.matrix().transpose();
        let local = Ray {
            origin: inv * ray.origin,
            dir: inv * ray.dir,
        };
        let hit = self.markers.pick(&local)?;
        self.visible_locations()
            .find(|l| l.id == hit.location_id)
            .map(|l| l.id)
    }

    /// Screen position of a location's marker, if it is on screen side of
    /// the camera.
    pub fn marker_screen_pos(&self, id: u32) -> Option<(f64, f64)> {
        let loc = self.locations.iter().find(|l| l.id == id)?;
        let local = latlon_to_local(loc.lat, loc.lon, self.config.marker_radius);
        self.camera.project(self.orientation.matrix() * local)
    }

    /// Release every scene resource and stop the animation. Idempotent.
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.fly.cancel();
        self.gesture.leave();
        let disposed = self.markers.dispose_all();
        self.texture = None;
        self.pending_texture = None;
        self.mounted = false;
        log::info!("globe unmounted, released {disposed} marker meshes");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl Drop for GlobeWidget {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::time::Duration;

    const W: usize = 200;
    const H: usize = 200;

    fn loc(id: u32, lat: f64, lon: f64, category: Category) -> Location {
        Location {
            id,
            name: format!("Office {id}"),
            city: format!("City {id}"),
            lat,
            lon,
            description: String::new(),
            offices: 1,
            employees: 5,
            category,
        }
    }

    fn two_sites() -> Vec<Location> {
        vec![loc(1, 40.0, -74.0, Category::Sales), loc(2, 35.0, 139.0, Category::Technical)]
    }

    fn widget(locations: Vec<Location>) -> GlobeWidget {
        GlobeWidget::new(locations, false, GlobeConfig::default(), W, H)
    }

    fn click(w: &mut GlobeWidget, x: f64, y: f64, now: Instant) -> Option<u32> {
        w.pointer_down(x, y, PointerSource::Mouse);
        w.pointer_up(x, y, PointerSource::Mouse, now)
    }

    #[test]
    fn test_category_switch_swaps_markers() {
        let mut w = widget(two_sites());
        w.set_category(Category::Sales);
        assert_eq!(w.marker_location_ids(), vec![1]);

        w.set_category(Category::Technical);
        assert_eq!(w.marker_location_ids(), vec![2]);
        // dot + ring per location
        assert_eq!(w.markers().live_count(), 2);
    }

    #[test]
    fn test_switching_category_clears_selection() {
        let mut w = widget(two_sites());
        let now = Instant::now();
        assert!(w.select_location(1, now));
        assert_eq!(w.selected().map(|l| l.id), Some(1));

        w.set_category(Category::Technical);
        assert!(w.selected().is_none());
    }

    #[test]
    fn test_search_narrows_markers() {
        let mut locations = two_sites();
        locations.push(Location {
            city: "Boston".into(),
            ..loc(3, 42.0, -71.0, Category::Sales)
        });
        let mut w = widget(locations);
        assert_eq!(w.marker_location_ids(), vec![1, 3]);
        w.set_search("BOST");
        assert_eq!(w.marker_location_ids(), vec![3]);
        w.set_search("boston ");
        assert!(w.marker_location_ids().is_empty());
        w.set_search("  ");
        assert_eq!(w.marker_location_ids(), vec![1, 3]);
        w.set_search("nowhere");
        assert!(w.marker_location_ids().is_empty());
        assert_eq!(w.visible_count(), 0);
        w.set_search("");
        assert_eq!(w.marker_location_ids(), vec![1, 3]);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mut w = widget(two_sites());
        w.rebuild_markers();
        let first = (w.markers().live_count(), w.marker_location_ids());
        w.rebuild_markers();
        assert_eq!((w.markers().live_count(), w.marker_location_ids()), first);
    }

    #[test]
    fn test_repeated_rebuilds_do_not_grow_arena() {
        let mut w = widget(two_sites());
        for _ in 0..50 {
            w.set_category(Category::Technical);
            w.set_category(Category::Sales);
        }
        assert_eq!(w.markers().live_count(), 2);
        assert_eq!(w.markers().capacity(), 2);
    }

    #[test]
    fn test_click_on_marker_selects_it() {
        // lon -90 on the equator faces the unrotated camera
        let mut w = widget(vec![loc(5, 0.0, -90.0, Category::Sales)]);
        let (x, y) = w.marker_screen_pos(5).unwrap();
        assert!((x - W as f64 / 2.0).abs() < 1e-9 && (y - H as f64 / 2.0).abs() < 1e-9);

        let now = Instant::now();
        assert_eq!(click(&mut w, x, y, now), Some(5));
        assert_eq!(w.selected().map(|l| l.id), Some(5));
        assert!(w.is_animating());
    }

    #[test]
    fn test_drag_release_on_marker_does_not_pick() {
        let mut w = widget(vec![loc(5, 0.0, -90.0, Category::Sales)]);
        let (x, y) = w.marker_screen_pos(5).unwrap();

        w.pointer_down(x - 20.0, y, PointerSource::Mouse);
        w.pointer_move(x, y, PointerSource::Mouse);
        // Undo the rotation so the release lands on the marker again
        w.orientation = Orientation::default();
        assert_eq!(w.hit_test(x, y), Some(5));
        assert_eq!(w.pointer_up(x, y, PointerSource::Mouse, Instant::now()), None);
        assert!(w.selected().is_none());
    }

    #[test]
    fn test_cellwise_drag_ending_on_marker_does_not_pick() {
        let mut w = widget(vec![loc(5, 0.0, -90.0, Category::Sales)]);
        let (x, y) = w.marker_screen_pos(5).unwrap();

        // Terminal drags arrive one cell (2 dots) at a time
        w.pointer_down(x - 40.0, y, PointerSource::Mouse);
        for step in 1..=20 {
            w.pointer_move(x - 40.0 + step as f64 * 2.0, y, PointerSource::Mouse);
        }
        assert!(w.orientation().yaw.abs() > 0.5);
        w.orientation = Orientation::default();
        assert_eq!(w.pointer_up(x, y, PointerSource::Mouse, Instant::now()), None);
        assert!(w.selected().is_none());
        assert!(!w.is_animating());
    }

    #[test]
    fn test_touch_mirrors_mouse() {
        let mut w = widget(vec![loc(5, 0.0, -90.0, Category::Sales)]);
        let (x, y) = w.marker_screen_pos(5).unwrap();
        w.pointer_down(x, y, PointerSource::Touch);
        w.pointer_move(x + 1.0, y, PointerSource::Touch);
        w.pointer_move(x, y, PointerSource::Touch);
        w.orientation = Orientation::default();
        assert_eq!(w.pointer_up(x, y, PointerSource::Touch, Instant::now()), Some(5));
    }

    #[test]
    fn test_click_on_empty_space_changes_nothing() {
        let mut w = widget(vec![loc(5, 0.0, -90.0, Category::Sales)]);
        assert_eq!(click(&mut w, 5.0, 5.0, Instant::now()), None);
        assert!(w.selected().is_none());
        assert!(!w.is_animating());
    }

    #[test]
    fn test_hit_test_follows_rotation() {
        let mut w = widget(vec![loc(5, 0.0, -90.0, Category::Sales)]);
        w.orientation = Orientation::new(0.3, -0.2);
        let (x, y) = w.marker_screen_pos(5).unwrap();
        assert_eq!(w.hit_test(x, y), Some(5));
        assert_eq!(w.hit_test(W as f64 / 2.0, H as f64 / 2.0), None);
    }

    #[test]
    fn test_drag_rotates_by_sensitivity() {
        let mut w = widget(two_sites());
        let s = w.config().drag_sensitivity;
        w.pointer_down(10.0, 10.0, PointerSource::Mouse);
        w.pointer_move(20.0, 5.0, PointerSource::Mouse);
        let o = w.orientation();
        assert!((o.yaw - 10.0 * s).abs() < 1e-12);
        assert!((o.pitch + 5.0 * s).abs() < 1e-12);
    }

    #[test]
    fn test_fly_to_origin_lands_on_zero() {
        let mut w = widget(vec![loc(9, 0.0, 0.0, Category::Sales)]);
        w.orientation = Orientation::new(1.7, -0.4);
        let t0 = Instant::now();
        assert!(w.select_location(9, t0));
        w.tick(t0 + Duration::from_millis(700));
        assert!(w.orientation().yaw.abs() > 1e-3);
        w.tick(t0 + Duration::from_millis(1500));
        assert!(w.orientation().yaw.abs() < 1e-12);
        assert!(w.orientation().pitch.abs() < 1e-12);
        assert!(!w.is_animating());
    }

    #[test]
    fn test_drag_interrupts_flight() {
        let mut w = widget(vec![loc(9, 10.0, 20.0, Category::Sales)]);
        let t0 = Instant::now();
        w.select_location(9, t0);
        w.tick(t0 + Duration::from_millis(300));
        w.pointer_down(0.0, 0.0, PointerSource::Mouse);
        w.pointer_move(10.0, 0.0, PointerSource::Mouse);
        let after_drag = w.orientation();
        assert!(!w.tick(t0 + Duration::from_millis(600)));
        assert_eq!(w.orientation(), after_drag);
    }

    #[test]
    fn test_select_invisible_location_is_rejected() {
        let mut w = widget(two_sites());
        assert!(!w.select_location(2, Instant::now()));
        assert!(w.selected().is_none());
    }

    #[test]
    fn test_texture_failure_still_loads() {
        let mut w = widget(two_sites());
        let req = w.take_texture_request().unwrap();
        assert!(w.take_texture_request().is_none());
        assert!(!w.is_loaded());
        w.apply_texture(TextureLoad {
            generation: req.generation,
            result: Err(anyhow!("boom")),
        });
        assert!(w.is_loaded());
        assert!(w.texture().is_some());
    }

    #[test]
    fn test_dark_mode_recolors_and_reloads() {
        let mut w = widget(two_sites());
        let first = w.take_texture_request().unwrap();
        let before: Vec<_> = w.markers().iter().map(|(_, m)| m.shape.center()).collect();

        w.set_dark_mode(true);
        let second = w.take_texture_request().unwrap();
        assert!(second.dark_mode && second.generation > first.generation);
        assert!(w.markers().iter().all(|(_, m)| m.material.dark_mode));
        let after: Vec<_> = w.markers().iter().map(|(_, m)| m.shape.center()).collect();
        assert_eq!(before, after);

        // The light-mode load finishing late must not win
        w.apply_texture(TextureLoad {
            generation: first.generation,
            result: Ok(Texture::fallback()),
        });
        assert!(!w.is_loaded());
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut w = widget(two_sites());
        let t0 = Instant::now();
        w.select_location(1, t0);
        w.teardown();
        assert_eq!(w.markers().live_count(), 0);
        assert!(!w.is_animating());
        assert!(!w.tick(t0 + Duration::from_millis(100)));
        assert!(!w.is_mounted());
        // Second teardown is a no-op
        w.teardown();
    }
}
