use anyhow::{bail, Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use geojson::{GeoJson, Geometry, Value};
use glam::DVec3;
use std::fs;
use std::path::{Path, PathBuf};

use super::geometry::latlon_to_local;

/// Globe surface linework, already lifted onto the unit sphere.
#[derive(Clone, Debug)]
pub struct Texture {
    pub lines: Vec<Vec<DVec3>>,
}

impl Texture {
    fn from_lonlat(lines: Vec<Vec<(f64, f64)>>) -> Self {
        let lines = lines
            .into_iter()
            .filter(|l| l.len() >= 2)
            .map(|l| l.into_iter().map(|(lon, lat)| latlon_to_local(lat, lon, 1.0)).collect())
            .collect();
        Self { lines }
    }

    /// Coarse continent outlines used when no texture file can be loaded
    pub fn fallback() -> Self {
        Self::from_lonlat(simple_world())
    }

    pub fn vertex_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }
}

/// Load coastline GeoJSON as a globe texture
pub fn load_texture(path: &Path) -> Result<Texture> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("parsing {}", path.display()))?;

    let mut lines = Vec::new();
    process_geojson_lines(&geojson, |line| lines.push(line));
    if lines.is_empty() {
        bail!("{} contains no line features", path.display());
    }
    Ok(Texture::from_lonlat(lines))
}

/// Walk every feature and hand each line (or polygon exterior) to `add_line`
fn process_geojson_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for geometry in fc.features.iter().filter_map(|f| f.geometry.as_ref()) {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => process_geometry_lines(geometry, &mut add_line),
    }
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    let to_line = |coords: &Vec<Vec<f64>>| -> Vec<(f64, f64)> {
        coords.iter().filter(|c| c.len() >= 2).map(|c| (c[0], c[1])).collect()
    };

    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => lines.iter().for_each(|l| add_line(to_line(l))),
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(to_line(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for exterior in polygons.iter().filter_map(|rings| rings.first()) {
                add_line(to_line(exterior));
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

/// A texture load asked for by the widget
#[derive(Clone, Debug, PartialEq)]
pub struct TextureRequest {
    pub generation: u64,
    pub dark_mode: bool,
    pub path: PathBuf,
}

/// A finished texture load, successful or not
#[derive(Debug)]
pub struct TextureLoad {
    pub generation: u64,
    pub result: Result<Texture>,
}

/// Fire-and-forget texture loading on the rayon pool. Results are collected
/// on the UI thread with `poll`.
pub struct TextureLoader {
    tx: Sender<TextureLoad>,
    rx: Receiver<TextureLoad>,
}

impl TextureLoader {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn request(&self, req: TextureRequest) {
        let tx = self.tx.clone();
        rayon::spawn(move || {
            let result = load_texture(&req.path);
            // Receiver gone means the shell shut down
            let _ = tx.send(TextureLoad {
                generation: req.generation,
                result,
            });
        });
    }

    /// Next finished load, if any. Never blocks.
    pub fn poll(&self) -> Option<TextureLoad> {
        self.rx.try_recv().ok()
    }
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Rough continent outlines as (lon, lat) rings
fn simple_world() -> Vec<Vec<(f64, f64)>> {
    vec![
        // North America
        vec![
            (-168.0, 65.0), (-141.0, 60.0), (-125.0, 48.0), (-117.0, 32.0),
            (-97.0, 25.0), (-82.0, 24.0), (-81.0, 31.0), (-70.0, 41.0),
            (-55.0, 47.0), (-64.0, 60.0), (-80.0, 63.0), (-110.0, 68.0),
            (-145.0, 70.0), (-168.0, 65.0),
        ],
        // South America
        vec![
            (-80.0, 10.0), (-60.0, 5.0), (-35.0, -5.0), (-40.0, -22.0),
            (-55.0, -34.0), (-68.0, -50.0), (-75.0, -52.0), (-72.0, -30.0),
            (-80.0, -5.0), (-80.0, 10.0),
        ],
        // Europe
        vec![
            (-10.0, 36.0), (5.0, 43.0), (20.0, 40.0), (30.0, 40.0),
            (40.0, 43.0), (40.0, 55.0), (25.0, 65.0), (10.0, 71.0),
            (5.0, 58.0), (-10.0, 52.0), (-10.0, 36.0),
        ],
        // Africa
        vec![
            (-17.0, 15.0), (-10.0, 5.0), (10.0, 5.0), (20.0, -5.0),
            (35.0, -20.0), (20.0, -35.0), (10.0, -15.0), (10.0, 0.0),
            (-17.0, 15.0), (-15.0, 28.0), (10.0, 37.0), (35.0, 30.0),
            (42.0, 12.0), (50.0, 12.0), (35.0, -5.0), (35.0, -20.0),
        ],
        // Asia
        vec![
            (40.0, 43.0), (55.0, 37.0), (70.0, 20.0), (80.0, 8.0),
            (92.0, 22.0), (105.0, 10.0), (120.0, 22.0), (130.0, 35.0),
            (140.0, 40.0), (145.0, 50.0), (135.0, 55.0), (120.0, 40.0),
            (90.0, 50.0), (60.0, 55.0), (40.0, 43.0),
        ],
        // Australia
        vec![
            (115.0, -20.0), (130.0, -12.0), (145.0, -15.0), (153.0, -30.0),
            (145.0, -38.0), (130.0, -32.0), (115.0, -35.0), (115.0, -20.0),
        ],
    ]
}
