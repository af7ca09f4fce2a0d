use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command line arguments for the terminal shell
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Browse office locations on an interactive terminal globe")]
pub struct Args {
    /// Directory holding location files and coastline textures
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Start in dark display mode
    #[arg(long)]
    pub dark: bool,

    /// Log file (the terminal itself is owned by the UI)
    #[arg(long, default_value = "office-globe.log")]
    pub log_file: PathBuf,

    /// Radians of rotation per Braille pixel of drag
    #[arg(long)]
    pub sensitivity: Option<f64>,
}

/// Every tunable constant of the globe widget.
///
/// Scene units: the globe is a unit sphere at the origin, the camera sits on
/// +Z looking back at it.
#[derive(Clone, Debug)]
pub struct GlobeConfig {
    pub globe_radius: f64,
    pub atmosphere_radius: f64,
    /// Markers float slightly above the surface
    pub marker_radius: f64,
    pub dot_radius: f64,
    pub ring_inner: f64,
    pub ring_outer: f64,
    pub ring_segments: usize,
    pub camera_distance: f64,
    /// Vertical field of view in degrees
    pub fov_y_deg: f64,
    /// Pixels a single move must exceed before a gesture counts as a drag
    pub drag_threshold: f64,
    /// Radians per pixel
    pub drag_sensitivity: f64,
    pub fly_duration: Duration,
    pub data_dir: PathBuf,
    pub sales_file: &'static str,
    pub technical_file: &'static str,
    pub texture_light: &'static str,
    pub texture_dark: &'static str,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            globe_radius: 1.0,
            atmosphere_radius: 1.05,
            marker_radius: 1.02,
            dot_radius: 0.03,
            ring_inner: 0.035,
            ring_outer: 0.045,
            ring_segments: 32,
            camera_distance: 3.0,
            fov_y_deg: 45.0,
            drag_threshold: 2.0,
            // Braille pixels are coarser than screen pixels, so this is
            // larger than a browser's 0.005
            drag_sensitivity: 0.02,
            fly_duration: Duration::from_millis(1500),
            data_dir: PathBuf::from("data"),
            sales_file: "sales_locations.json",
            technical_file: "technical_locations.json",
            texture_light: "ne_110m_coastline.json",
            texture_dark: "ne_50m_coastline.json",
        }
    }
}

impl GlobeConfig {
    /// Apply command line overrides on top of the defaults
    pub fn from_args(args: &Args) -> Self {
        let mut config = Self {
            data_dir: args.data_dir.clone(),
            ..Self::default()
        };
        if let Some(s) = args.sensitivity {
            config.drag_sensitivity = s;
        }
        config
    }

    /// Texture file for the given display mode
    pub fn texture_path(&self, dark_mode: bool) -> PathBuf {
        let name = if dark_mode { self.texture_dark } else { self.texture_light };
        self.data_dir.join(name)
    }
}
