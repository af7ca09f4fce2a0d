use crate::config::GlobeConfig;
use crate::globe::{Category, Location};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// One entry of a location file. The category comes from which file it is in.
#[derive(Deserialize)]
struct LocationRecord {
    id: u32,
    name: String,
    city: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    offices: u32,
    #[serde(default)]
    employees: u32,
}

impl LocationRecord {
    fn into_location(self, category: Category) -> Location {
        Location {
            id: self.id,
            name: self.name,
            city: self.city,
            lat: self.lat,
            lon: self.lon,
            description: self.description,
            offices: self.offices,
            employees: self.employees,
            category,
        }
    }
}

/// Load sales then technical locations from the data directory.
/// Falls back to the built-in set when neither file exists.
pub fn load_locations(config: &GlobeConfig) -> Result<Vec<Location>> {
    let files = [
        (config.sales_file, Category::Sales),
        (config.technical_file, Category::Technical),
    ];

    let mut locations = Vec::new();
    let mut found_any = false;
    for (filename, category) in files {
        let path = config.data_dir.join(filename);
        if !path.exists() {
            log::warn!("{} not found, no {:?} locations from disk", path.display(), category);
            continue;
        }
        found_any = true;
        locations.extend(load_location_file(&path, category)?);
    }

    if !found_any {
        log::info!("no location files in {}, using built-in set", config.data_dir.display());
        locations = builtin_locations();
    }

    validate(&locations)?;
    Ok(locations)
}

/// Parse one JSON array of location records
pub fn load_location_file(path: &Path, category: Category) -> Result<Vec<Location>> {
    let mut bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<LocationRecord> =
        simd_json::serde::from_slice(&mut bytes).with_context(|| format!("parsing {}", path.display()))?;
    log::debug!("loaded {} {:?} locations from {}", records.len(), category, path.display());
    Ok(records.into_iter().map(|r| r.into_location(category)).collect())
}

/// Ids must be unique across both categories. Out-of-range coordinates are
/// tolerated but reported.
fn validate(locations: &[Location]) -> Result<()> {
    let mut seen = HashSet::with_capacity(locations.len());
    for loc in locations {
        if !seen.insert(loc.id) {
            bail!("duplicate location id {} ({})", loc.id, loc.city);
        }
        if !(-90.0..=90.0).contains(&loc.lat) || !(-180.0..=180.0).contains(&loc.lon) {
            log::warn!(
                "location {} ({}) has out-of-range coordinates lat={} lon={}",
                loc.id,
                loc.city,
                loc.lat,
                loc.lon
            );
        }
    }
    Ok(())
}

/// Built-in office set for running without a data directory
pub fn builtin_locations() -> Vec<Location> {
    let site = |id, name: &str, city: &str, lat, lon, description: &str, offices, employees, category| Location {
        id,
        name: name.to_string(),
        city: city.to_string(),
        lat,
        lon,
        description: description.to_string(),
        offices,
        employees,
        category,
    };

    use Category::{Sales, Technical};
    vec![
        site(1, "Americas Headquarters", "New York", 40.7, -74.0, "Regional sales and key account management", 2, 85, Sales),
        site(2, "West Coast Sales", "San Jose", 37.3, -121.9, "Semiconductor and electronics accounts", 1, 32, Sales),
        site(3, "LATAM Sales", "São Paulo", -23.5, -46.6, "Distributor network for South America", 1, 18, Sales),
        site(4, "EMEA Sales", "Munich", 48.1, 11.6, "European direct sales and channel partners", 2, 64, Sales),
        site(5, "UK Sales", "London", 51.5, -0.1, "Defense and telecom accounts", 1, 27, Sales),
        site(6, "Middle East Sales", "Dubai", 25.2, 55.3, "Gulf region energy and utilities", 1, 15, Sales),
        site(7, "APAC Sales", "Singapore", 1.35, 103.8, "Southeast Asia sales hub", 1, 41, Sales),
        site(8, "Japan Sales", "Tokyo", 35.7, 139.7, "Automotive and consumer electronics", 2, 56, Sales),
        site(9, "ANZ Sales", "Sydney", -33.9, 151.2, "Mining and research institutions", 1, 12, Sales),
        site(101, "Calibration Center", "Boston", 42.4, -71.1, "Accredited calibration and repair", 1, 40, Technical),
        site(102, "Application Lab", "Austin", 30.3, -97.7, "Customer demos and application engineering", 1, 22, Technical),
        site(103, "European Service Center", "Berlin", 52.5, 13.4, "Repair, calibration and spare parts", 1, 48, Technical),
        site(104, "R&D Center", "Bangalore", 12.97, 77.6, "Firmware and software development", 2, 120, Technical),
        site(105, "Asia Service Center", "Shenzhen", 22.5, 114.1, "Field service and repair depot", 1, 36, Technical),
        site(106, "Technical Support", "Seoul", 37.6, 127.0, "Level 2 support and training", 1, 19, Technical),
    ]
}
