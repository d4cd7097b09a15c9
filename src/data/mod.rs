use anyhow::Result;
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;

use crate::geo::GeoPoint;
use crate::map::LineString;

/// Load coastline GeoJSON from a data directory, most detailed file first.
/// Files that are missing or fail to parse are skipped with a warning;
/// an empty result means the caller should fall back to `simple_world`.
pub fn load_coastlines(data_dir: &Path) -> Result<Vec<LineString>> {
    let coastline_files = [
        "ne_50m_coastline.json",
        "ne_110m_coastline.json",
        "natural-earth.json",
    ];

    let mut lines = Vec::new();
    for filename in coastline_files {
        let path = data_dir.join(filename);
        if !path.exists() {
            continue;
        }
        match load_file(&path) {
            Ok(mut loaded) => {
                lines.append(&mut loaded);
                break; // one resolution is enough for an underlay
            }
            Err(e) => eprintln!("Warning: Failed to load {}: {}", filename, e),
        }
    }
    Ok(lines)
}

fn load_file(path: &Path) -> Result<Vec<LineString>> {
    let content = fs::read_to_string(path)?;
    let geojson: GeoJson = content.parse()?;
    let mut lines = Vec::new();
    process_geojson_lines(&geojson, |line| lines.push(line));
    Ok(lines)
}

/// Walk a GeoJSON document and extract line features.
fn process_geojson_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(LineString),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_lines(geometry, &mut add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => {
            process_geometry_lines(geometry, &mut add_line);
        }
    }
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(LineString),
{
    // GeoJSON positions are [lon, lat].
    let to_line = |coords: &Vec<Vec<f64>>| -> LineString {
        coords.iter().map(|c| GeoPoint::new(c[1], c[0])).collect()
    };

    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(to_line(coords));
            }
        }
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(to_line(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_line(to_line(exterior));
                }
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

/// Simplified continent outlines for when no data file is available.
pub fn simple_world() -> Vec<LineString> {
    let outlines: [&[(f64, f64)]; 5] = [
        // North America
        &[
            (65.0, -168.0), (60.0, -166.0), (60.0, -141.0), (55.0, -130.0),
            (48.0, -125.0), (40.0, -124.0), (32.0, -117.0), (25.0, -110.0),
            (25.0, -97.0), (24.0, -82.0), (31.0, -81.0), (35.0, -75.0),
            (45.0, -67.0), (47.0, -52.0), (55.0, -58.0), (60.0, -64.0),
            (63.0, -80.0), (62.0, -95.0), (68.0, -110.0), (70.0, -130.0),
            (70.0, -145.0), (65.0, -168.0),
        ],
        // South America
        &[
            (10.0, -80.0), (5.0, -75.0), (5.0, -60.0), (0.0, -50.0),
            (-5.0, -35.0), (-15.0, -38.0), (-22.0, -40.0), (-34.0, -55.0),
            (-42.0, -65.0), (-52.0, -75.0), (-45.0, -75.0), (-30.0, -72.0),
            (-15.0, -70.0), (-5.0, -80.0), (10.0, -80.0),
        ],
        // Africa
        &[
            (15.0, -17.0), (5.0, -10.0), (5.0, 10.0), (-5.0, 20.0),
            (-20.0, 35.0), (-30.0, 30.0), (-35.0, 20.0), (-30.0, 15.0),
            (-15.0, 10.0), (5.0, 5.0), (10.0, -10.0), (20.0, -17.0),
            (28.0, -15.0), (35.0, -5.0), (37.0, 10.0), (32.0, 25.0),
            (30.0, 35.0), (20.0, 35.0), (12.0, 42.0), (5.0, 45.0),
            (-5.0, 35.0), (15.0, -17.0),
        ],
        // Eurasia
        &[
            (36.0, -10.0), (38.0, 0.0), (44.0, 10.0), (40.0, 20.0),
            (42.0, 30.0), (43.0, 40.0), (37.0, 55.0), (25.0, 60.0),
            (20.0, 70.0), (8.0, 80.0), (22.0, 88.0), (16.0, 95.0),
            (10.0, 105.0), (22.0, 115.0), (30.0, 125.0), (40.0, 140.0),
            (50.0, 145.0), (55.0, 140.0), (52.0, 130.0), (45.0, 110.0),
            (50.0, 90.0), (55.0, 70.0), (50.0, 50.0), (55.0, 40.0),
            (65.0, 25.0), (70.0, 20.0), (71.0, 10.0), (58.0, 5.0),
            (52.0, -10.0), (48.0, -5.0), (36.0, -10.0),
        ],
        // Australia
        &[
            (-20.0, 115.0), (-12.0, 130.0), (-12.0, 140.0), (-15.0, 145.0),
            (-25.0, 150.0), (-30.0, 153.0), (-38.0, 145.0), (-35.0, 135.0),
            (-32.0, 125.0), (-35.0, 115.0), (-20.0, 115.0),
        ],
    ];

    outlines
        .iter()
        .map(|pts| pts.iter().map(|&(lat, lon)| GeoPoint::new(lat, lon)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_world_outlines_are_closed() {
        let world = simple_world();
        assert_eq!(world.len(), 5);
        for line in &world {
            assert!(line.len() >= 4);
            assert_eq!(line.first(), line.last());
            for p in line {
                assert!(p.lat.abs() <= 90.0 && p.lon.abs() <= 180.0);
            }
        }
    }

    #[test]
    fn test_geojson_linestring_parses_lon_lat_order() {
        let geojson: GeoJson = r#"{
            "type": "LineString",
            "coordinates": [[-70.0, 40.0], [-60.0, 45.0]]
        }"#
        .parse()
        .unwrap();
        let mut lines = Vec::new();
        process_geojson_lines(&geojson, |line| lines.push(line));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0][0], GeoPoint::new(40.0, -70.0));
        assert_eq!(lines[0][1], GeoPoint::new(45.0, -60.0));
    }

    #[test]
    fn test_geojson_polygon_takes_exterior_ring() {
        let geojson: GeoJson = r#"{
            "type": "Polygon",
            "coordinates": [
                [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]],
                [[0.2, 0.2], [0.8, 0.2], [0.8, 0.8], [0.2, 0.2]]
            ]
        }"#
        .parse()
        .unwrap();
        let mut lines = Vec::new();
        process_geojson_lines(&geojson, |line| lines.push(line));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 4);
    }

    #[test]
    fn test_missing_data_dir_yields_empty() {
        let lines = load_coastlines(Path::new("definitely/not/here")).unwrap();
        assert!(lines.is_empty());
    }
}
