use crate::map::{CountryShape, MapRenderer, Polygon, Ring};
use anyhow::{Context, Result};
use geojson::feature::Id;
use geojson::{Feature, GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Property keys that may carry the ISO alpha-3 code, in preference order.
/// Natural Earth writes "-99" into ISO_A3 for a few countries, which fails
/// validation and falls through to ADM0_A3.
const CODE_KEYS: [&str; 6] = ["ISO_A3", "iso_a3", "ISO_A3_EH", "iso_a3_eh", "ADM0_A3", "adm0_a3"];

const NAME_KEYS: [&str; 4] = ["NAME", "name", "ADMIN", "admin"];

/// Load country shapes from a GeoJSON file into the renderer.
/// Returns the number of shapes added.
pub fn load_countries(renderer: &mut MapRenderer, path: &Path) -> Result<usize> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read geography {}", path.display()))?;
    let shapes = parse_countries(&content)
        .with_context(|| format!("failed to parse geography {}", path.display()))?;

    let count = shapes.len();
    for shape in shapes {
        renderer.add_shape(shape);
    }
    info!(path = %path.display(), countries = count, "geography loaded");
    Ok(count)
}

/// Load the geography file, falling back to the built-in outline world when
/// it is missing, unreadable or empty
pub fn load_or_fallback(renderer: &mut MapRenderer, path: &Path) {
    if path.exists() {
        if let Err(e) = load_countries(renderer, path) {
            warn!(error = %format!("{e:#}"), "geography unavailable");
        }
    } else {
        warn!(path = %path.display(), "geography file not found");
    }

    if !renderer.has_data() {
        info!("using built-in simplified world");
        generate_simple_world(renderer);
    }
}

/// Parse a GeoJSON document into country shapes
pub fn parse_countries(text: &str) -> Result<Vec<CountryShape>> {
    // simd-json parses in place, so it gets its own copy of the bytes
    let mut bytes = text.as_bytes().to_vec();
    let geojson = match simd_json::serde::from_slice::<GeoJson>(&mut bytes) {
        Ok(geojson) => geojson,
        Err(err) => {
            debug!(error = %err, "simd-json rejected geography, retrying with geojson parser");
            text.parse::<GeoJson>()?
        }
    };

    let features: Vec<Feature> = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => Vec::new(),
    };

    let mut shapes = Vec::with_capacity(features.len());
    let mut skipped = 0usize;
    for feature in &features {
        let Some(code) = feature_code(feature) else {
            skipped += 1;
            continue;
        };
        let polygons = feature
            .geometry
            .as_ref()
            .map(geometry_polygons)
            .unwrap_or_default();

        match CountryShape::new(code, feature_name(feature), polygons) {
            Some(shape) => shapes.push(shape),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, "features without a country code or polygon geometry");
    }
    Ok(shapes)
}

fn is_alpha3(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Country code from the feature id or its properties
fn feature_code(feature: &Feature) -> Option<String> {
    if let Some(Id::String(id)) = &feature.id {
        if is_alpha3(id) {
            return Some(id.clone());
        }
    }

    CODE_KEYS
        .iter()
        .filter_map(|key| feature.property(key).and_then(|v| v.as_str()))
        .find(|code| is_alpha3(code))
        .map(str::to_string)
}

fn feature_name(feature: &Feature) -> Option<String> {
    NAME_KEYS
        .iter()
        .find_map(|key| feature.property(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// Polygons of a geometry; non-areal geometries contribute nothing
fn geometry_polygons(geometry: &Geometry) -> Vec<Polygon> {
    match &geometry.value {
        Value::Polygon(rings) => vec![convert_rings(rings)],
        Value::MultiPolygon(polygons) => polygons.iter().map(|rings| convert_rings(rings)).collect(),
        Value::GeometryCollection(geometries) => geometries.iter().flat_map(geometry_polygons).collect(),
        _ => Vec::new(),
    }
}

fn convert_rings(rings: &[Vec<Vec<f64>>]) -> Polygon {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .filter(|c| c.len() >= 2)
                .map(|c| (c[0], c[1]))
                .collect::<Ring>()
        })
        .collect()
}

/// Closed ring from an open vertex list
fn closed(points: &[(f64, f64)]) -> Ring {
    let mut ring = points.to_vec();
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last {
            ring.push(first);
        }
    }
    ring
}

/// Coarse outlines used when no geography file is available.
/// Covers every built-in catalog country plus some neutral neighbours.
pub fn generate_simple_world(renderer: &mut MapRenderer) {
    let countries: [(&str, &str, &[(f64, f64)]); 15] = [
        ("CAN", "Canada", &[
            (-141.0, 60.0), (-141.0, 69.6), (-120.0, 70.0), (-95.0, 72.0), (-80.0, 73.0),
            (-62.0, 66.0), (-55.0, 52.0), (-60.0, 46.0), (-67.0, 45.0), (-75.0, 45.0),
            (-83.0, 42.0), (-95.0, 49.0), (-123.0, 49.0), (-130.0, 55.0),
        ]),
        ("USA", "United States of America", &[
            (-123.0, 49.0), (-95.0, 49.0), (-83.0, 42.0), (-75.0, 45.0), (-67.0, 45.0),
            (-70.0, 41.0), (-76.0, 35.0), (-81.0, 31.0), (-80.0, 25.5), (-83.0, 29.0),
            (-90.0, 29.5), (-97.0, 26.0), (-106.0, 31.5), (-117.0, 32.5), (-124.0, 40.0),
        ]),
        ("MEX", "Mexico", &[
            (-117.0, 32.5), (-106.0, 31.5), (-97.0, 26.0), (-97.0, 21.0), (-94.0, 18.0),
            (-87.0, 21.5), (-88.0, 18.0), (-92.0, 14.5), (-100.0, 17.0), (-105.0, 20.0),
            (-110.0, 24.0), (-114.0, 30.0),
        ]),
        ("BRA", "Brazil", &[
            (-73.0, -7.0), (-70.0, -4.0), (-69.0, 1.0), (-60.0, 5.0), (-51.0, 4.0),
            (-35.0, -5.0), (-39.0, -13.0), (-41.0, -22.0), (-48.0, -26.0), (-53.0, -33.7),
            (-57.0, -30.0), (-54.0, -26.0), (-58.0, -20.0), (-62.0, -17.0), (-65.0, -10.0),
        ]),
        ("ARG", "Argentina", &[
            (-68.0, -22.0), (-62.0, -22.0), (-58.0, -24.0), (-54.0, -26.0), (-58.0, -34.0),
            (-57.0, -38.0), (-62.0, -39.0), (-65.0, -45.0), (-68.0, -52.0), (-72.0, -50.0),
            (-72.0, -42.0), (-70.0, -33.0),
        ]),
        ("GBR", "United Kingdom", &[
            (-5.7, 50.0), (1.5, 51.0), (1.7, 52.7), (-0.5, 54.0), (-3.0, 58.6),
            (-6.0, 58.0), (-5.0, 55.0), (-3.0, 54.0), (-5.0, 52.0),
        ]),
        ("FRA", "France", &[
            (-4.7, 48.5), (-1.5, 49.7), (2.5, 51.0), (4.0, 50.0), (6.0, 49.5),
            (8.2, 49.0), (7.6, 47.6), (6.0, 46.3), (7.5, 44.0), (3.0, 43.3),
            (-1.8, 43.4), (-1.2, 46.0),
        ]),
        ("ESP", "Spain", &[
            (-9.0, 43.0), (-1.8, 43.4), (3.0, 42.5), (0.0, 39.0), (-2.0, 36.7),
            (-6.0, 36.0), (-9.0, 37.0), (-8.8, 42.0),
        ]),
        ("DEU", "Germany", &[
            (6.0, 51.0), (6.0, 53.5), (9.0, 54.9), (14.0, 54.0), (14.8, 51.0),
            (12.0, 50.3), (13.8, 48.6), (13.0, 47.5), (7.6, 47.6), (8.2, 49.0),
        ]),
        ("RUS", "Russia", &[
            (28.0, 60.0), (30.0, 70.0), (60.0, 70.0), (80.0, 73.0), (105.0, 78.0),
            (140.0, 72.0), (179.9, 69.0), (179.9, 65.0), (160.0, 60.0), (142.0, 53.0),
            (135.0, 48.0), (127.0, 50.0), (119.0, 50.0), (87.0, 49.0), (80.0, 51.0),
            (60.0, 51.0), (45.0, 42.0), (38.0, 47.0), (32.0, 52.0), (28.0, 56.0),
        ]),
        ("CHN", "China", &[
            (74.0, 39.5), (80.0, 45.0), (87.0, 49.0), (97.0, 43.0), (111.0, 43.0),
            (119.0, 50.0), (127.0, 50.0), (135.0, 48.0), (131.0, 43.0), (122.0, 39.0),
            (122.0, 31.0), (119.0, 25.0), (110.0, 21.0), (108.0, 21.5), (101.0, 21.5),
            (97.0, 28.0), (92.0, 27.0), (88.0, 27.0), (81.0, 30.0), (78.0, 35.5),
        ]),
        ("IND", "India", &[
            (68.0, 23.5), (70.5, 28.0), (74.0, 32.5), (77.8, 35.5), (81.0, 30.0),
            (88.0, 27.0), (92.0, 27.0), (97.0, 28.0), (95.0, 25.0), (92.0, 22.0),
            (88.0, 21.5), (85.0, 19.5), (80.0, 15.5), (80.0, 10.0), (77.5, 8.0),
            (73.0, 16.0), (72.5, 21.0),
        ]),
        ("ZAF", "South Africa", &[
            (16.5, -28.5), (20.0, -25.0), (26.0, -24.0), (31.0, -22.0), (32.9, -26.8),
            (30.0, -31.0), (26.0, -34.0), (18.5, -34.3),
        ]),
        ("EGY", "Egypt", &[
            (25.0, 31.5), (34.0, 31.3), (35.0, 28.0), (34.0, 27.0), (37.0, 22.0),
            (25.0, 22.0),
        ]),
        ("AUS", "Australia", &[
            (114.0, -22.0), (122.0, -18.0), (130.0, -12.0), (136.0, -12.0), (137.0, -16.0),
            (142.0, -11.0), (146.0, -19.0), (153.0, -25.0), (151.0, -34.0), (146.0, -39.0),
            (140.0, -38.0), (135.0, -35.0), (129.0, -31.5), (115.0, -34.0),
        ]),
    ];

    for (code, name, outline) in countries {
        if let Some(shape) = CountryShape::new(code, Some(name.to_string()), vec![vec![closed(outline)]]) {
            renderer.add_shape(shape);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "CAN",
                "properties": { "name": "Canada" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-140, 50], [-60, 50], [-60, 70], [-140, 70], [-140, 50]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ADMIN": "France", "ISO_A3": "-99", "ADM0_A3": "FRA" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-5, 42], [8, 42], [8, 51], [-5, 51], [-5, 42]]],
                        [[[8.5, 41.3], [9.6, 41.3], [9.6, 43], [8.5, 43], [8.5, 41.3]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "India", "ISO_A3": "IND" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[68, 8], [97, 8], [97, 35], [68, 35], [68, 8]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Nowhere" },
                "geometry": { "type": "Point", "coordinates": [0, 0] }
            },
            {
                "type": "Feature",
                "id": "XYZ",
                "properties": {},
                "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] }
            }
        ]
    }"#;

    #[test]
    fn test_parse_countries() {
        let shapes = parse_countries(SAMPLE).unwrap();
        let codes: Vec<&str> = shapes.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, ["CAN", "FRA", "IND"]);

        assert_eq!(shapes[0].name.as_deref(), Some("Canada"));
        assert_eq!(shapes[1].name.as_deref(), Some("France"));
        assert_eq!(shapes[1].polygons.len(), 2);
        assert!(shapes[2].contains(80.0, 20.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_countries("not json").is_err());
        assert!(parse_countries(r#"{"type": "Nope"}"#).is_err());
    }

    #[test]
    fn test_bare_geometry_has_no_countries() {
        let text = r#"{"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}"#;
        assert!(parse_countries(text).unwrap().is_empty());
    }

    #[test]
    fn test_simple_world_covers_catalog() {
        let mut renderer = MapRenderer::new();
        generate_simple_world(&mut renderer);

        for (code, lon, lat) in [
            ("CAN", -100.0, 60.0),
            ("DEU", 10.0, 51.0),
            ("IND", 78.0, 22.0),
            ("BRA", -50.0, -10.0),
            ("AUS", 134.0, -25.0),
            ("FRA", 2.0, 46.5),
        ] {
            let idx = renderer.shape_at(lon, lat).unwrap_or_else(|| panic!("{code} not hit"));
            assert_eq!(renderer.shape(idx).unwrap().code, code);
        }
        assert_eq!(renderer.shape_at(-30.0, 0.0), None);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let mut renderer = MapRenderer::new();
        load_or_fallback(&mut renderer, Path::new("does/not/exist.json"));
        assert!(renderer.has_data());
    }
}
