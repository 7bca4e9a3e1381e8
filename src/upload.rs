//! Bulk-upload file validation.
//!
//! Accepts either a plain JSON array of tree objects or a GeoJSON
//! FeatureCollection of Point features. Validation is exhaustive: every
//! failed check on a record produces its own message, so one upload
//! attempt reports every problem at once. The user-facing messages keep
//! the Dutch wording of the inventory application.
//!
//! Checks run on `serde_json::Value` rather than typed structs so that a
//! record failing several checks is reported per field instead of dying
//! on the first serde error.

use std::path::Path;

use serde_json::Value;

use crate::models::NewTree;

/// Declared format of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    /// Plain JSON array of `{name, description, position: [lat, lon]}`
    Json,
    /// GeoJSON FeatureCollection of Point features with `properties.tree_id`
    GeoJson,
}

impl std::str::FromStr for UploadFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "geojson" => Ok(Self::GeoJson),
            _ => Err(format!("unknown upload format: {s} (expected: json, geojson)")),
        }
    }
}

impl UploadFormat {
    /// Guess the format from a file extension (`.geojson` vs `.json`).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "geojson" => Some(Self::GeoJson),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Partition of an uploaded file into valid records and error messages.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub valid: Vec<NewTree>,
    pub errors: Vec<String>,
}

impl UploadReport {
    /// True when the file can be persisted: no errors and something to add.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && !self.valid.is_empty()
    }

    fn parse_failure(message: &str) -> Self {
        Self {
            valid: Vec::new(),
            errors: vec![message.to_string()],
        }
    }
}

/// Validate an uploaded file in the declared format.
#[must_use]
pub fn validate(content: &str, format: UploadFormat) -> UploadReport {
    match format {
        UploadFormat::Json => validate_json(content),
        UploadFormat::GeoJson => validate_geojson(content),
    }
}

/// Validate a plain JSON array of tree objects.
///
/// Each element needs a non-empty `name`, a `position` array of exactly
/// two numbers (`[lat, lon]`) and a non-empty `description`.
#[must_use]
pub fn validate_json(content: &str) -> UploadReport {
    let Ok(root) = serde_json::from_str::<Value>(content) else {
        return UploadReport::parse_failure("Fout bij het lezen van het JSON-bestand.");
    };

    let Some(items) = root.as_array() else {
        return UploadReport::parse_failure("Ongeldig JSON-bestand. Verwacht een lijst met bomen.");
    };

    let mut report = UploadReport::default();

    for (index, item) in items.iter().enumerate() {
        let mut item_errors = Vec::new();

        let name = item.get("name").and_then(Value::as_str).unwrap_or("");
        if name.is_empty() {
            item_errors.push(format!("Boom {index}: Naam ontbreekt."));
        }

        let position = item.get("position").and_then(point_coordinates);
        if position.is_none() {
            item_errors.push(format!("Boom {index}: Positie is ongeldig."));
        }

        let description = item.get("description").and_then(Value::as_str).unwrap_or("");
        if description.is_empty() {
            item_errors.push(format!("Boom {index}: Beschrijving ontbreekt."));
        }

        if let Some((lat, lon)) = position {
            if item_errors.is_empty() {
                report.valid.push(NewTree {
                    name: name.to_string(),
                    description: description.to_string(),
                    latitude: lat,
                    longitude: lon,
                });
            }
        }

        report.errors.append(&mut item_errors);
    }

    report
}

/// Validate a GeoJSON FeatureCollection of Point features.
///
/// Coordinates are taken in source array order; no axis swap is applied.
#[must_use]
pub fn validate_geojson(content: &str) -> UploadReport {
    let Ok(root) = serde_json::from_str::<Value>(content) else {
        return UploadReport::parse_failure("Fout bij het verwerken van het GeoJSON-bestand.");
    };

    if root.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return UploadReport::parse_failure("Ongeldig GeoJSON-bestand. Verwachte 'FeatureCollection'.");
    }
    let Some(features) = root.get("features").and_then(Value::as_array) else {
        return UploadReport::parse_failure("Ongeldig GeoJSON-bestand. Verwachte 'FeatureCollection'.");
    };

    let mut report = UploadReport::default();

    for (index, feature) in features.iter().enumerate() {
        let mut feature_errors = Vec::new();

        let geometry = feature.get("geometry");
        let geometry_type = geometry
            .and_then(|g| g.get("type"))
            .and_then(Value::as_str);
        if geometry_type != Some("Point") {
            feature_errors.push(format!(
                "Feature {index}: Ongeldige geometrie. Verwachte type 'Point'."
            ));
        }

        let coordinates = geometry
            .and_then(|g| g.get("coordinates"))
            .and_then(point_coordinates);
        if coordinates.is_none() {
            feature_errors.push(format!("Feature {index}: Coördinaten zijn ongeldig."));
        }

        let tree_id = feature
            .get("properties")
            .and_then(|p| p.get("tree_id"))
            .filter(|v| !v.is_null());
        if tree_id.is_none() {
            feature_errors.push(format!("Feature {index}: 'tree_id' ontbreekt in properties."));
        }

        if feature_errors.is_empty() {
            if let (Some((first, second)), Some(id)) = (coordinates, tree_id) {
                report.valid.push(NewTree {
                    name: format!("Tree {}", tree_id_label(id)),
                    description: "N.v.t".to_string(),
                    latitude: first,
                    longitude: second,
                });
            }
        }

        report.errors.append(&mut feature_errors);
    }

    report
}

/// Extract a pair of numbers from a 2-element JSON array.
fn point_coordinates(value: &Value) -> Option<(f64, f64)> {
    let array = value.as_array()?;
    if array.len() != 2 {
        return None;
    }
    Some((array[0].as_f64()?, array[1].as_f64()?))
}

/// Render a `tree_id` property for the generated tree name.
fn tree_id_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<UploadFormat>().unwrap(), UploadFormat::Json);
        assert_eq!("GeoJSON".parse::<UploadFormat>().unwrap(), UploadFormat::GeoJson);
        assert!("csv".parse::<UploadFormat>().is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            UploadFormat::from_path(Path::new("bomen.geojson")),
            Some(UploadFormat::GeoJson)
        );
        assert_eq!(
            UploadFormat::from_path(Path::new("bomen.json")),
            Some(UploadFormat::Json)
        );
        assert_eq!(UploadFormat::from_path(Path::new("bomen.txt")), None);
    }

    #[test]
    fn test_json_valid_record_passes_through() {
        let report = validate_json(r#"[{"name":"Oak","position":[50,4],"description":"d"}]"#);

        assert!(report.errors.is_empty());
        assert_eq!(report.valid.len(), 1);
        let tree = &report.valid[0];
        assert_eq!(tree.name, "Oak");
        assert_eq!(tree.description, "d");
        assert!((tree.latitude - 50.0).abs() < 1e-9);
        assert!((tree.longitude - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_json_missing_name_reported_and_excluded() {
        let report = validate_json(r#"[{"position":[50,4],"description":"d"}]"#);

        assert_eq!(report.errors, vec!["Boom 0: Naam ontbreekt.".to_string()]);
        assert!(report.valid.is_empty());
    }

    #[test]
    fn test_json_one_message_per_failed_check() {
        let report = validate_json(r#"[{"name":"","position":[50],"description":""}]"#);

        assert_eq!(
            report.errors,
            vec![
                "Boom 0: Naam ontbreekt.".to_string(),
                "Boom 0: Positie is ongeldig.".to_string(),
                "Boom 0: Beschrijving ontbreekt.".to_string(),
            ]
        );
        assert!(report.valid.is_empty());
    }

    #[test]
    fn test_json_index_follows_input_position() {
        let report = validate_json(
            r#"[{"name":"Oak","position":[50,4],"description":"d"},
                {"name":"Pine","position":"no","description":"d"}]"#,
        );

        assert_eq!(report.errors, vec!["Boom 1: Positie is ongeldig.".to_string()]);
        assert_eq!(report.valid.len(), 1);
        assert_eq!(report.valid[0].name, "Oak");
    }

    #[test]
    fn test_json_unparseable_input_single_error() {
        let report = validate_json("not json at all");

        assert_eq!(
            report.errors,
            vec!["Fout bij het lezen van het JSON-bestand.".to_string()]
        );
        assert!(report.valid.is_empty());
    }

    #[test]
    fn test_json_non_array_top_level_reported() {
        let report = validate_json(r#"{"name":"Oak"}"#);

        assert_eq!(
            report.errors,
            vec!["Ongeldig JSON-bestand. Verwacht een lijst met bomen.".to_string()]
        );
        assert!(report.valid.is_empty());
    }

    #[test]
    fn test_geojson_sample_file() {
        let content = include_str!("../tools/sample_trees.geojson");
        let report = validate_geojson(content);

        assert!(report.errors.is_empty());
        assert_eq!(report.valid.len(), 2);
        assert_eq!(report.valid[0].name, "Tree Tree A");
        assert_eq!(report.valid[0].description, "N.v.t");
        // Coordinate order preserved exactly as received
        assert!((report.valid[0].latitude - 5.352692).abs() < 1e-9);
        assert!((report.valid[0].longitude - 50.95306).abs() < 1e-9);
    }

    #[test]
    fn test_json_sample_file() {
        let content = include_str!("../tools/sample_trees.json");
        let report = validate_json(content);

        assert!(report.errors.is_empty());
        assert_eq!(report.valid.len(), 3);
        assert!(report.is_ok());
    }

    #[test]
    fn test_geojson_three_errors_for_one_feature() {
        let report = validate_geojson(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature",
                 "geometry":{"type":"InvalidType","coordinates":"invalid"},
                 "properties":{}}]}"#,
        );

        assert_eq!(
            report.errors,
            vec![
                "Feature 0: Ongeldige geometrie. Verwachte type 'Point'.".to_string(),
                "Feature 0: Coördinaten zijn ongeldig.".to_string(),
                "Feature 0: 'tree_id' ontbreekt in properties.".to_string(),
            ]
        );
        assert!(report.valid.is_empty());
    }

    #[test]
    fn test_geojson_empty_coordinates_invalid() {
        let report = validate_geojson(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature",
                 "geometry":{"type":"Point","coordinates":[]},
                 "properties":{"tree_id":"Tree A"}}]}"#,
        );

        assert_eq!(
            report.errors,
            vec!["Feature 0: Coördinaten zijn ongeldig.".to_string()]
        );
    }

    #[test]
    fn test_geojson_numeric_tree_id() {
        let report = validate_geojson(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature",
                 "geometry":{"type":"Point","coordinates":[5.3527,50.9531]},
                 "properties":{"tree_id":7}}]}"#,
        );

        assert!(report.errors.is_empty());
        assert_eq!(report.valid[0].name, "Tree 7");
    }

    #[test]
    fn test_geojson_wrong_structure() {
        let report = validate_geojson(r#"{"invalid":"structure"}"#);

        assert_eq!(
            report.errors,
            vec!["Ongeldig GeoJSON-bestand. Verwachte 'FeatureCollection'.".to_string()]
        );
    }

    #[test]
    fn test_geojson_unparseable() {
        let report = validate_geojson("Invalid JSON");

        assert_eq!(
            report.errors,
            vec!["Fout bij het verwerken van het GeoJSON-bestand.".to_string()]
        );
    }
}
