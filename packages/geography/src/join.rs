//! Parsing of the two map inputs and joining them by region name.
//!
//! Regions missing from the metrics file keep `metrics: None` so the
//! planner can tell "no data" apart from a genuine zero.

use std::collections::{BTreeMap, BTreeSet};

use geojson::{FeatureCollection, GeoJson};
use migration_map_flow_models::{FlowMetrics, MetricFieldMapping, RegionMetric, RegionOutline};

use crate::GeographyError;
use crate::projection::{Projection, plotted_centroid, plotted_rings};

/// Migration metrics keyed by region name.
pub type MetricsTable = BTreeMap<String, FlowMetrics>;

/// Parses `GeoJSON` text that must hold a `FeatureCollection`.
///
/// # Errors
///
/// Returns [`GeographyError::GeoJson`] if the text is not valid `GeoJSON`
/// and [`GeographyError::Conversion`] if it is a bare geometry or feature.
pub fn parse_feature_collection(text: &str) -> Result<FeatureCollection, GeographyError> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(GeographyError::Conversion {
            message: "Expected a FeatureCollection, found a single Feature".to_string(),
        }),
        GeoJson::Geometry(_) => Err(GeographyError::Conversion {
            message: "Expected a FeatureCollection, found a bare Geometry".to_string(),
        }),
    }
}

/// Parses the name-keyed metrics file.
///
/// Each record must carry the outbound field as a non-negative number or
/// numeric string. Strings may group digits in threes with commas
/// (`"24,913"`); any other comma placement is rejected. The inbound field
/// is optional and reads as 0 when absent.
///
/// A record whose outbound value is missing or unusable is dropped, which
/// leaves its region without metrics after the join. So is a record whose
/// inbound field is present but unusable. `null`, blank strings, negative
/// and non-finite values all count as unusable.
///
/// # Errors
///
/// Returns [`GeographyError::Json`] if the text is not JSON and
/// [`GeographyError::Conversion`] if it is not a JSON object.
pub fn parse_metrics(
    text: &str,
    fields: &MetricFieldMapping,
) -> Result<MetricsTable, GeographyError> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    let records = json
        .as_object()
        .ok_or_else(|| GeographyError::Conversion {
            message: "Metrics file must be a JSON object keyed by region name".to_string(),
        })?;

    let mut table = MetricsTable::new();
    for (name, record) in records {
        let FieldValue::Number(outbound) = numeric_field(record, &fields.outbound) else {
            log::warn!(
                "Metrics for '{name}' have no usable '{}' value, skipping",
                fields.outbound
            );
            continue;
        };
        let inbound = match fields.inbound.as_ref() {
            None => 0.0,
            Some(field) => match numeric_field(record, field) {
                FieldValue::Missing => 0.0,
                FieldValue::Number(value) => value,
                FieldValue::Invalid => {
                    log::warn!("Metrics for '{name}' have an unusable '{field}' value, skipping");
                    continue;
                }
            },
        };

        table.insert(name.trim().to_string(), FlowMetrics::new(outbound, inbound));
    }

    log::debug!("Parsed metrics for {} regions", table.len());

    Ok(table)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldValue {
    Missing,
    Invalid,
    Number(f64),
}

/// Reads a finite, non-negative number from `record[field]`.
fn numeric_field(record: &serde_json::Value, field: &str) -> FieldValue {
    let value = match record.get(field) {
        None => return FieldValue::Missing,
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => {
            strip_thousands(s.trim()).and_then(|digits| digits.parse::<f64>().ok())
        }
        Some(_) => None,
    };

    match value {
        Some(v) if v.is_finite() && v >= 0.0 => FieldValue::Number(v),
        Some(v) => {
            log::warn!("Ignoring out-of-range '{field}' value {v}");
            FieldValue::Invalid
        }
        None => FieldValue::Invalid,
    }
}

/// Removes thousands separators from `text` if its integer part groups
/// digits as `1,234,567`. Text without commas is returned unchanged.
fn strip_thousands(text: &str) -> Option<String> {
    if !text.contains(',') {
        return Some(text.to_string());
    }

    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let integer = unsigned.split_once('.').map_or(unsigned, |(int, _)| int);

    let mut groups = integer.split(',');
    let first_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()));
    let rest_ok = groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()));

    (first_ok && rest_ok && !unsigned[integer.len()..].contains(','))
        .then(|| text.replace(',', ""))
}

/// Joins boundary features with their metrics, in feature order.
///
/// Features without a name are skipped, as are later features repeating
/// an earlier name. A feature whose geometry is missing or unusable is
/// kept with no position.
#[must_use]
pub fn join_regions<P: Projection>(
    collection: &FeatureCollection,
    metrics: &MetricsTable,
    fields: &MetricFieldMapping,
    projection: &P,
) -> Vec<RegionMetric> {
    let mut seen = BTreeSet::new();
    let mut regions = Vec::with_capacity(collection.features.len());

    for feature in &collection.features {
        let Some(name) = feature_name(feature, &fields.name) else {
            log::warn!("Skipping feature without a '{}' property", fields.name);
            continue;
        };

        if !seen.insert(name.to_string()) {
            log::warn!("Duplicate region '{name}', keeping the first occurrence");
            continue;
        }

        let position = feature
            .geometry
            .as_ref()
            .and_then(|geom| plotted_centroid(geom, projection));
        if position.is_none() {
            log::warn!("Region '{name}' has no usable geometry");
        }

        let region_metrics = metrics.get(name).copied();
        if region_metrics.is_none() {
            log::debug!("No metrics for region '{name}'");
        }

        regions.push(RegionMetric {
            name: name.to_string(),
            position,
            metrics: region_metrics,
        });
    }

    log::info!(
        "Joined {} regions ({} with metrics)",
        regions.len(),
        regions.iter().filter(|r| r.metrics.is_some()).count()
    );

    regions
}

/// Projected outlines of every named feature, in feature order.
///
/// Names are resolved exactly as [`join_regions`] resolves them, so each
/// outline lines up with one joined region. Features without polygon
/// geometry get an outline with no rings.
#[must_use]
pub fn region_outlines<P: Projection>(
    collection: &FeatureCollection,
    fields: &MetricFieldMapping,
    projection: &P,
) -> Vec<RegionOutline> {
    let mut seen = BTreeSet::new();

    collection
        .features
        .iter()
        .filter_map(|feature| {
            let name = feature_name(feature, &fields.name)?;
            seen.insert(name.to_string()).then(|| RegionOutline {
                name: name.to_string(),
                rings: feature
                    .geometry
                    .as_ref()
                    .map(|geom| plotted_rings(geom, projection))
                    .unwrap_or_default(),
            })
        })
        .collect()
}

fn feature_name<'a>(feature: &'a geojson::Feature, field: &str) -> Option<&'a str> {
    feature
        .property(field)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use migration_map_flow_models::Point;

    struct Identity;

    impl Projection for Identity {
        fn project(&self, coord: Coord<f64>) -> Coord<f64> {
            coord
        }
    }

    fn fields() -> MetricFieldMapping {
        MetricFieldMapping {
            name: "name".to_string(),
            outbound: "going_to_california".to_string(),
            inbound: Some("coming_from_california".to_string()),
        }
    }

    const STATES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "California"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2],[0,0]]]}},
            {"type": "Feature", "properties": {"name": "Nevada"},
             "geometry": {"type": "Polygon", "coordinates": [[[4,0],[6,0],[6,2],[4,2],[4,0]]]}},
            {"type": "Feature", "properties": {"name": "Puerto Rico"},
             "geometry": {"type": "Polygon", "coordinates": [[[8,0],[9,0],[9,1],[8,1],[8,0]]]}},
            {"type": "Feature", "properties": {"name": "Atlantis"}, "geometry": null},
            {"type": "Feature", "properties": {"label": "unnamed"},
             "geometry": {"type": "Point", "coordinates": [1, 1]}},
            {"type": "Feature", "properties": {"name": "Nevada"},
             "geometry": {"type": "Point", "coordinates": [50, 50]}}
        ]
    }"#;

    const METRICS: &str = r#"{
        "California": {"going_to_california": 0, "coming_from_california": 0},
        "Nevada": {"going_to_california": "24,913", "coming_from_california": 40500},
        "Atlantis": {"going_to_california": 12},
        "Oregon": {"coming_from_california": 300}
    }"#;

    #[test]
    fn parses_feature_collection() {
        let collection = parse_feature_collection(STATES).unwrap();
        assert_eq!(collection.features.len(), 6);
    }

    #[test]
    fn rejects_non_collection_geojson() {
        let err = parse_feature_collection(r#"{"type":"Point","coordinates":[0,0]}"#);
        assert!(matches!(err, Err(GeographyError::Conversion { .. })));
        assert!(matches!(
            parse_feature_collection("not json"),
            Err(GeographyError::GeoJson(_))
        ));
    }

    #[test]
    fn parses_numbers_and_numeric_strings() {
        let table = parse_metrics(METRICS, &fields()).unwrap();
        let nevada = table["Nevada"];
        assert!((nevada.outbound - 24_913.0).abs() < f64::EPSILON);
        assert!((nevada.inbound - 40_500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_inbound_defaults_to_zero() {
        let table = parse_metrics(METRICS, &fields()).unwrap();
        assert!(table["Atlantis"].inbound.abs() < f64::EPSILON);
    }

    #[test]
    fn record_without_outbound_is_dropped() {
        let table = parse_metrics(METRICS, &fields()).unwrap();
        assert!(!table.contains_key("Oregon"));
    }

    #[test]
    fn negative_outbound_drops_the_record() {
        let table = parse_metrics(
            r#"{"Oregon": {"going_to_california": -30000, "coming_from_california": 100}}"#,
            &fields(),
        )
        .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn unusable_inbound_drops_the_record() {
        let table = parse_metrics(
            r#"{
                "Oregon": {"going_to_california": 100, "coming_from_california": "-5"},
                "Idaho": {"going_to_california": 100, "coming_from_california": null}
            }"#,
            &fields(),
        )
        .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn commas_must_group_thousands() {
        let table = parse_metrics(
            r#"{
                "A": {"going_to_california": "1,2,3"},
                "B": {"going_to_california": "12,34"},
                "C": {"going_to_california": "1,234,567.5"},
                "D": {"going_to_california": "  987  "},
                "E": {"going_to_california": ""}
            }"#,
            &fields(),
        )
        .unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["C", "D"]);
        assert!((table["C"].outbound - 1_234_567.5).abs() < f64::EPSILON);
        assert!((table["D"].outbound - 987.0).abs() < f64::EPSILON);
    }

    #[test]
    fn strips_only_grouping_commas() {
        assert_eq!(strip_thousands("24,913").as_deref(), Some("24913"));
        assert_eq!(strip_thousands("1,000.25").as_deref(), Some("1000.25"));
        assert_eq!(strip_thousands("42").as_deref(), Some("42"));
        assert_eq!(strip_thousands("1,2,3"), None);
        assert_eq!(strip_thousands("1234,567"), None);
        assert_eq!(strip_thousands(",123"), None);
        assert_eq!(strip_thousands("1.5,000"), None);
    }

    #[test]
    fn metrics_must_be_an_object() {
        assert!(matches!(
            parse_metrics("[1, 2]", &fields()),
            Err(GeographyError::Conversion { .. })
        ));
        assert!(matches!(
            parse_metrics("{", &fields()),
            Err(GeographyError::Json(_))
        ));
    }

    #[test]
    fn joins_in_feature_order() {
        let collection = parse_feature_collection(STATES).unwrap();
        let table = parse_metrics(METRICS, &fields()).unwrap();
        let regions = join_regions(&collection, &table, &fields(), &Identity);

        let names: Vec<&str> = regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["California", "Nevada", "Puerto Rico", "Atlantis"]);

        let nevada = &regions[1];
        let pos = nevada.position.unwrap();
        assert!((pos.x - 5.0).abs() < 1e-9);
        assert!((pos.y - 1.0).abs() < 1e-9);
        assert!(nevada.metrics.is_some());
    }

    #[test]
    fn absent_metrics_stay_absent() {
        let collection = parse_feature_collection(STATES).unwrap();
        let table = parse_metrics(METRICS, &fields()).unwrap();
        let regions = join_regions(&collection, &table, &fields(), &Identity);

        let puerto_rico = regions.iter().find(|r| r.name == "Puerto Rico").unwrap();
        assert_eq!(puerto_rico.metrics, None);
        assert!(puerto_rico.position.is_some());
    }

    #[test]
    fn null_geometry_has_no_position() {
        let collection = parse_feature_collection(STATES).unwrap();
        let table = parse_metrics(METRICS, &fields()).unwrap();
        let regions = join_regions(&collection, &table, &fields(), &Identity);

        let atlantis = regions.iter().find(|r| r.name == "Atlantis").unwrap();
        assert_eq!(atlantis.position, None);
        assert!(atlantis.metrics.is_some());
    }

    #[test]
    fn outlines_match_joined_regions() {
        let collection = parse_feature_collection(STATES).unwrap();
        let outlines = region_outlines(&collection, &fields(), &Identity);

        let names: Vec<&str> = outlines.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["California", "Nevada", "Puerto Rico", "Atlantis"]);
        assert_eq!(outlines[1].rings.len(), 1);
        assert_eq!(outlines[1].rings[0][0], Point::new(4.0, 0.0));
        assert!(outlines[3].rings.is_empty());
    }
}
