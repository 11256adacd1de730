//! Projection of boundary coordinates into plotted space.

use geo::{Centroid, Coord, MapCoords};
use migration_map_flow_models::{Point, ProjectionConfig};

/// Maps a `[longitude, latitude]` coordinate into plotted space.
pub trait Projection {
    fn project(&self, coord: Coord<f64>) -> Coord<f64>;
}

/// Plate carrée projection centered on a configurable coordinate.
///
/// Plotted y grows downwards, so northern latitudes get smaller y values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equirectangular {
    center: [f64; 2],
    scale: f64,
    translate: [f64; 2],
}

impl Equirectangular {
    #[must_use]
    pub const fn new(center: [f64; 2], scale: f64, translate: [f64; 2]) -> Self {
        Self {
            center,
            scale,
            translate,
        }
    }

    #[must_use]
    pub const fn from_config(config: &ProjectionConfig) -> Self {
        match *config {
            ProjectionConfig::Equirectangular {
                center,
                scale,
                translate,
            } => Self::new(center, scale, translate),
        }
    }
}

impl Projection for Equirectangular {
    fn project(&self, coord: Coord<f64>) -> Coord<f64> {
        let lambda = (coord.x - self.center[0]).to_radians();
        let phi = (coord.y - self.center[1]).to_radians();
        Coord {
            x: self.scale.mul_add(lambda, self.translate[0]),
            y: (-self.scale).mul_add(phi, self.translate[1]),
        }
    }
}

/// Planar centroid of `geometry` after projecting it.
///
/// Returns `None` for geometries that cannot be converted, are empty, or
/// project to non-finite coordinates.
#[must_use]
pub fn plotted_centroid<P: Projection>(
    geometry: &geojson::Geometry,
    projection: &P,
) -> Option<Point> {
    let geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    let projected = geom.map_coords(|c| projection.project(c));
    let centroid = projected.centroid()?;
    let point = Point::new(centroid.x(), centroid.y());
    point.is_finite().then_some(point)
}

/// Closed rings of `geometry` after projecting it, for drawing outlines.
///
/// Polygons yield their exterior ring followed by their holes. Lines and
/// points yield nothing, and a ring with a non-finite coordinate is
/// dropped.
#[must_use]
pub fn plotted_rings<P: Projection>(
    geometry: &geojson::Geometry,
    projection: &P,
) -> Vec<Vec<Point>> {
    let Ok(geom) = geo::Geometry::<f64>::try_from(geometry.clone()) else {
        return Vec::new();
    };
    let mut rings = Vec::new();
    collect_rings(&geom.map_coords(|c| projection.project(c)), &mut rings);
    rings
}

fn collect_rings(geom: &geo::Geometry<f64>, rings: &mut Vec<Vec<Point>>) {
    match geom {
        geo::Geometry::Polygon(polygon) => push_polygon(polygon, rings),
        geo::Geometry::MultiPolygon(multi) => {
            for polygon in &multi.0 {
                push_polygon(polygon, rings);
            }
        }
        geo::Geometry::GeometryCollection(collection) => {
            for member in &collection.0 {
                collect_rings(member, rings);
            }
        }
        _ => {}
    }
}

fn push_polygon(polygon: &geo::Polygon<f64>, rings: &mut Vec<Vec<Point>>) {
    for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
        let points: Vec<Point> = ring.0.iter().map(|c| Point::new(c.x, c.y)).collect();
        if !points.is_empty() && points.iter().all(|p| p.is_finite()) {
            rings.push(points);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity;

    impl Projection for Identity {
        fn project(&self, coord: Coord<f64>) -> Coord<f64> {
            coord
        }
    }

    fn geometry(json: &str) -> geojson::Geometry {
        match json.parse::<geojson::GeoJson>().unwrap() {
            geojson::GeoJson::Geometry(geom) => geom,
            other => panic!("expected a geometry, got {other:?}"),
        }
    }

    #[test]
    fn center_maps_to_translate() {
        let projection = Equirectangular::new([-98.5, 39.5], 800.0, [417.0, 241.0]);
        let c = projection.project(Coord { x: -98.5, y: 39.5 });
        assert!((c.x - 417.0).abs() < 1e-9);
        assert!((c.y - 241.0).abs() < 1e-9);
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let projection = Equirectangular::new([0.0, 0.0], 100.0, [0.0, 0.0]);
        let ne = projection.project(Coord { x: 10.0, y: 10.0 });
        assert!(ne.x > 0.0);
        assert!(ne.y < 0.0);
        let expected = 100.0 * 10.0_f64.to_radians();
        assert!((ne.x - expected).abs() < 1e-9);
    }

    #[test]
    fn polygon_centroid() {
        let geom = geometry(
            r#"{"type":"Polygon","coordinates":[[[0,0],[2,0],[2,2],[0,2],[0,0]]]}"#,
        );
        let c = plotted_centroid(&geom, &Identity).unwrap();
        assert!((c.x - 1.0).abs() < 1e-9);
        assert!((c.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn multipolygon_centroid_is_area_weighted() {
        let geom = geometry(
            r#"{"type":"MultiPolygon","coordinates":[
                [[[0,0],[2,0],[2,2],[0,2],[0,0]]],
                [[[10,0],[11,0],[11,1],[10,1],[10,0]]]
            ]}"#,
        );
        let c = plotted_centroid(&geom, &Identity).unwrap();
        // Areas 4 and 1 with centroids (1, 1) and (10.5, 0.5).
        assert!((c.x - 2.9).abs() < 1e-9);
        assert!((c.y - 0.9).abs() < 1e-9);
    }

    #[test]
    fn polygon_rings_include_holes() {
        let geom = geometry(
            r#"{"type":"Polygon","coordinates":[
                [[0,0],[4,0],[4,4],[0,4],[0,0]],
                [[1,1],[2,1],[2,2],[1,1]]
            ]}"#,
        );
        let rings = plotted_rings(&geom, &Identity);
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0][1], Point::new(4.0, 0.0));
        assert_eq!(rings[1].len(), 4);
    }

    #[test]
    fn multipolygon_rings_are_projected() {
        let projection = Equirectangular::new([0.0, 0.0], 1.0, [10.0, 20.0]);
        let geom = geometry(
            r#"{"type":"MultiPolygon","coordinates":[
                [[[0,0],[1,0],[1,1],[0,0]]],
                [[[5,5],[6,5],[6,6],[5,5]]]
            ]}"#,
        );
        let rings = plotted_rings(&geom, &projection);
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0][0], Point::new(10.0, 20.0));
    }

    #[test]
    fn points_have_no_rings() {
        let geom = geometry(r#"{"type":"Point","coordinates":[1,1]}"#);
        assert!(plotted_rings(&geom, &Identity).is_empty());
    }

    #[test]
    fn from_config_round_trips_parameters() {
        let config = ProjectionConfig::Equirectangular {
            center: [1.0, 2.0],
            scale: 3.0,
            translate: [4.0, 5.0],
        };
        assert_eq!(
            Equirectangular::from_config(&config),
            Equirectangular::new([1.0, 2.0], 3.0, [4.0, 5.0])
        );
    }
}
