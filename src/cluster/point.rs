//! Package cluster implements k-means clustering on (lat, lon) using haversine distance

/// Point represents a geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

/// PointList is a collection of Points
pub type PointList = Vec<Point>;

/// GeoPoint is anything that can be placed on the map
///
/// Records with an arbitrary payload implement this to be clustered directly.
/// Identity of a record is its position in the input slice, never its coordinates.
pub trait GeoPoint {
    /// Coordinates of the record
    fn point(&self) -> Point;
}

impl GeoPoint for Point {
    fn point(&self) -> Point {
        *self
    }
}

/// Cluster represents one group produced by k-means
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Cluster ID, equal to its position in the cluster list
    pub c: usize,
    /// Current center of the cluster
    pub center: Point,
    /// Indices of points belonging to this cluster, in insertion order
    pub points: Vec<usize>,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Point { lat, lon }
    }

    /// Returns great-circle distance to another point in meters
    pub fn distance(&self, b: &Point) -> f64 {
        super::distance::haversine(self, b)
    }
}

impl Cluster {
    /// Creates an empty cluster centered at `center`
    pub fn new(c: usize, center: Point) -> Self {
        Cluster {
            c,
            center,
            points: Vec::new(),
        }
    }

    /// Returns the number of member points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over the member records in insertion order
    pub fn members<'a, T>(&'a self, points: &'a [T]) -> impl Iterator<Item = &'a T> + 'a {
        self.points.iter().map(move |&i| &points[i])
    }

    /// Calculates the arithmetic mean of member coordinates
    ///
    /// Returns `None` for an empty cluster.
    pub fn mean<T: GeoPoint>(&self, points: &[T]) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }

        let mut center = Point::new(0.0, 0.0);
        for &i in &self.points {
            let pt = points[i].point();
            center.lat += pt.lat;
            center.lon += pt.lon;
        }

        let n = self.points.len() as f64;
        Some(Point::new(center.lat / n, center.lon / n))
    }

    /// Calculates cluster bounds
    ///
    /// Returns `(min, max)` where:
    /// - `min` is the minimum point (south-west)
    /// - `max` is the maximum point (north-east)
    ///
    /// Returns `None` for an empty cluster.
    pub fn bounds<T: GeoPoint>(&self, points: &[T]) -> Option<(Point, Point)> {
        if self.points.is_empty() {
            return None;
        }

        let mut min = Point::new(90.0, 180.0);
        let mut max = Point::new(-90.0, -180.0);

        for &i in &self.points {
            let pt = points[i].point();
            min.lat = min.lat.min(pt.lat);
            min.lon = min.lon.min(pt.lon);
            max.lat = max.lat.max(pt.lat);
            max.lon = max.lon.max(pt.lon);
        }

        Some((min, max))
    }
}
