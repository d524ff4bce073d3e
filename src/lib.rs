//! K-means geo point clustering
//!
//! Groups records carrying a latitude/longitude into `k` clusters, measuring
//! distance along the Earth's surface with the haversine formula.
//!
//! ```
//! use geo_kmeans::{Point, cluster};
//!
//! let points = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(0.0, 1.0),
//!     Point::new(50.0, 0.0),
//!     Point::new(50.0, 1.0),
//! ];
//! let clusters = cluster(&points, 2).unwrap();
//! assert_eq!(clusters.len(), 2);
//! ```

pub mod cluster;

pub use cluster::{
    Cluster, ClusterError, Clustering, GeoPoint, KMeans, KMeansConfig, Point, PointList, Result,
    cluster, cluster_with_rng, haversine,
};
