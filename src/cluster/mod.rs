//! Package cluster implements k-means clustering on (lat, lon) using haversine distance
pub mod config;
pub mod distance;
pub mod error;
pub mod kmeans;
pub mod point;


pub use config::KMeansConfig;
pub use distance::{DEGREE_RAD, EARTH_R, haversine};
pub use error::{ClusterError, Result};
pub use kmeans::{
    Clustering, KMeans, Membership, adjust_centers, assign_points, build_random_initial_clusters,
    cluster, cluster_with_rng, has_converged, initial_clusters, memberships, nearest,
};
pub use point::{Cluster, GeoPoint, Point, PointList};
