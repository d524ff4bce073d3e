use super::config::KMeansConfig;
use super::error::{ClusterError, Result};
use super::point::{Cluster, GeoPoint, Point};
use bitvec::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

// K-means over geographic points:
//
// kmeans(D, k)
//    shuffle D, centers = first k points of D
//    distribute D round-robin over the k clusters
//    do
//       previous = current
//       for each point P in D (input order)
//          add P to the cluster with the closest center (first wins ties)
//       for each non-empty cluster C
//          center(C) = mean(lat), mean(lon) of its members
//    while membership(previous) != membership(current)

/// Membership snapshot: member indices of every cluster, by cluster position
pub type Membership = Vec<Vec<usize>>;

/// Result of a k-means run
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Final clusters, `clusters[i].c == i`
    pub clusters: Vec<Cluster>,
    /// Number of completed assignment + recenter passes
    pub iterations: usize,
    /// False only when the iteration cap stopped the loop early
    pub converged: bool,
}

/// K-means driver
#[derive(Debug, Clone)]
pub struct KMeans {
    config: KMeansConfig,
}

impl KMeans {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }

    /// Clusters `points` into `config.k` groups starting from random centers
    ///
    /// The initial centers are drawn from a `StdRng` seeded with `config.seed`
    /// when one is set, otherwise from the thread RNG.
    pub fn run<T: GeoPoint>(&self, points: &[T]) -> Result<Clustering> {
        let clusters = match self.config.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                build_random_initial_clusters(points, self.config.k, &mut rng)?
            }
            None => build_random_initial_clusters(points, self.config.k, &mut rand::rng())?,
        };
        self.run_from(points, clusters)
    }

    /// Clusters `points` starting from a predefined set of clusters
    ///
    /// The number of clusters is taken from `clusters`, not from `config.k`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `clusters` is empty or has more entries than there are points.
    /// `InternalInvariantViolation` if an assignment pass loses or duplicates a point.
    pub fn run_from<T: GeoPoint>(&self, points: &[T], clusters: Vec<Cluster>) -> Result<Clustering> {
        let k = clusters.len();
        validate_k(points.len(), k)?;
        log::info!("clustering {} points into {} clusters", points.len(), k);

        let mut clusters = clusters;
        let mut iterations = 0;

        // one full pass always runs before the first comparison
        loop {
            if self.config.max_iterations.is_some_and(|max| iterations >= max) {
                log::warn!("stopped after {} iterations without convergence", iterations);
                return Ok(Clustering {
                    clusters,
                    iterations,
                    converged: false,
                });
            }
            log::debug!("on iteration {}", iterations);

            let previous: Membership = memberships(&clusters);
            assign_points(points, &mut clusters);
            check_partition(points.len(), &clusters)?;
            adjust_centers(points, &mut clusters);
            iterations += 1;

            if has_converged(&previous, &memberships(&clusters))? {
                break;
            }
        }

        log::info!("converged after {} iterations", iterations);
        Ok(Clustering {
            clusters,
            iterations,
            converged: true,
        })
    }
}

/// Clusters incoming points into `k` groups using k-means with haversine distance
///
/// Initial centers come from the thread RNG; use [`cluster_with_rng`] or a seeded
/// [`KMeansConfig`] for reproducible results.
///
/// # Arguments
///
/// * `points` - Records to cluster, left untouched
/// * `k` - Number of clusters, `1 <= k <= points.len()`
///
/// # Returns
///
/// Exactly `k` clusters whose member lists partition `0..points.len()`
pub fn cluster<T: GeoPoint>(points: &[T], k: usize) -> Result<Vec<Cluster>> {
    cluster_with_rng(points, k, &mut rand::rng())
}

/// Same as [`cluster`] with an injected source of randomness
pub fn cluster_with_rng<T: GeoPoint, R: Rng + ?Sized>(
    points: &[T],
    k: usize,
    rng: &mut R,
) -> Result<Vec<Cluster>> {
    let initial = build_random_initial_clusters(points, k, rng)?;
    let clustering = KMeans::new(KMeansConfig::new(k)).run_from(points, initial)?;
    Ok(clustering.clusters)
}

/// Builds the starting clusters from a uniformly random permutation of the points
///
/// The permutation is drawn over indices, so the caller's slice keeps its order.
pub fn build_random_initial_clusters<T: GeoPoint, R: Rng + ?Sized>(
    points: &[T],
    k: usize,
    rng: &mut R,
) -> Result<Vec<Cluster>> {
    validate_k(points.len(), k)?;

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.shuffle(rng);
    initial_clusters(points, &order, k)
}

/// Builds the starting clusters for a given visiting order of the points
///
/// The first `k` points of `order` become the centers, then every point is dealt
/// round-robin: the i-th point of `order` goes to cluster `i % k`.
pub fn initial_clusters<T: GeoPoint>(points: &[T], order: &[usize], k: usize) -> Result<Vec<Cluster>> {
    validate_k(points.len(), k)?;
    if order.len() != points.len() {
        return Err(ClusterError::InvalidArgument(format!(
            "order has {} entries for {} points",
            order.len(),
            points.len()
        )));
    }
    if let Some(&i) = order.iter().find(|&&i| i >= points.len()) {
        return Err(ClusterError::InvalidArgument(format!(
            "order refers to point {} of {}",
            i,
            points.len()
        )));
    }

    let mut clusters: Vec<Cluster> = order[..k]
        .iter()
        .enumerate()
        .map(|(c, &i)| Cluster::new(c, points[i].point()))
        .collect();

    for (i, &p) in order.iter().enumerate() {
        clusters[i % k].points.push(p);
    }

    Ok(clusters)
}

/// Reassigns every point to the cluster with the closest center
///
/// Member lists are rebuilt in input order. Ties go to the cluster that comes
/// first in `clusters`.
pub fn assign_points<T: GeoPoint>(points: &[T], clusters: &mut [Cluster]) {
    for cluster in clusters.iter_mut() {
        cluster.points.clear();
    }
    if clusters.is_empty() {
        return;
    }

    let centers: Vec<Point> = clusters.iter().map(|c| c.center).collect();
    for (i, j) in nearest_clusters(points, &centers).into_iter().enumerate() {
        log::trace!("adding point {} to cluster {}", i, j);
        clusters[j].points.push(i);
    }
}

/// Moves every non-empty cluster's center to the mean of its members
///
/// Empty clusters keep their center.
pub fn adjust_centers<T: GeoPoint>(points: &[T], clusters: &mut [Cluster]) {
    for cluster in clusters.iter_mut() {
        if let Some(center) = cluster.mean(points) {
            cluster.center = center;
        }
    }
}

/// Takes a membership snapshot of `clusters`
pub fn memberships(clusters: &[Cluster]) -> Membership {
    clusters.iter().map(|c| c.points.clone()).collect()
}

/// Checks whether two membership snapshots are equal cluster by cluster
///
/// Member order matters.
pub fn has_converged(previous: &[Vec<usize>], current: &[Vec<usize>]) -> Result<bool> {
    if previous.len() != current.len() {
        return Err(ClusterError::InternalInvariantViolation(format!(
            "comparing {} clusters against {}",
            previous.len(),
            current.len()
        )));
    }

    let converged = previous.iter().zip(current).all(|(p, c)| p == c);
    if converged {
        log::debug!("converged");
    }
    Ok(converged)
}

/// Index of the center closest to `point`, first one wins ties
///
/// Returns 0 for an empty `centers`.
pub fn nearest(point: &Point, centers: &[Point]) -> usize {
    let mut best = 0;
    let mut best_dist = match centers.first() {
        Some(center) => point.distance(center),
        None => return 0,
    };

    for (j, center) in centers.iter().enumerate().skip(1) {
        let dist = point.distance(center);
        if dist < best_dist {
            best = j;
            best_dist = dist;
        }
    }

    best
}

#[cfg(not(feature = "parallel"))]
fn nearest_clusters<T: GeoPoint>(points: &[T], centers: &[Point]) -> Vec<usize> {
    points.iter().map(|p| nearest(&p.point(), centers)).collect()
}

// Each point reads the same immutable centers; results come back in input
// order, so membership matches the sequential pass exactly.
#[cfg(feature = "parallel")]
fn nearest_clusters<T: GeoPoint>(points: &[T], centers: &[Point]) -> Vec<usize> {
    use rayon::prelude::*;

    let coords: Vec<Point> = points.iter().map(GeoPoint::point).collect();
    coords.par_iter().map(|p| nearest(p, centers)).collect()
}

fn validate_k(n: usize, k: usize) -> Result<()> {
    if k == 0 {
        return Err(ClusterError::InvalidArgument(
            "cluster count must be positive".to_string(),
        ));
    }
    if k > n {
        return Err(ClusterError::InvalidArgument(format!(
            "cluster count {} exceeds number of points {}",
            k, n
        )));
    }
    Ok(())
}

/// Verifies that every point is a member of exactly one cluster
pub(crate) fn check_partition(n: usize, clusters: &[Cluster]) -> Result<()> {
    let mut seen = bitvec![0; n];

    for cluster in clusters {
        for &i in &cluster.points {
            if i >= n || seen[i] {
                return Err(ClusterError::InternalInvariantViolation(format!(
                    "point {} assigned twice or out of range",
                    i
                )));
            }
            seen.set(i, true);
        }
    }

    if let Some(i) = seen.first_zero() {
        return Err(ClusterError::InternalInvariantViolation(format!(
            "point {} is not assigned to any cluster",
            i
        )));
    }
    Ok(())
}
