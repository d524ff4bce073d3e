/// Configuration for a k-means run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,

    /// Random seed for initial centers; `None` draws from the thread RNG
    pub seed: Option<u64>,

    /// Stop after this many assignment passes even if not converged.
    /// `None` iterates until membership stops changing.
    pub max_iterations: Option<usize>,
}

impl KMeansConfig {
    /// Create a new unseeded, uncapped configuration with `k` clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seed: None,
            max_iterations: None,
        }
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }
}
