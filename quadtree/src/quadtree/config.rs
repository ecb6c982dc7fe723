#[derive(Debug, Clone)]
pub struct Config {
    /// A leaf subdivides once it holds more circles than this.
    pub node_capacity: usize,
    pub max_depth: usize,
    /// Nodes whose half side would fall below this stay leaves.
    pub min_size: f32,
    /// Fold a subtree back into a leaf when a removal leaves it holding at
    /// most `node_capacity` circles.
    pub merge_on_remove: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            node_capacity: 4,
            max_depth: 32,
            min_size: 1.0,
            merge_on_remove: true,
        }
    }
}
