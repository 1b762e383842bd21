//! Directed landmark adjacency.

use hashbrown::HashMap;

/// Static map from a landmark index to its ordered neighbor list.
///
/// Built once from an index-pair template and shared read-only (it is
/// `Send + Sync`, wrap it in an `Arc` to share across threads).
///
/// Adjacency is directed: the pair `(a, b)` makes `b` a neighbor of `a`
/// only. Use [`symmetric`](Self::symmetric) to insert both directions.
///
/// # Example
///
/// ```
/// use face_topology::EdgeAdjacency;
///
/// let adj = EdgeAdjacency::from_pairs([(0, 1), (0, 2), (1, 2)]);
/// assert_eq!(adj.neighbors(0), Some(&[1, 2][..]));
/// assert_eq!(adj.neighbors(2), None);
///
/// let sym = EdgeAdjacency::symmetric([(0, 1), (0, 2), (1, 2)]);
/// assert_eq!(sym.neighbors(2), Some(&[0, 1][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeAdjacency {
    neighbors: HashMap<u32, Vec<u32>>,
    pair_count: usize,
}

impl EdgeAdjacency {
    /// Create an empty adjacency.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directed adjacency from index pairs.
    ///
    /// Neighbor lists keep the order in which pairs appear. Repeated pairs
    /// are stored once.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut adj = Self::new();
        for (a, b) in pairs {
            adj.insert(a, b);
        }
        adj
    }

    /// Build an adjacency that also contains the reverse of every pair.
    #[must_use]
    pub fn symmetric<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut adj = Self::new();
        for (a, b) in pairs {
            adj.insert(a, b);
            adj.insert(b, a);
        }
        adj
    }

    /// Add the directed edge `from -> to`.
    ///
    /// Returns `false` if the edge was already present.
    pub fn insert(&mut self, from: u32, to: u32) -> bool {
        let list = self.neighbors.entry(from).or_default();
        if list.contains(&to) {
            return false;
        }
        list.push(to);
        self.pair_count += 1;
        true
    }

    /// Ordered neighbors of `index`, or `None` if it has no entry.
    #[must_use]
    pub fn neighbors(&self, index: u32) -> Option<&[u32]> {
        self.neighbors.get(&index).map(Vec::as_slice)
    }

    /// Whether `to` is a neighbor of `from`.
    #[must_use]
    pub fn contains(&self, from: u32, to: u32) -> bool {
        self.neighbors(from).is_some_and(|n| n.contains(&to))
    }

    /// Number of indices with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether the adjacency has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Number of distinct directed edges.
    #[must_use]
    pub const fn pair_count(&self) -> usize {
        self.pair_count
    }
}

impl FromIterator<(u32, u32)> for EdgeAdjacency {
    fn from_iter<T: IntoIterator<Item = (u32, u32)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}
