//! Circle quadtree.
//!
//! Every node splits its region into NE, NW, SW and SE quarters at its
//! origin. A circle lives at the highest node from which it cannot be pushed
//! into a single child, so circles straddling quadrant lines stay at interior
//! nodes while small circles sink to the leaves.
//!
//! Trees are cheap to rebuild and are usually rebuilt wholesale after every
//! round of movement rather than updated in place.

mod config;
mod iter;
mod node;
mod stats;

pub use config::Config;
pub use iter::{Collide, Iter, Preorder};
pub use node::{QuadNode, Quadrant, Quadrants};
pub use stats::QueryStats;

use crate::align;
use crate::collision_detection;
use crate::error::{self, QuadtreeError, QuadtreeResult};
use crate::shapes::{Circle, Region};

use std::cell::Cell;
use std::fmt;
use tracing::debug;

/// Decides whether a stored circle (first) collides with a query circle.
pub type CollisionFn<T> = fn(&Circle<T>, &Circle<T>) -> bool;

pub struct QuadTree<T = ()> {
    root: Option<QuadNode<T>>,
    region: Region,
    config: Config,
    collision: CollisionFn<T>,
    len: usize,
    query_stats: Cell<QueryStats>,
}

impl<T> QuadTree<T> {
    pub fn new(region: Region) -> QuadtreeResult<Self> {
        Self::new_with_config(region, Config::default())
    }

    pub fn new_with_config(region: Region, config: Config) -> QuadtreeResult<Self> {
        Self::new_with_collision(region, config, collision_detection::circle_circle)
    }

    /// Builds an empty tree over `region` rounded out to power-of-two bounds.
    /// The root node is only allocated by the first insert.
    pub fn new_with_collision(
        region: Region,
        config: Config,
        collision: CollisionFn<T>,
    ) -> QuadtreeResult<Self> {
        error::validate_region(&region)?;
        Ok(QuadTree {
            root: None,
            region: align::normalize_region(&region),
            config,
            collision,
            len: 0,
            query_stats: Cell::new(QueryStats::default()),
        })
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn root(&self) -> Option<&QuadNode<T>> {
        self.root.as_ref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Inserts `circle`, returning false when it lies outside the tree or an
    /// identical `(x, y, radius)` is already stored. Use [`Self::try_insert`]
    /// to tell the two apart.
    pub fn insert(&mut self, circle: Circle<T>) -> bool {
        self.try_insert(circle).is_ok()
    }

    pub fn try_insert(&mut self, circle: Circle<T>) -> QuadtreeResult<()> {
        self.insert_inner(circle).map_err(|(err, _)| err)
    }

    fn insert_inner(&mut self, circle: Circle<T>) -> Result<(), (QuadtreeError, Circle<T>)> {
        if let Err(err) = error::validate_circle(&circle) {
            return Err((err, circle));
        }

        if !collision_detection::circle_rectangle(&self.region, &circle) {
            debug!(
                x = circle.x,
                y = circle.y,
                radius = circle.radius,
                "rejected circle outside quadtree bounds"
            );
            let err = QuadtreeError::CircleOutOfBounds {
                x: circle.x,
                y: circle.y,
                radius: circle.radius,
                bounds_x_min: self.region.x_min,
                bounds_y_min: self.region.y_min,
                bounds_x_max: self.region.x_max,
                bounds_y_max: self.region.y_max,
            };
            return Err((err, circle));
        }

        let region = self.region;
        let root = self.root.get_or_insert_with(|| QuadNode::new(region, 0));
        match root.add(circle, &self.config) {
            Ok(()) => {
                self.len += 1;
                Ok(())
            }
            Err(circle) => {
                debug!(
                    x = circle.x,
                    y = circle.y,
                    radius = circle.radius,
                    "rejected duplicate circle"
                );
                let err = QuadtreeError::DuplicateCircle {
                    x: circle.x,
                    y: circle.y,
                    radius: circle.radius,
                };
                Err((err, circle))
            }
        }
    }

    /// Removes the circle matching `(x, y, radius)`; `hit` and payload are
    /// ignored when matching.
    pub fn remove<U>(&mut self, circle: &Circle<U>) -> bool {
        self.take(circle).is_some()
    }

    /// Like [`Self::remove`] but hands back the stored circle.
    pub fn take<U>(&mut self, circle: &Circle<U>) -> Option<Circle<T>> {
        let removed = self
            .root
            .as_mut()?
            .remove_descending(circle, &self.config)?;
        self.len -= 1;
        Some(removed)
    }

    pub fn contains<U>(&self, circle: &Circle<U>) -> bool {
        self.holder_of(circle).is_some()
    }

    /// Whether `circle` is held by an interior node because it straddles
    /// quadrant lines. `None` when the circle is not stored.
    pub fn is_multiple<U>(&self, circle: &Circle<U>) -> Option<bool> {
        self.holder_of(circle).map(|node| !node.is_leaf())
    }

    fn holder_of<U>(&self, circle: &Circle<U>) -> Option<&QuadNode<T>> {
        if !collision_detection::circle_rectangle(&self.region, circle) {
            return None;
        }
        let node = self.root.as_ref()?.holder_of(circle);
        node.holds(circle).then_some(node)
    }

    /// Lazily yields every stored circle the collision predicate reports as
    /// overlapping `query`.
    pub fn collide<'a>(&'a self, query: &'a Circle<T>) -> Collide<'a, T> {
        Collide::new(self.root.as_ref(), query, self.collision, &self.query_stats)
    }

    pub fn collisions_with<F>(&self, query: &Circle<T>, mut f: F)
    where
        F: FnMut(&Circle<T>),
    {
        for circle in self.collide(query) {
            f(circle);
        }
    }

    /// Sets `hit` on every stored circle colliding with `query` and returns
    /// how many were marked.
    pub fn mark_hits(&mut self, query: &Circle<T>) -> usize {
        stats::record(&self.query_stats, |s| s.query_calls += 1);
        match self.root.as_mut() {
            Some(root) => root.mark_hits(query, self.collision, &self.query_stats),
            None => 0,
        }
    }

    /// Calls `f` once for every unordered pair of stored circles where
    /// `collide` on either one reports the other. The query side of the
    /// pair is passed first.
    pub fn for_each_collision_pair<F>(&self, mut f: F)
    where
        F: FnMut(&Circle<T>, &Circle<T>),
    {
        for holder in self.preorder() {
            for circle in holder.circles() {
                for other in self.collide(circle) {
                    if std::ptr::eq(other, circle) {
                        continue;
                    }
                    // A query from `other` reaches `circle` exactly when it touches
                    // this holder's region; the lower address reports such pairs.
                    let other_first = (other as *const Circle<T>) < (circle as *const Circle<T>);
                    if other_first
                        && (self.collision)(circle, other)
                        && collision_detection::circle_rectangle(holder.region(), other)
                    {
                        continue;
                    }
                    f(circle, other);
                }
            }
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.as_ref())
    }

    pub fn preorder(&self) -> Preorder<'_, T> {
        Preorder::new(self.root.as_ref())
    }

    pub fn all_node_regions(&self, regions: &mut Vec<Region>) {
        regions.extend(self.preorder().map(|node| *node.region()));
    }

    pub fn all_circles(&self, circles: &mut Vec<Circle<T>>)
    where
        T: Clone,
    {
        circles.extend(self.iter().cloned());
    }

    pub fn into_circles(self) -> Vec<Circle<T>> {
        let mut circles = Vec::with_capacity(self.len);
        if let Some(root) = self.root {
            root.drain_into(&mut circles);
        }
        circles
    }

    /// Drains every circle, lets `f` move it, and reinserts it into a fresh
    /// root. Circles that no longer fit (out of bounds, or now identical to
    /// another) are returned.
    pub fn rebuild_with<F>(&mut self, mut f: F) -> Vec<Circle<T>>
    where
        F: FnMut(&mut Circle<T>),
    {
        let mut circles = Vec::with_capacity(self.len);
        if let Some(root) = self.root.take() {
            root.drain_into(&mut circles);
        }
        self.len = 0;

        let mut rejected = Vec::new();
        for mut circle in circles {
            f(&mut circle);
            if let Err((_, circle)) = self.insert_inner(circle) {
                rejected.push(circle);
            }
        }
        rejected
    }

    pub fn take_query_stats(&self) -> QueryStats {
        self.query_stats.take()
    }
}

impl<T> Extend<Circle<T>> for QuadTree<T> {
    fn extend<I: IntoIterator<Item = Circle<T>>>(&mut self, iter: I) {
        for circle in iter {
            self.insert(circle);
        }
    }
}

impl<'a, T> IntoIterator for &'a QuadTree<T> {
    type Item = &'a Circle<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Debug for QuadTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadTree")
            .field("circles", &self.len)
            .field("region", &self.region)
            .field("config", &self.config)
            .finish()
    }
}
