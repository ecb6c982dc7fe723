use super::iter::Preorder;
use super::stats::{self, QueryStats};
use super::{CollisionFn, Config};
use crate::collision_detection;
use crate::shapes::{Circle, Point, Region};

use smallvec::SmallVec;
use std::cell::Cell;
use tracing::trace;

/// One of the four quarters produced by splitting a region at its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NE = 0,
    NW = 1,
    SW = 2,
    SE = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::NE, Quadrant::NW, Quadrant::SW, Quadrant::SE];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Points on the origin lines belong to the east and north quarters.
    #[inline(always)]
    pub fn of_point(origin: Point, x: f32, y: f32) -> Self {
        match (x >= origin.x, y >= origin.y) {
            (true, true) => Quadrant::NE,
            (true, false) => Quadrant::SE,
            (false, true) => Quadrant::NW,
            (false, false) => Quadrant::SW,
        }
    }

    pub fn subregion(self, region: &Region, origin: Point) -> Region {
        match self {
            Quadrant::NE => Region::new(origin.x, origin.y, region.x_max, region.y_max),
            Quadrant::NW => Region::new(region.x_min, origin.y, origin.x, region.y_max),
            Quadrant::SW => Region::new(region.x_min, region.y_min, origin.x, origin.y),
            Quadrant::SE => Region::new(origin.x, region.y_min, region.x_max, origin.y),
        }
    }
}

pub type Quadrants = SmallVec<[Quadrant; 4]>;

/// A cell of the circle quadtree.
///
/// A leaf stores its circles directly. An interior node owns four children
/// and keeps only the circles that overlap two or more of them.
#[derive(Debug, Clone)]
pub struct QuadNode<T> {
    region: Region,
    origin: Point,
    depth: usize,
    circles: Vec<Circle<T>>,
    children: Option<Box<[QuadNode<T>; 4]>>,
}

impl<T> QuadNode<T> {
    pub(crate) fn new(region: Region, depth: usize) -> Self {
        Self {
            region,
            origin: region.origin(),
            depth,
            circles: Vec::new(),
            children: None,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn circles(&self) -> &[Circle<T>] {
        &self.circles
    }

    pub fn children(&self) -> Option<&[QuadNode<T>; 4]> {
        self.children.as_deref()
    }

    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadNode<T>> {
        self.children().map(|children| &children[quadrant.index()])
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// This node, then every descendant, NE/NW/SW/SE first.
    pub fn preorder(&self) -> Preorder<'_, T> {
        Preorder::new(Some(self))
    }

    pub fn subregion(&self, quadrant: Quadrant) -> Region {
        quadrant.subregion(&self.region, self.origin)
    }

    /// Every quarter of this node the circle overlaps. Works on leaves too,
    /// against the regions their children would have.
    pub fn quadrants_for<U>(&self, circle: &Circle<U>) -> Quadrants {
        Quadrant::ALL
            .iter()
            .copied()
            .filter(|&quadrant| {
                collision_detection::circle_rectangle(&self.subregion(quadrant), circle)
            })
            .collect()
    }

    pub fn quadrant_for(&self, x: f32, y: f32) -> Quadrant {
        Quadrant::of_point(self.origin, x, y)
    }

    #[inline(always)]
    fn single_quadrant_for<U>(&self, circle: &Circle<U>) -> Option<Quadrant> {
        match self.quadrants_for(circle).as_slice() {
            [quadrant] => Some(*quadrant),
            _ => None,
        }
    }

    fn contains_own<U>(&self, circle: &Circle<U>) -> bool {
        self.circles.iter().any(|c| c.same_position(circle))
    }

    fn can_subdivide(&self, config: &Config) -> bool {
        self.depth < config.max_depth
            && self.origin.x > self.region.x_min
            && self.origin.y > self.region.y_min
            && self.region.width() / 2.0 >= config.min_size
            && self.region.height() / 2.0 >= config.min_size
    }

    /// Stores the circle at the lowest node that holds it whole, handing it
    /// back when an identical `(x, y, radius)` already lives there.
    pub(crate) fn add(&mut self, circle: Circle<T>, config: &Config) -> Result<(), Circle<T>> {
        if self.children.is_some() {
            if let Some(quadrant) = self.single_quadrant_for(&circle) {
                if let Some(children) = self.children.as_mut() {
                    return children[quadrant.index()].add(circle, config);
                }
            }
        }

        if self.contains_own(&circle) {
            return Err(circle);
        }

        self.circles.push(circle);
        if self.children.is_none()
            && self.circles.len() > config.node_capacity
            && self.can_subdivide(config)
        {
            self.subdivide(config);
        }
        Ok(())
    }

    fn subdivide(&mut self, config: &Config) {
        trace!(
            depth = self.depth,
            circles = self.circles.len(),
            "subdividing quadtree node"
        );

        let depth = self.depth + 1;
        let mut children = Box::new(Quadrant::ALL.map(|q| QuadNode::new(self.subregion(q), depth)));

        let circles = std::mem::take(&mut self.circles);
        for circle in circles {
            match self.single_quadrant_for(&circle) {
                Some(quadrant) => {
                    // Fresh children hold no duplicates of their parent's circles.
                    let _ = children[quadrant.index()].add(circle, config);
                }
                None => self.circles.push(circle),
            }
        }

        self.children = Some(children);
    }

    /// Removes a circle matching `(x, y, radius)` from this node's own list.
    pub fn remove_own<U>(&mut self, circle: &Circle<U>) -> Option<Circle<T>> {
        let idx = self.circles.iter().position(|c| c.same_position(circle))?;
        Some(self.circles.remove(idx))
    }

    /// The only node that could hold `circle`: descend while exactly one
    /// quadrant matches, stopping at a leaf.
    pub(crate) fn holder_of<U>(&self, circle: &Circle<U>) -> &QuadNode<T> {
        let mut node = self;
        while let Some(children) = node.children() {
            match node.single_quadrant_for(circle) {
                Some(quadrant) => node = &children[quadrant.index()],
                None => break,
            }
        }
        node
    }

    pub(crate) fn holds<U>(&self, circle: &Circle<U>) -> bool {
        self.contains_own(circle)
    }

    /// Tree-level removal along the same descent as `holder_of`. The holder
    /// and every ancestor whose subtree drops to `node_capacity` circles fold
    /// back into leaves when `merge_on_remove` is set.
    pub(crate) fn remove_descending<U>(
        &mut self,
        circle: &Circle<U>,
        config: &Config,
    ) -> Option<Circle<T>> {
        let target = match self.children {
            Some(_) => self.single_quadrant_for(circle),
            None => None,
        };

        let removed = match target {
            Some(quadrant) => self
                .children
                .as_mut()
                .and_then(|children| children[quadrant.index()].remove_descending(circle, config)),
            None => self.remove_own(circle),
        };
        if removed.is_some() && config.merge_on_remove {
            self.merge_if_sparse(config.node_capacity);
        }
        removed
    }

    fn merge_if_sparse(&mut self, capacity: usize) {
        if self.children.is_none() || self.count_up_to(capacity) > capacity {
            return;
        }
        if let Some(children) = self.children.take() {
            trace!(depth = self.depth, "merging quadtree node children");
            let children: [QuadNode<T>; 4] = *children;
            for child in children {
                child.drain_into(&mut self.circles);
            }
        }
    }

    /// Counts circles in this subtree, stopping early once `limit` is passed.
    fn count_up_to(&self, limit: usize) -> usize {
        let mut count = self.circles.len();
        if let Some(children) = self.children() {
            for child in children {
                if count > limit {
                    break;
                }
                count += child.count_up_to(limit - count);
            }
        }
        count
    }

    pub fn len(&self) -> usize {
        self.count_up_to(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty() && self.children().map_or(true, |c| c.iter().all(QuadNode::is_empty))
    }

    pub(crate) fn drain_into(self, out: &mut Vec<Circle<T>>) {
        out.extend(self.circles);
        if let Some(children) = self.children {
            let children: [QuadNode<T>; 4] = *children;
            for child in children {
                child.drain_into(out);
            }
        }
    }

    pub(crate) fn mark_hits(
        &mut self,
        query: &Circle<T>,
        collision: CollisionFn<T>,
        query_stats: &Cell<QueryStats>,
    ) -> usize {
        if !collision_detection::circle_rectangle(&self.region, query) {
            return 0;
        }
        stats::record(query_stats, |s| s.node_visits += 1);

        let mut marked = 0;
        for circle in self.circles.iter_mut() {
            stats::record(query_stats, |s| s.circle_visits += 1);
            if collision(circle, query) {
                circle.hit = true;
                marked += 1;
            }
        }

        if self.children.is_some() {
            let quadrants = self.quadrants_for(query);
            if let Some(children) = self.children.as_mut() {
                for quadrant in quadrants {
                    marked += children[quadrant.index()].mark_hits(query, collision, query_stats);
                }
            }
        }
        marked
    }
}
