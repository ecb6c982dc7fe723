//! Point quadtree with set semantics.
//!
//! Points only live in leaves, at most `node_capacity` per leaf. This is not
//! suitable for collision detection of shapes with extent; see
//! [`crate::quadtree::QuadTree`] for circles.

use crate::align;
use crate::error::{self, QuadtreeResult};
use crate::quadtree::{Config, Quadrant};
use crate::shapes::{Point, Region};

use smallvec::SmallVec;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct PointNode {
    region: Region,
    origin: Point,
    depth: usize,
    points: Vec<Point>,
    children: Option<Box<[PointNode; 4]>>,
}

impl PointNode {
    fn new(region: Region, depth: usize) -> Self {
        Self {
            region,
            origin: region.origin(),
            depth,
            points: Vec::new(),
            children: None,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn children(&self) -> Option<&[PointNode; 4]> {
        self.children.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn quadrant_for(&self, point: Point) -> Quadrant {
        Quadrant::of_point(self.origin, point.x, point.y)
    }

    pub fn preorder(&self) -> PointPreorder<'_> {
        PointPreorder::new(Some(self))
    }

    fn can_subdivide(&self, config: &Config) -> bool {
        self.depth < config.max_depth
            && self.origin.x > self.region.x_min
            && self.origin.y > self.region.y_min
            && self.region.width() / 2.0 >= config.min_size
            && self.region.height() / 2.0 >= config.min_size
    }

    fn add(&mut self, point: Point, config: &Config) -> bool {
        if self.children.is_none() {
            if self.points.contains(&point) {
                return false;
            }
            // A leaf that cannot split keeps every point it is handed.
            if self.points.len() < config.node_capacity || !self.can_subdivide(config) {
                self.points.push(point);
                return true;
            }
            self.subdivide(config);
        }

        let quadrant = self.quadrant_for(point);
        match self.children.as_mut() {
            Some(children) => children[quadrant.index()].add(point, config),
            None => false,
        }
    }

    fn subdivide(&mut self, config: &Config) {
        trace!(depth = self.depth, "subdividing point quadtree node");
        let depth = self.depth + 1;
        let (region, origin) = (self.region, self.origin);
        let mut children =
            Box::new(Quadrant::ALL.map(|q| PointNode::new(q.subregion(&region, origin), depth)));
        for point in std::mem::take(&mut self.points) {
            let quadrant = Quadrant::of_point(origin, point.x, point.y);
            children[quadrant.index()].add(point, config);
        }
        self.children = Some(children);
    }

    fn remove(&mut self, point: Point, config: &Config) -> bool {
        let quadrant = self.quadrant_for(point);
        let Some(children) = self.children.as_mut() else {
            let Some(idx) = self.points.iter().position(|p| *p == point) else {
                return false;
            };
            self.points.remove(idx);
            return true;
        };

        let removed = children[quadrant.index()].remove(point, config);
        if removed && config.merge_on_remove {
            self.merge_if_sparse(config.node_capacity);
        }
        removed
    }

    fn merge_if_sparse(&mut self, capacity: usize) {
        let Some(children) = self.children.as_deref() else {
            return;
        };
        if !children.iter().all(PointNode::is_leaf) {
            return;
        }
        let total: usize = children.iter().map(|c| c.points.len()).sum();
        if total > capacity {
            return;
        }
        if let Some(children) = self.children.take() {
            trace!(depth = self.depth, "merging point quadtree node children");
            let children: [PointNode; 4] = *children;
            for child in children {
                self.points.extend(child.points);
            }
        }
    }

    fn holder_of(&self, point: Point) -> &PointNode {
        let mut node = self;
        while let Some(children) = node.children() {
            node = &children[node.quadrant_for(point).index()];
        }
        node
    }
}

pub struct PointQuadTree {
    root: Option<PointNode>,
    region: Region,
    config: Config,
    len: usize,
}

impl PointQuadTree {
    pub fn new(region: Region) -> QuadtreeResult<Self> {
        Self::new_with_config(region, Config::default())
    }

    pub fn new_with_config(region: Region, config: Config) -> QuadtreeResult<Self> {
        error::validate_region(&region)?;
        Ok(PointQuadTree {
            root: None,
            region: align::normalize_region(&region),
            config,
            len: 0,
        })
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn root(&self) -> Option<&PointNode> {
        self.root.as_ref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns false when the point is outside the tree or already present.
    pub fn insert(&mut self, point: Point) -> bool {
        if !self.region.contains_point(point.x, point.y) {
            return false;
        }
        let region = self.region;
        let root = self.root.get_or_insert_with(|| PointNode::new(region, 0));
        let added = root.add(point, &self.config);
        if added {
            self.len += 1;
        }
        added
    }

    pub fn remove(&mut self, point: Point) -> bool {
        if !self.region.contains_point(point.x, point.y) {
            return false;
        }
        let Some(root) = self.root.as_mut() else {
            return false;
        };
        let removed = root.remove(point, &self.config);
        if removed {
            self.len -= 1;
        }
        removed
    }

    pub fn contains(&self, point: Point) -> bool {
        if !self.region.contains_point(point.x, point.y) {
            return false;
        }
        self.root
            .as_ref()
            .map_or(false, |root| root.holder_of(point).points.contains(&point))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> + '_ {
        self.preorder().flat_map(|node| node.points.iter())
    }

    pub fn preorder(&self) -> PointPreorder<'_> {
        PointPreorder::new(self.root.as_ref())
    }
}

pub struct PointPreorder<'a> {
    stack: SmallVec<[&'a PointNode; 32]>,
}

impl<'a> PointPreorder<'a> {
    fn new(root: Option<&'a PointNode>) -> Self {
        let mut stack = SmallVec::new();
        stack.extend(root);
        Self { stack }
    }
}

impl<'a> Iterator for PointPreorder<'a> {
    type Item = &'a PointNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = node.children() {
            self.stack.extend(children.iter().rev());
        }
        Some(node)
    }
}
