//! Region quadtree over integer pixels.
//!
//! A node is either full (every pixel of its square is set), or partially
//! set through up to four children. Four full children collapse into a full
//! parent, so solid areas of a bitmap cost a single node.

use crate::align;
use crate::error::{QuadtreeError, QuadtreeResult};
use crate::quadtree::Quadrant;

use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

impl Pixel {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Pixel {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Integer box, closed on min and open on max.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl PixelRegion {
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn contains(&self, pixel: Pixel) -> bool {
        pixel.x >= self.x_min && pixel.x < self.x_max && pixel.y >= self.y_min && pixel.y < self.y_max
    }

    pub fn area(&self) -> u64 {
        (self.x_max - self.x_min) as u64 * (self.y_max - self.y_min) as u64
    }

    pub fn is_unit(&self) -> bool {
        self.x_min + 1 == self.x_max && self.y_min + 1 == self.y_max
    }

    fn origin(&self) -> (i32, i32) {
        (
            self.x_min + (self.x_max - self.x_min) / 2,
            self.y_min + (self.y_max - self.y_min) / 2,
        )
    }

    fn quadrant_of(&self, pixel: Pixel) -> Quadrant {
        let (ox, oy) = self.origin();
        match (pixel.x >= ox, pixel.y >= oy) {
            (true, true) => Quadrant::NE,
            (true, false) => Quadrant::SE,
            (false, true) => Quadrant::NW,
            (false, false) => Quadrant::SW,
        }
    }

    fn subregion(&self, quadrant: Quadrant) -> PixelRegion {
        let (ox, oy) = self.origin();
        match quadrant {
            Quadrant::NE => PixelRegion::new(ox, oy, self.x_max, self.y_max),
            Quadrant::NW => PixelRegion::new(self.x_min, oy, ox, self.y_max),
            Quadrant::SW => PixelRegion::new(self.x_min, self.y_min, ox, oy),
            Quadrant::SE => PixelRegion::new(ox, self.y_min, self.x_max, oy),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RasterNode {
    region: PixelRegion,
    full: bool,
    children: [Option<Box<RasterNode>>; 4],
}

impl RasterNode {
    fn new(region: PixelRegion, full: bool) -> Self {
        Self {
            region,
            full,
            children: Default::default(),
        }
    }

    pub fn region(&self) -> &PixelRegion {
        &self.region
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn child(&self, quadrant: Quadrant) -> Option<&RasterNode> {
        self.children[quadrant.index()].as_deref()
    }

    fn is_empty(&self) -> bool {
        !self.full && self.children.iter().all(Option::is_none)
    }

    fn add(&mut self, pixel: Pixel) -> bool {
        if self.full {
            return false;
        }
        if self.region.is_unit() {
            self.full = true;
            return true;
        }

        let quadrant = self.region.quadrant_of(pixel);
        let subregion = self.region.subregion(quadrant);
        let child = self.children[quadrant.index()]
            .get_or_insert_with(|| Box::new(RasterNode::new(subregion, false)));
        if !child.add(pixel) {
            return false;
        }

        if self.children.iter().all(|c| c.as_ref().map_or(false, |c| c.full)) {
            self.full = true;
            self.children = Default::default();
        }
        true
    }

    fn remove(&mut self, pixel: Pixel) -> bool {
        if self.region.is_unit() {
            let was_full = self.full;
            self.full = false;
            return was_full;
        }
        if self.full {
            self.split_full();
        }

        let quadrant = self.region.quadrant_of(pixel);
        let Some(child) = self.children[quadrant.index()].as_mut() else {
            return false;
        };
        let removed = child.remove(pixel);
        if removed && child.is_empty() {
            self.children[quadrant.index()] = None;
        }
        removed
    }

    fn split_full(&mut self) {
        self.full = false;
        for quadrant in Quadrant::ALL {
            let child = RasterNode::new(self.region.subregion(quadrant), true);
            self.children[quadrant.index()] = Some(Box::new(child));
        }
    }

    fn contains(&self, pixel: Pixel) -> bool {
        let mut node = self;
        loop {
            if node.full {
                return true;
            }
            match node.child(node.region.quadrant_of(pixel)) {
                Some(child) => node = child,
                None => return false,
            }
        }
    }

    pub fn preorder(&self) -> RasterPreorder<'_> {
        RasterPreorder::new(Some(self))
    }
}

pub struct RasterQuadTree {
    root: Option<RasterNode>,
    region: PixelRegion,
}

impl RasterQuadTree {
    /// Tree over the power-of-two square covering `[x_min, x_max) x [y_min, y_max)`.
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> QuadtreeResult<Self> {
        let invalid = QuadtreeError::InvalidRegion {
            x_min: x_min as f32,
            y_min: y_min as f32,
            x_max: x_max as f32,
            y_max: y_max as f32,
        };
        if x_min >= x_max || y_min >= y_max {
            return Err(invalid);
        }

        let (min, side) = align::square_region(x_min as i64, y_min as i64, x_max as i64, y_max as i64);
        let min = i32::try_from(min).map_err(|_| invalid)?;
        let max = i32::try_from(min as i64 + side).map_err(|_| invalid)?;
        Ok(RasterQuadTree {
            root: None,
            region: PixelRegion::new(min, min, max, max),
        })
    }

    pub fn region(&self) -> &PixelRegion {
        &self.region
    }

    pub fn root(&self) -> Option<&RasterNode> {
        self.root.as_ref()
    }

    /// Returns false when the pixel is outside the tree or already set.
    pub fn insert(&mut self, pixel: Pixel) -> bool {
        if !self.region.contains(pixel) {
            return false;
        }
        let region = self.region;
        self.root
            .get_or_insert_with(|| RasterNode::new(region, false))
            .add(pixel)
    }

    pub fn remove(&mut self, pixel: Pixel) -> bool {
        if !self.region.contains(pixel) {
            return false;
        }
        let Some(root) = self.root.as_mut() else {
            return false;
        };
        let removed = root.remove(pixel);
        if root.is_empty() {
            self.root = None;
        }
        removed
    }

    pub fn contains(&self, pixel: Pixel) -> bool {
        self.region.contains(pixel) && self.root.as_ref().map_or(false, |root| root.contains(pixel))
    }

    /// Number of set pixels.
    pub fn len(&self) -> u64 {
        self.preorder()
            .filter(|node| node.full)
            .map(|node| node.region.area())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn node_count(&self) -> usize {
        self.preorder().count()
    }

    pub fn preorder(&self) -> RasterPreorder<'_> {
        RasterPreorder::new(self.root.as_ref())
    }

    /// Every set pixel, expanding full nodes one pixel at a time.
    pub fn iter(&self) -> Pixels<'_> {
        Pixels {
            nodes: self.preorder(),
            current: None,
        }
    }
}

pub struct RasterPreorder<'a> {
    stack: SmallVec<[&'a RasterNode; 32]>,
}

impl<'a> RasterPreorder<'a> {
    fn new(root: Option<&'a RasterNode>) -> Self {
        let mut stack = SmallVec::new();
        stack.extend(root);
        Self { stack }
    }
}

impl<'a> Iterator for RasterPreorder<'a> {
    type Item = &'a RasterNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().filter_map(|c| c.as_deref()));
        Some(node)
    }
}

pub struct Pixels<'a> {
    nodes: RasterPreorder<'a>,
    current: Option<(PixelRegion, Pixel)>,
}

impl<'a> Iterator for Pixels<'a> {
    type Item = Pixel;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((region, pixel)) = self.current.as_mut() {
                if pixel.x < region.x_max {
                    let out = *pixel;
                    pixel.y += 1;
                    if pixel.y >= region.y_max {
                        pixel.y = region.y_min;
                        pixel.x += 1;
                    }
                    return Some(out);
                }
                self.current = None;
            }

            let node = self.nodes.next()?;
            if node.full {
                let start = Pixel::new(node.region.x_min, node.region.y_min);
                self.current = Some((node.region, start));
            }
        }
    }
}
