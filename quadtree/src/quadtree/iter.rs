use super::node::QuadNode;
use super::stats::{self, QueryStats};
use super::CollisionFn;
use crate::collision_detection;
use crate::shapes::Circle;

use smallvec::SmallVec;
use std::cell::Cell;
use std::slice;

type NodeStack<'a, T> = SmallVec<[&'a QuadNode<T>; 32]>;

/// Pre-order walk over nodes. Each call to `preorder` starts a fresh walk.
pub struct Preorder<'a, T> {
    stack: NodeStack<'a, T>,
}

impl<'a, T> Preorder<'a, T> {
    pub(crate) fn new(root: Option<&'a QuadNode<T>>) -> Self {
        let mut stack = NodeStack::new();
        stack.extend(root);
        Self { stack }
    }
}

impl<'a, T> Iterator for Preorder<'a, T> {
    type Item = &'a QuadNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = node.children() {
            self.stack.extend(children.iter().rev());
        }
        Some(node)
    }
}

/// Every stored circle, node by node in pre-order.
pub struct Iter<'a, T> {
    nodes: Preorder<'a, T>,
    circles: slice::Iter<'a, Circle<T>>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: Option<&'a QuadNode<T>>) -> Self {
        Self {
            nodes: Preorder::new(root),
            circles: (&[]).iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Circle<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(circle) = self.circles.next() {
                return Some(circle);
            }
            self.circles = self.nodes.next()?.circles().iter();
        }
    }
}

/// Stored circles colliding with a query circle.
///
/// Subtrees whose region the query cannot touch are never entered, and only
/// the quadrants the query overlaps are pushed below an interior node.
pub struct Collide<'a, T> {
    stack: NodeStack<'a, T>,
    circles: slice::Iter<'a, Circle<T>>,
    query: &'a Circle<T>,
    collision: CollisionFn<T>,
    query_stats: &'a Cell<QueryStats>,
}

impl<'a, T> Collide<'a, T> {
    pub(crate) fn new(
        root: Option<&'a QuadNode<T>>,
        query: &'a Circle<T>,
        collision: CollisionFn<T>,
        query_stats: &'a Cell<QueryStats>,
    ) -> Self {
        stats::record(query_stats, |s| s.query_calls += 1);
        let mut stack = NodeStack::new();
        stack.extend(root);
        Self {
            stack,
            circles: (&[]).iter(),
            query,
            collision,
            query_stats,
        }
    }
}

impl<'a, T> Iterator for Collide<'a, T> {
    type Item = &'a Circle<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for circle in self.circles.by_ref() {
                stats::record(self.query_stats, |s| s.circle_visits += 1);
                if (self.collision)(circle, self.query) {
                    return Some(circle);
                }
            }

            let node = self.stack.pop()?;
            if !collision_detection::circle_rectangle(node.region(), self.query) {
                continue;
            }
            stats::record(self.query_stats, |s| s.node_visits += 1);

            self.circles = node.circles().iter();
            if let Some(children) = node.children() {
                let quadrants = node.quadrants_for(self.query);
                self.stack
                    .extend(quadrants.iter().rev().map(|q| &children[q.index()]));
            }
        }
    }
}
