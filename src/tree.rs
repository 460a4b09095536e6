//! Arena registry of frames keyed by id.
//!
//! [`Frame`] handles already form a tree on their own. `FrameTree` adds what
//! the handles cannot answer: the children of a frame, lookup by id or name,
//! whole-tree traversal, and evaluating every global transform in one pass.

use std::collections::HashMap;

use bimap::BiHashMap;
use nohash_hasher::BuildNoHashHasher;

use crate::{
    config::Limits,
    error::{FrameError, Result},
    frame::Frame,
    tf::{Compose, Matrix2D},
};

pub type FrameId = u64;
pub type Components<C> = HashMap<FrameId, C, BuildNoHashHasher<u64>>;

#[derive(Debug, Default)]
pub struct FrameTree {
    nodes: Components<Node>,
    roots: Vec<FrameId>,
    names: BiHashMap<FrameId, String>,
    next: FrameId,
    limits: Limits,
}

#[derive(Debug)]
struct Node {
    frame: Frame,
    parent: Option<FrameId>,
    children: Vec<FrameId>,
}

impl FrameTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Adds a frame under `parent`, or as a new root.
    pub fn insert(&mut self, parent: Option<FrameId>, transform: Matrix2D) -> Result<FrameId> {
        let parent_frame = match parent {
            Some(p) => Some(&self.node(p)?.frame),
            None => None,
        };
        // The new frame's walk visits `depth + 1` frames.
        let depth = parent_frame.map_or(0, |p| p.depth() + 1);
        if depth >= self.limits.max_depth {
            return Err(FrameError::CyclicFrame {
                limit: self.limits.max_depth,
            });
        }
        let frame = Frame::new(transform, parent_frame);

        let id = self.next;
        self.next += 1;
        match parent {
            Some(p) => self.node_mut(p)?.children.push(id),
            None => self.roots.push(id),
        }
        self.nodes.insert(
            id,
            Node {
                frame,
                parent,
                children: Vec::new(),
            },
        );
        log::debug!("inserted frame {id} under {parent:?}");
        Ok(id)
    }

    pub fn insert_named(
        &mut self,
        name: impl Into<String>,
        parent: Option<FrameId>,
        transform: Matrix2D,
    ) -> Result<FrameId> {
        let name = name.into();
        if self.names.contains_right(&name) {
            return Err(FrameError::DuplicateName(name));
        }
        let id = self.insert(parent, transform)?;
        self.names.insert(id, name);
        Ok(id)
    }

    fn node(&self, id: FrameId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(FrameError::UnknownFrame(id))
    }

    fn node_mut(&mut self, id: FrameId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(FrameError::UnknownFrame(id))
    }

    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.nodes.get(&id).map(|node| &node.frame)
    }

    pub fn contains(&self, id: FrameId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent(&self, id: FrameId) -> Result<Option<FrameId>> {
        self.node(id).map(|node| node.parent)
    }

    pub fn children(&self, id: FrameId) -> Result<&[FrameId]> {
        self.node(id).map(|node| node.children.as_slice())
    }

    pub fn roots(&self) -> &[FrameId] {
        &self.roots
    }

    pub fn id_of(&self, name: &str) -> Option<FrameId> {
        self.names.get_by_right(name).copied()
    }

    pub fn name_of(&self, id: FrameId) -> Option<&str> {
        self.names.get_by_left(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `id`, then its parent, and so on up to its root.
    pub fn ancestors(&self, id: FrameId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            node: Some(id),
        }
    }

    /// Pre-order walk over every root and its descendants.
    pub fn dfs(&self) -> Dfs<'_> {
        Dfs::new(self)
    }

    /// Global transform of every frame, each child reusing its parent's.
    pub fn globals(&self) -> Result<Components<Matrix2D>> {
        let mut globals = Components::<Matrix2D>::default();
        for id in self.dfs() {
            let node = self.node(id)?;
            let global = match node.parent {
                Some(parent) => node.frame.transform().compose(globals[&parent]),
                None => node.frame.transform(),
            };
            globals.insert(id, global);
        }
        Ok(globals)
    }

    /// Matrix mapping local coordinates of `from` into those of `to`.
    pub fn convert(&self, from: FrameId, to: FrameId) -> Result<Matrix2D> {
        let from = &self.node(from)?.frame;
        let to = &self.node(to)?.frame;
        from.compute_convert_transform_with(to, &self.limits)
    }

    /// Removes `id` and its whole subtree, returning the removed ids in
    /// pre-order. Handles to removed frames stay usable.
    pub fn remove(&mut self, id: FrameId) -> Result<Vec<FrameId>> {
        let parent = self.node(id)?.parent;
        match parent {
            Some(p) => self.node_mut(p)?.children.retain(|child| *child != id),
            None => self.roots.retain(|root| *root != id),
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.nodes.remove(&next) else {
                continue;
            };
            self.names.remove_by_left(&next);
            stack.extend(node.children.iter().rev());
            removed.push(next);
        }
        log::debug!("removed {} frames starting at {id}", removed.len());
        Ok(removed)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ancestors<'a> {
    tree: &'a FrameTree,
    node: Option<FrameId>,
}
impl<'a> Iterator for Ancestors<'a> {
    type Item = FrameId;

    fn next(&mut self) -> Option<Self::Item> {
        let this = self.node?;
        self.node = self.tree.nodes.get(&this)?.parent;
        Some(this)
    }
}

#[derive(Debug, Clone)]
pub struct Dfs<'a> {
    tree: &'a FrameTree,
    stack: Vec<(Option<FrameId>, usize)>,
}
impl<'a> Dfs<'a> {
    fn new(tree: &'a FrameTree) -> Self {
        Self {
            tree,
            stack: vec![(None, 0)],
        }
    }

    fn child(&self, parent: Option<FrameId>, i: usize) -> Option<FrameId> {
        match parent {
            Some(parent) => self.tree.nodes.get(&parent)?.children.get(i).copied(),
            None => self.tree.roots.get(i).copied(),
        }
    }
}
impl<'a> Iterator for Dfs<'a> {
    type Item = FrameId;

    fn next(&mut self) -> Option<Self::Item> {
        Some(loop {
            let (parent, i) = *self.stack.last()?;
            let Some(child) = self.child(parent, i) else {
                self.stack.pop();
                continue;
            };
            if let Some((_, i)) = self.stack.last_mut() {
                *i += 1;
            }
            self.stack.push((Some(child), 0));
            break child;
        })
    }
}
