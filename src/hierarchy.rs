//! Segment hierarchy index for link buses.
//!
//! A bus is stored as a forest of [`Segment`]s. Nodes live in an arena
//! ([`SegmentForest`]) and carry an explicit parent index, so ancestry is a
//! walk up the arena instead of a re-search from the top. Queries are made
//! through [`SegmentNode`], a cheap `Copy` handle borrowing the forest.
//!
//! Two families of queries exist:
//! - *Scoped* queries (`find_node`, `sibling_ids`) only look below a node the
//!   caller supplies. A sibling query whose root does not contain the parent
//!   returns an empty list; use [`SegmentNode::try_sibling_ids`] to get an
//!   error instead.
//! - *Global* queries (`lookup`, `parent`, `siblings`) use the arena links and
//!   do not depend on a caller-supplied root.
//!
//! Bus-drop segments ([`SegmentId::Synthetic`]) never show up in ID lists and
//! never match a lookup.
//!
//! # Example
//!
//! ```
//! use linkbus::hierarchy::SegmentForest;
//! use linkbus::model::Segment;
//!
//! let forest = SegmentForest::from_records(vec![
//!     Segment::named("s1", None),
//!     Segment::named("s2", Some("s1")),
//!     Segment::bus_drop(Some("s1")),
//!     Segment::named("s3", Some("s2")),
//! ])
//! .unwrap();
//! let root = forest.root().unwrap();
//! assert_eq!(root.child_ids(), vec!["s2"]);
//! let s3 = root.find_node(Some("s3")).unwrap();
//! assert!(s3.sibling_ids(root).is_empty());
//! ```

use crate::error::{BuildError, QueryError};
use crate::model::{Segment, SegmentId};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

/// Index of a node in a [`SegmentForest`] arena.
pub type NodeIndex = usize;

#[derive(Debug, Clone)]
struct Entry {
    segment: Segment,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
}

// ────────────────────────────────────────────────────────────────────────────
// SegmentForest
// ────────────────────────────────────────────────────────────────────────────

/// Arena of segment nodes with root list and a global name index.
#[derive(Debug, Clone, Default)]
pub struct SegmentForest {
    entries: Vec<Entry>,
    roots: Vec<NodeIndex>,
    /// First node inserted for each name.
    by_id: IndexMap<String, NodeIndex>,
}

impl SegmentForest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            roots: Vec::new(),
            by_id: IndexMap::with_capacity(capacity),
        }
    }

    /// Assemble a forest from flat records using their stored parent names.
    ///
    /// Children keep the order in which their records appear. Several roots
    /// are allowed. Arena indices are assigned in pre-order.
    pub fn from_records(
        records: impl IntoIterator<Item = Segment>,
    ) -> Result<Self, BuildError> {
        let records: Vec<Segment> = records.into_iter().collect();

        let mut named: IndexMap<&str, usize> = IndexMap::with_capacity(records.len());
        for (i, rec) in records.iter().enumerate() {
            if let Some(name) = rec.id.as_name() {
                if named.insert(name, i).is_some() {
                    return Err(BuildError::DuplicateId(name.to_string()));
                }
            }
        }

        let mut kids: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
        let mut root_records = Vec::new();
        for (i, rec) in records.iter().enumerate() {
            match rec.parent.as_deref() {
                None => root_records.push(i),
                Some(parent) => {
                    let &pi = named.get(parent).ok_or_else(|| BuildError::UnknownParent {
                        child: rec.id.to_string(),
                        parent: parent.to_string(),
                    })?;
                    kids[pi].push(i);
                }
            }
        }

        let mut slots: Vec<Option<Segment>> = records.into_iter().map(Some).collect();
        let mut forest = Self::with_capacity(slots.len());
        let mut stack: Vec<(usize, Option<NodeIndex>)> =
            root_records.iter().rev().map(|&r| (r, None)).collect();
        while let Some((rec, parent)) = stack.pop() {
            let Some(segment) = slots[rec].take() else {
                continue;
            };
            let idx = match parent {
                None => forest.add_root(segment),
                Some(p) => forest.add_child(p, segment),
            };
            stack.extend(kids[rec].iter().rev().map(|&k| (k, Some(idx))));
        }

        let stranded: Vec<String> = slots
            .into_iter()
            .flatten()
            .map(|seg| seg.id.to_string())
            .collect();
        if !stranded.is_empty() {
            return Err(BuildError::Cycle { ids: stranded });
        }

        debug!(
            nodes = forest.len(),
            roots = forest.roots.len(),
            "assembled segment forest"
        );
        Ok(forest)
    }

    /// Add a new root node and return its index.
    pub fn add_root(&mut self, segment: Segment) -> NodeIndex {
        let index = self.push(segment, None);
        self.roots.push(index);
        index
    }

    /// Append `segment` as the last child of `parent` and return its index.
    ///
    /// The segment's stored parent name is kept as given; scoped queries rely
    /// on it, global queries on the arena link.
    ///
    /// # Panics
    /// Panics if `parent` is not an index of this forest.
    pub fn add_child(&mut self, parent: NodeIndex, segment: Segment) -> NodeIndex {
        assert!(parent < self.entries.len(), "parent index {parent} out of range");
        let index = self.push(segment, Some(parent));
        self.entries[parent].children.push(index);
        index
    }

    fn push(&mut self, segment: Segment, parent: Option<NodeIndex>) -> NodeIndex {
        let index = self.entries.len();
        if let Some(name) = segment.id.as_name() {
            self.by_id.entry(name.to_string()).or_insert(index);
        }
        self.entries.push(Entry {
            segment,
            parent,
            children: Vec::new(),
        });
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handle for the node at `index`, if it exists.
    pub fn node(&self, index: NodeIndex) -> Option<SegmentNode<'_>> {
        (index < self.entries.len()).then_some(SegmentNode {
            forest: self,
            index,
        })
    }

    /// The first root, the entry point for most queries.
    pub fn root(&self) -> Option<SegmentNode<'_>> {
        self.roots.first().and_then(|&i| self.node(i))
    }

    pub fn roots(&self) -> impl Iterator<Item = SegmentNode<'_>> + '_ {
        self.roots.iter().map(move |&index| SegmentNode {
            forest: self,
            index,
        })
    }

    /// Global lookup by name. Synthetic segments are never found.
    pub fn lookup(&self, id: &str) -> Option<SegmentNode<'_>> {
        self.by_id.get(id).and_then(|&i| self.node(i))
    }

    /// All nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = SegmentNode<'_>> + '_ {
        (0..self.entries.len()).map(move |index| SegmentNode {
            forest: self,
            index,
        })
    }

    /// Serializable view of every tree in the forest.
    pub fn to_views(&self) -> Vec<TreeView> {
        self.roots().map(|r| r.to_view()).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SegmentNode
// ────────────────────────────────────────────────────────────────────────────

/// Borrowed handle to one node of a [`SegmentForest`].
///
/// Two handles are equal only when they point at the same node of the same
/// forest; segments with equal names are still told apart.
#[derive(Debug, Clone, Copy)]
pub struct SegmentNode<'a> {
    forest: &'a SegmentForest,
    index: NodeIndex,
}

impl PartialEq for SegmentNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.forest, other.forest) && self.index == other.index
    }
}

impl Eq for SegmentNode<'_> {}

impl<'a> SegmentNode<'a> {
    fn entry(&self) -> &'a Entry {
        &self.forest.entries[self.index]
    }

    fn at(&self, index: NodeIndex) -> SegmentNode<'a> {
        SegmentNode {
            forest: self.forest,
            index,
        }
    }

    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn segment(&self) -> &'a Segment {
        &self.entry().segment
    }

    pub fn id(&self) -> &'a SegmentId {
        &self.entry().segment.id
    }

    /// The stored parent name; `None` for a root.
    pub fn parent_id(&self) -> Option<&'a str> {
        self.entry().segment.parent.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.entry().children.is_empty()
    }

    pub fn children(self) -> impl Iterator<Item = SegmentNode<'a>> + 'a {
        let forest = self.forest;
        self.entry()
            .children
            .iter()
            .map(move |&index| SegmentNode { forest, index })
    }

    /// Names of the children in order, skipping bus drops.
    pub fn child_ids(&self) -> Vec<&'a str> {
        self.children().filter_map(|c| c.id().as_name()).collect()
    }

    /// Pre-order walk of this node's subtree, starting with the node itself.
    pub fn preorder(&self) -> Preorder<'a> {
        Preorder {
            forest: self.forest,
            stack: vec![self.index],
        }
    }

    /// Find the node named `id` within this subtree.
    ///
    /// The node itself is checked first, then each child's subtree in order;
    /// the first match wins. `None` never matches anything.
    pub fn find_node(&self, id: Option<&str>) -> Option<SegmentNode<'a>> {
        let id = id?;
        self.preorder().find(|n| n.id().as_name() == Some(id))
    }

    /// Names of the other children of this node's parent, with the parent
    /// located by searching from `root`.
    ///
    /// Returns an empty list for a root, and also when `root` does not contain
    /// the parent.
    pub fn sibling_ids(&self, root: SegmentNode<'a>) -> Vec<&'a str> {
        match self.try_sibling_ids(root) {
            Ok(ids) => ids,
            Err(err) => {
                warn!(segment = %self.id(), "sibling lookup missed: {err}");
                Vec::new()
            }
        }
    }

    /// Like [`sibling_ids`](Self::sibling_ids), but reports a parent that is
    /// not below `root` as an error.
    pub fn try_sibling_ids(&self, root: SegmentNode<'a>) -> Result<Vec<&'a str>, QueryError> {
        let Some(parent_id) = self.parent_id() else {
            return Ok(Vec::new());
        };
        let parent = root
            .find_node(Some(parent_id))
            .ok_or_else(|| QueryError::ParentNotInRoot {
                parent: parent_id.to_string(),
            })?;
        Ok(self.named_siblings_under(parent))
    }

    fn named_siblings_under(&self, parent: SegmentNode<'a>) -> Vec<&'a str> {
        parent
            .children()
            .filter(|c| c != self)
            .filter_map(|c| c.id().as_name())
            .collect()
    }

    /// Parent via the arena link.
    pub fn parent(&self) -> Option<SegmentNode<'a>> {
        self.entry().parent.map(|p| self.at(p))
    }

    /// Other children of the arena parent, bus drops included.
    pub fn siblings(self) -> impl Iterator<Item = SegmentNode<'a>> + 'a {
        let me = self;
        self.parent()
            .into_iter()
            .flat_map(|p| p.children())
            .filter(move |c| *c != me)
    }

    /// Sibling names using the arena parent; independent of any root.
    pub fn sibling_ids_global(&self) -> Vec<&'a str> {
        match self.parent() {
            Some(parent) => self.named_siblings_under(parent),
            None => Vec::new(),
        }
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(self) -> impl Iterator<Item = SegmentNode<'a>> + 'a {
        std::iter::successors(self.parent(), |n| n.parent())
    }

    /// Names of all ancestors, nearest first, skipping bus drops.
    pub fn ancestor_ids(&self) -> Vec<&'a str> {
        self.ancestors().filter_map(|n| n.id().as_name()).collect()
    }

    /// Number of arena links between this node and its root.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    pub fn is_descendant_of(&self, other: SegmentNode<'a>) -> bool {
        self.ancestors().any(|a| a == other)
    }

    pub fn to_view(&self) -> TreeView {
        TreeView {
            id: self.id().as_name().map(str::to_string),
            parent: self.parent_id().map(str::to_string),
            children: self.children().map(|c| c.to_view()).collect(),
        }
    }
}

/// Pre-order iterator over a subtree.
pub struct Preorder<'a> {
    forest: &'a SegmentForest,
    stack: Vec<NodeIndex>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = SegmentNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        self.stack
            .extend(self.forest.entries[index].children.iter().rev().copied());
        Some(SegmentNode {
            forest: self.forest,
            index,
        })
    }
}

/// Nested, serializable rendering of a subtree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeView {
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeView>,
}
