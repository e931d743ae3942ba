//! The size tree: an arena of labelled nodes whose costs always add up.
//!
//! The tree is built in two phases that are reflected in two types:
//!
//! - [`SizeTreeBuilder`] accepts costs while the metadata walk is in progress. Every insertion
//!   creates or reuses path nodes below the root, places the cost, and immediately propagates
//!   it to every ancestor, so a node's cost equals its own cost plus the costs of its children
//!   after every call.
//! - [`SizeTree`] is produced by [`SizeTreeBuilder::finalize`], which reconciles the root
//!   against the real file size with an `Other Overhead` leaf and sorts every level by
//!   descending cost. A finished tree can still be decluttered with [`SizeTree::filter`].
//!
//! Nodes live in a flat `Vec` and refer to each other through [`NodeId`] indices. A node stores
//! its parent index, which turns propagation into an iterative walk of `O(depth)` steps.
//!
//! # Examples
//!
//! ```rust
//! use dotsizer::sizer::tree::SizeTreeBuilder;
//!
//! let mut builder = SizeTreeBuilder::new("MyApp");
//! builder.charge(&["MyApp", "Program"], 40)?;
//! builder.add(&["MyApp", "Program"], "Main", 80)?;
//!
//! let tree = builder.finalize(1000)?;
//! assert_eq!(tree.root().cost(), 1000);
//! assert_eq!(tree.find(&["Other Overhead"]).map(|node| node.cost()), Some(880));
//! # Ok::<(), dotsizer::Error>(())
//! ```

use std::{collections::HashMap, fmt, mem};

use serde::{ser::SerializeStruct, Serialize, Serializer};
use strum::Display;

use crate::{Error, Result};

/// Label of the reconciliation leaf added by [`SizeTreeBuilder::finalize`].
pub const OTHER_OVERHEAD: &str = "Other Overhead";

/// Label of the nodes that replace pruned siblings in [`SizeTree::filter`].
pub const FILTERED: &str = "... <Filtered> ...";

/// Index of a node inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// The analyzed module
    Module,
    /// A namespace segment, a type, or the resources folder
    Path,
    /// A costed element such as a method, a field bucket or a resource
    Element,
    /// The residual between the real file size and the costed elements
    Overhead,
    /// Siblings pruned by [`SizeTree::filter`]
    Filtered,
}

#[derive(Debug, Clone)]
struct SizeNode {
    label: String,
    kind: NodeKind,
    /// Cost assigned directly to this node
    own: u64,
    /// `own` plus the cost of all children
    cost: u64,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    expanded: bool,
}

impl SizeNode {
    fn new(label: String, kind: NodeKind, parent: Option<NodeId>) -> Self {
        SizeNode {
            label,
            kind,
            own: 0,
            cost: 0,
            parent,
            children: Vec::new(),
            expanded: false,
        }
    }
}

const ROOT: NodeId = NodeId(0);

fn checked_cost(cost: i64) -> Result<u64> {
    u64::try_from(cost).map_err(|_| inconsistency_error!("Negative element cost {}", cost))
}

/// Accumulates costs into a tree while a module is being walked.
#[derive(Debug)]
pub struct SizeTreeBuilder {
    nodes: Vec<SizeNode>,
    /// Path nodes by parent and label
    paths: HashMap<(NodeId, String), NodeId>,
    /// Folder below the root holding resources, kept apart from namespace segments
    resources: Option<NodeId>,
}

impl SizeTreeBuilder {
    /// Creates a builder whose root carries `root_label`.
    #[must_use]
    pub fn new(root_label: impl Into<String>) -> Self {
        SizeTreeBuilder {
            nodes: vec![SizeNode::new(root_label.into(), NodeKind::Module, None)],
            paths: HashMap::new(),
            resources: None,
        }
    }

    /// Returns the aggregated cost of everything added so far.
    #[must_use]
    pub fn cost(&self) -> u64 {
        self.nodes[ROOT.0].cost
    }

    /// Returns the number of nodes created so far, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if nothing but the root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Adds a new leaf `label` with `cost` below `path`.
    ///
    /// Path segments are resolved top-down from the root and created on first use; repeated
    /// segments under the same parent merge into one node. The leaf itself is always new, so
    /// two elements with the same label (method overloads) become two siblings.
    ///
    /// # Errors
    /// Returns [`Error::Inconsistency`] for a negative cost or an overflowing total. The tree
    /// is left untouched in both cases.
    pub fn add<S: AsRef<str>>(&mut self, path: &[S], label: &str, cost: i64) -> Result<NodeId> {
        let cost = self.admit(cost)?;
        let parent = self.resolve(path);
        let leaf = self.push(parent, label.to_string(), NodeKind::Element);
        self.assign(leaf, cost);
        Ok(leaf)
    }

    /// Adds a new leaf `label` with `cost` to the resources folder `folder` below the root.
    ///
    /// The folder is created on first use and never shares a node with a namespace or type
    /// segment of the same name, so a type called `Resources` keeps its own node.
    ///
    /// # Errors
    /// Returns [`Error::Inconsistency`] for a negative cost or an overflowing total. The tree
    /// is left untouched in both cases.
    pub fn add_resource(&mut self, folder: &str, label: &str, cost: i64) -> Result<NodeId> {
        let cost = self.admit(cost)?;
        let parent = match self.resources {
            Some(existing) => existing,
            None => {
                let node = self.push(ROOT, folder.to_string(), NodeKind::Path);
                self.resources = Some(node);
                node
            }
        };
        let leaf = self.push(parent, label.to_string(), NodeKind::Element);
        self.assign(leaf, cost);
        Ok(leaf)
    }

    /// Charges `cost` to the path node at the end of `path`, creating the path as needed.
    ///
    /// This is how a type's own bookkeeping cost is placed on the node that also parents its
    /// members. Charging the same path repeatedly accumulates; an empty path charges the root.
    ///
    /// # Errors
    /// Returns [`Error::Inconsistency`] for a negative cost or an overflowing total. The tree
    /// is left untouched in both cases.
    pub fn charge<S: AsRef<str>>(&mut self, path: &[S], cost: i64) -> Result<NodeId> {
        let cost = self.admit(cost)?;
        let node = self.resolve(path);
        self.assign(node, cost);
        Ok(node)
    }

    /// Reconciles the tree against `total`, sorts it and returns the finished tree.
    ///
    /// The residual `total - cost()` becomes an `Other Overhead` leaf directly below the root,
    /// even when it is zero, so the root cost equals `total` exactly.
    ///
    /// # Errors
    /// Returns [`Error::NegativeResidual`] if the costed elements exceed `total`.
    pub fn finalize(mut self, total: u64) -> Result<SizeTree> {
        let estimated = self.cost();
        let Some(residual) = total.checked_sub(estimated) else {
            return Err(Error::NegativeResidual { total, estimated });
        };

        let overhead = self.push(ROOT, OTHER_OVERHEAD.to_string(), NodeKind::Overhead);
        self.assign(overhead, residual);

        let mut tree = SizeTree { nodes: self.nodes };
        tree.sort();
        tree.nodes[ROOT.0].expanded = true;

        debug_assert!(tree.verify().is_ok(), "size tree invariants broken");
        Ok(tree)
    }

    fn admit(&self, cost: i64) -> Result<u64> {
        let cost = checked_cost(cost)?;
        // the root bounds every other node, so checking it covers all ancestors
        if self.cost().checked_add(cost).is_none() {
            return Err(inconsistency_error!(
                "Adding {} bytes overflows the total of {}",
                cost,
                self.cost()
            ));
        }
        Ok(cost)
    }

    fn resolve<S: AsRef<str>>(&mut self, path: &[S]) -> NodeId {
        let mut current = ROOT;
        for segment in path {
            let segment = segment.as_ref();
            current = match self.paths.get(&(current, segment.to_string())) {
                Some(&existing) => existing,
                None => {
                    let node = self.push(current, segment.to_string(), NodeKind::Path);
                    self.paths.insert((current, segment.to_string()), node);
                    node
                }
            };
        }
        current
    }

    fn push(&mut self, parent: NodeId, label: String, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SizeNode::new(label, kind, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    fn assign(&mut self, node: NodeId, cost: u64) {
        self.nodes[node.0].own += cost;

        let mut current = Some(node);
        while let Some(id) = current {
            let entry = &mut self.nodes[id.0];
            entry.cost += cost;
            current = entry.parent;
        }
    }
}

/// A finished, reconciled and sorted size tree.
#[derive(Debug, Clone)]
pub struct SizeTree {
    nodes: Vec<SizeNode>,
}

impl SizeTree {
    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: ROOT,
        }
    }

    /// Returns the node with the given id, if it exists.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// Returns the root cost, which equals the reconciled file size.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.nodes[ROOT.0].cost
    }

    /// Returns the number of nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds at least its root and the overhead leaf.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Follows `labels` from the root and returns the first match at every level.
    #[must_use]
    pub fn find(&self, labels: &[&str]) -> Option<NodeRef<'_>> {
        let mut current = self.root();
        for label in labels {
            current = current.children().find(|child| child.label() == *label)?;
        }
        Some(current)
    }

    /// Iterates over all nodes depth first, visiting children in their sorted order.
    pub fn walk(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        let mut stack = vec![ROOT];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.nodes[id.0].children.iter().rev());
            Some(NodeRef { tree: self, id })
        })
    }

    /// Returns all leaves, largest first.
    #[must_use]
    pub fn leaves(&self) -> Vec<NodeRef<'_>> {
        let mut leaves: Vec<_> = self.walk().filter(|node| node.is_leaf()).collect();
        leaves.sort_by(|a, b| b.cost().cmp(&a.cost()));
        leaves
    }

    /// Prunes every node cheaper than `threshold`.
    ///
    /// Each level is handled independently: children below the threshold are removed without
    /// looking at their descendants, the remaining children are filtered recursively, and the
    /// removed costs of one level are gathered into a single `... <Filtered> ...` node placed at
    /// its sorted position. Costs and ordering invariants hold afterwards.
    pub fn filter(&mut self, threshold: u64) {
        let mut pending = vec![ROOT];
        while let Some(id) = pending.pop() {
            let children = mem::take(&mut self.nodes[id.0].children);
            let (mut kept, removed): (Vec<NodeId>, Vec<NodeId>) = children
                .into_iter()
                .partition(|child| self.nodes[child.0].cost >= threshold);

            let removed_cost: u64 = removed.iter().map(|child| self.nodes[child.0].cost).sum();
            pending.extend(kept.iter().copied());

            if removed_cost != 0 {
                let filtered = NodeId(self.nodes.len());
                let mut node = SizeNode::new(FILTERED.to_string(), NodeKind::Filtered, Some(id));
                node.own = removed_cost;
                node.cost = removed_cost;
                self.nodes.push(node);

                let position =
                    kept.partition_point(|child| self.nodes[child.0].cost >= removed_cost);
                kept.insert(position, filtered);
            }
            self.nodes[id.0].children = kept;
        }

        self.compact();
        debug_assert!(self.verify().is_ok(), "size tree invariants broken");
    }

    /// Checks the cost invariant, the descending order and the parent links of every node.
    ///
    /// # Errors
    /// Returns [`Error::Inconsistency`] describing the first violation.
    pub fn verify(&self) -> Result<()> {
        for node in self.walk() {
            let entry = &self.nodes[node.id.0];
            let mut sum = entry.own;
            for child in &entry.children {
                let child = &self.nodes[child.0];
                sum = sum.checked_add(child.cost).ok_or_else(|| {
                    inconsistency_error!("Cost of '{}' overflows", entry.label)
                })?;
            }
            if sum != entry.cost {
                return Err(inconsistency_error!(
                    "'{}' costs {} but its parts add up to {}",
                    entry.label,
                    entry.cost,
                    sum
                ));
            }

            for pair in entry.children.windows(2) {
                if self.nodes[pair[0].0].cost < self.nodes[pair[1].0].cost {
                    return Err(inconsistency_error!(
                        "Children of '{}' are not sorted by descending cost",
                        entry.label
                    ));
                }
            }

            for child in &entry.children {
                if self.nodes[child.0].parent != Some(node.id) {
                    return Err(inconsistency_error!(
                        "'{}' is not linked back to its parent '{}'",
                        self.nodes[child.0].label,
                        entry.label
                    ));
                }
            }
        }
        Ok(())
    }

    fn sort(&mut self) {
        for index in 0..self.nodes.len() {
            let mut children = mem::take(&mut self.nodes[index].children);
            children.sort_by(|a, b| self.nodes[b.0].cost.cmp(&self.nodes[a.0].cost));
            self.nodes[index].children = children;
        }
    }

    /// Drops nodes that are no longer reachable from the root and renumbers the rest.
    fn compact(&mut self) {
        let order: Vec<NodeId> = self.walk().map(|node| node.id).collect();
        if order.len() == self.nodes.len() {
            return;
        }

        let mut remap = vec![None; self.nodes.len()];
        for (new, old) in order.iter().enumerate() {
            remap[old.0] = Some(NodeId(new));
        }

        let mut nodes = Vec::with_capacity(order.len());
        for old in order {
            let mut node = self.nodes[old.0].clone();
            node.parent = node.parent.and_then(|parent| remap[parent.0]);
            node.children = node
                .children
                .iter()
                .filter_map(|child| remap[child.0])
                .collect();
            nodes.push(node);
        }
        self.nodes = nodes;
    }
}

/// A borrowed view of one node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a SizeTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn entry(&self) -> &'a SizeNode {
        &self.tree.nodes[self.id.0]
    }

    /// Node id within the tree.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &'a str {
        &self.entry().label
    }

    /// Aggregated cost in bytes.
    #[must_use]
    pub fn cost(&self) -> u64 {
        self.entry().cost
    }

    /// Cost assigned to this node itself, excluding children.
    #[must_use]
    pub fn own_cost(&self) -> u64 {
        self.entry().own
    }

    /// What the node represents.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.entry().kind
    }

    /// True if the presentation should show this node expanded initially.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.entry().expanded
    }

    /// True if the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.entry().children.is_empty()
    }

    /// The owning node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.entry().parent.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    /// Children in descending cost order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.entry()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.entry().children.len()
    }

    /// Distance from the root, which has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.entry().parent;
        while let Some(id) = current {
            depth += 1;
            current = self.tree.nodes[id.0].parent;
        }
        depth
    }

    /// Labels from below the root down to this node.
    #[must_use]
    pub fn path(&self) -> Vec<&'a str> {
        let mut labels = Vec::new();
        let mut current = Some(*self);
        while let Some(node) = current {
            if node.parent().is_some() {
                labels.push(node.label());
            }
            current = node.parent();
        }
        labels.reverse();
        labels
    }

    /// Fraction of `total` this node accounts for, 0 when `total` is 0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn share_of(&self, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.cost() as f64 / total as f64
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("label", &self.label())
            .field("cost", &self.cost())
            .finish()
    }
}

struct Children<'a>(NodeRef<'a>);

impl Serialize for Children<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.children())
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SizeNode", 4)?;
        state.serialize_field("label", self.label())?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("cost", &self.cost())?;
        state.serialize_field("children", &Children(*self))?;
        state.end()
    }
}

impl Serialize for SizeTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels<'a>(node: NodeRef<'a>) -> Vec<&'a str> {
        node.children().map(|child| child.label()).collect()
    }

    #[test]
    fn test_add_propagates_to_ancestors() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add(&["A", "B"], "Run", 30).unwrap();
        builder.add(&["A", "B"], "Stop", 12).unwrap();
        builder.add(&["A"], "Helper", 8).unwrap();
        assert_eq!(builder.cost(), 50);

        let tree = builder.finalize(50).unwrap();
        assert_eq!(tree.find(&["A"]).unwrap().cost(), 50);
        assert_eq!(tree.find(&["A", "B"]).unwrap().cost(), 42);
        assert_eq!(tree.find(&["A", "B", "Run"]).unwrap().cost(), 30);
        assert_eq!(tree.find(&[OTHER_OVERHEAD]).unwrap().cost(), 0);
        tree.verify().unwrap();
    }

    #[test]
    fn test_path_merging() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.charge(&["A", "B"], 10).unwrap();
        builder.charge(&["A", "C"], 20).unwrap();
        // root, A, B, C
        assert_eq!(builder.len(), 4);

        let tree = builder.finalize(30).unwrap();
        let a: Vec<_> = tree.root().children().filter(|n| n.label() == "A").collect();
        assert_eq!(a.len(), 1);
        assert_eq!(labels(a[0]), vec!["C", "B"]);
    }

    #[test]
    fn test_leaves_are_never_merged() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add(&["T"], "Overload", 5).unwrap();
        builder.add(&["T"], "Overload", 7).unwrap();

        let tree = builder.finalize(12).unwrap();
        let t = tree.find(&["T"]).unwrap();
        assert_eq!(t.child_count(), 2);
        assert_eq!(t.cost(), 12);
    }

    #[test]
    fn test_charge_accumulates_own_cost() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add(&["Outer", "Inner"], "M", 4).unwrap();
        builder.charge(&["Outer"], 20).unwrap();
        builder.charge(&["Outer"], 5).unwrap();

        let tree = builder.finalize(29).unwrap();
        let outer = tree.find(&["Outer"]).unwrap();
        assert_eq!(outer.own_cost(), 25);
        assert_eq!(outer.cost(), 29);
        assert_eq!(outer.kind(), NodeKind::Path);
    }

    #[test]
    fn test_resources_folder_is_not_a_path_segment() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add_resource("Resources", "Manifest Resource: r.bin", 2).unwrap();
        builder.charge(&["Resources"], 29).unwrap();
        builder.add(&["Resources"], "Load", 40).unwrap();
        builder.add_resource("Resources", "Resource: Icon #1", 5).unwrap();
        let tree = builder.finalize(76).unwrap();

        let folders: Vec<_> = tree
            .root()
            .children()
            .filter(|child| child.label() == "Resources")
            .collect();
        assert_eq!(folders.len(), 2);

        // the type sorts first with 69 bytes, the folder follows with 7
        assert_eq!(folders[0].own_cost(), 29);
        assert_eq!(labels(folders[0]), vec!["Load"]);
        assert_eq!(folders[1].own_cost(), 0);
        assert_eq!(folders[1].cost(), 7);
        assert_eq!(
            labels(folders[1]),
            vec!["Resource: Icon #1", "Manifest Resource: r.bin"]
        );
        tree.verify().unwrap();
    }

    #[test]
    fn test_negative_cost_is_rejected() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add(&["A"], "ok", 3).unwrap();
        let before = builder.len();

        assert!(matches!(
            builder.add(&["B", "C"], "bad", -1),
            Err(Error::Inconsistency { .. })
        ));
        assert!(matches!(
            builder.charge(&["D"], -10),
            Err(Error::Inconsistency { .. })
        ));
        assert_eq!(builder.len(), before);
        assert_eq!(builder.cost(), 3);
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut builder = SizeTreeBuilder::new("Module");
        for _ in 0..2 {
            builder.add(&["A"], "big", i64::MAX).unwrap();
        }
        assert!(builder.add(&["A"], "one more", i64::MAX).is_err());
        assert_eq!(builder.cost(), 2 * i64::MAX as u64);
    }

    #[test]
    fn test_finalize_reconciles() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.charge(&["Type"], 120).unwrap();

        let tree = builder.finalize(1000).unwrap();
        assert_eq!(tree.total(), 1000);
        assert_eq!(labels(tree.root()), vec![OTHER_OVERHEAD, "Type"]);
        assert_eq!(tree.root().children().next().unwrap().cost(), 880);
        assert_eq!(
            tree.root().children().next().unwrap().kind(),
            NodeKind::Overhead
        );
        assert!(tree.root().is_expanded());
    }

    #[test]
    fn test_negative_residual() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add::<&str>(&[], "Huge", 200).unwrap();

        match builder.finalize(100) {
            Err(Error::NegativeResidual { total, estimated }) => {
                assert_eq!(total, 100);
                assert_eq!(estimated, 200);
            }
            other => panic!("Expected NegativeResidual, got {other:?}"),
        }
    }

    #[test]
    fn test_sorted_at_every_level() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add(&["N", "Small"], "a", 1).unwrap();
        builder.add(&["N", "Big"], "b", 100).unwrap();
        builder.add(&["N", "Big"], "c", 300).unwrap();
        builder.add(&["N", "Mid"], "d", 50).unwrap();
        builder.add(&["Z"], "e", 2).unwrap();

        let tree = builder.finalize(500).unwrap();
        assert_eq!(labels(tree.find(&["N"]).unwrap()), vec!["Big", "Mid", "Small"]);
        assert_eq!(labels(tree.find(&["N", "Big"]).unwrap()), vec!["c", "b"]);
        for node in tree.walk() {
            let costs: Vec<_> = node.children().map(|child| child.cost()).collect();
            assert!(costs.windows(2).all(|pair| pair[0] >= pair[1]));
        }
    }

    #[test]
    fn test_walk_and_paths() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add(&["A", "B"], "m", 10).unwrap();
        let tree = builder.finalize(10).unwrap();

        let visited: Vec<_> = tree.walk().map(|node| node.label()).collect();
        assert_eq!(visited, vec!["Module", "A", "B", "m", OTHER_OVERHEAD]);

        let m = tree.find(&["A", "B", "m"]).unwrap();
        assert_eq!(m.path(), vec!["A", "B", "m"]);
        assert_eq!(m.depth(), 3);
        assert_eq!(m.parent().unwrap().label(), "B");
        assert!(tree.root().parent().is_none());
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_leaves() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add(&["A"], "x", 5).unwrap();
        builder.add(&["B"], "y", 50).unwrap();
        let tree = builder.finalize(60).unwrap();

        let leaves: Vec<_> = tree.leaves().iter().map(|node| node.label()).collect();
        assert_eq!(leaves, vec!["y", OTHER_OVERHEAD, "x"]);
    }

    #[test]
    fn test_filter() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add(&["A"], "big", 500).unwrap();
        builder.add(&["A"], "tiny1", 3).unwrap();
        builder.add(&["A"], "tiny2", 4).unwrap();
        builder.add(&["B"], "small", 9).unwrap();
        builder.add(&["C"], "mid", 60).unwrap();
        let mut tree = builder.finalize(1000).unwrap();

        tree.filter(10);

        assert_eq!(tree.total(), 1000);
        tree.verify().unwrap();

        // B (9) is pruned at the top level
        assert_eq!(
            labels(tree.root()),
            vec![OTHER_OVERHEAD, "A", "C", FILTERED]
        );
        let top_filtered = tree.find(&[FILTERED]).unwrap();
        assert_eq!(top_filtered.cost(), 9);
        assert_eq!(top_filtered.kind(), NodeKind::Filtered);

        // tiny1 and tiny2 are folded inside A independently
        assert_eq!(labels(tree.find(&["A"]).unwrap()), vec!["big", FILTERED]);
        assert_eq!(tree.find(&["A", FILTERED]).unwrap().cost(), 7);

        // compaction dropped the pruned nodes
        assert_eq!(tree.len(), tree.walk().count());
        assert!(tree.walk().all(|node| node.label() != "small"));
    }

    #[test]
    fn test_filter_places_filtered_node_in_order() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add(&["P"], "a", 40).unwrap();
        for i in 0..10 {
            builder.add(&["P"], &format!("small{i}"), 5).unwrap();
        }
        builder.add(&["P"], "b", 30).unwrap();
        let mut tree = builder.finalize(120).unwrap();

        tree.filter(6);
        assert_eq!(labels(tree.find(&["P"]).unwrap()), vec![FILTERED, "a", "b"]);
        tree.verify().unwrap();
    }

    #[test]
    fn test_filter_keeps_cost_equal_to_threshold() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add(&["P"], "top", 20).unwrap();
        builder.add(&["P"], "edge", 10).unwrap();
        builder.add(&["P"], "below", 9).unwrap();
        let mut tree = builder.finalize(39).unwrap();

        tree.filter(10);
        assert_eq!(labels(tree.root()), vec!["P"]);
        assert_eq!(labels(tree.find(&["P"]).unwrap()), vec!["top", "edge", FILTERED]);
        assert_eq!(tree.find(&["P", "edge"]).unwrap().cost(), 10);
        assert_eq!(tree.find(&["P", FILTERED]).unwrap().cost(), 9);
        assert_eq!(tree.total(), 39);
        tree.verify().unwrap();
    }

    #[test]
    fn test_filter_drops_zero_cost_without_marker() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add(&["P"], "zero", 0).unwrap();
        builder.add(&["P"], "real", 10).unwrap();
        let mut tree = builder.finalize(10).unwrap();

        tree.filter(1);
        assert_eq!(labels(tree.find(&["P"]).unwrap()), vec!["real"]);
        tree.verify().unwrap();
    }

    #[test]
    fn test_serialize() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add(&["A"], "m", 10).unwrap();
        let tree = builder.finalize(16).unwrap();

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["label"], "Module");
        assert_eq!(json["kind"], "module");
        assert_eq!(json["cost"], 16);
        assert_eq!(json["children"][0]["label"], "A");
        assert_eq!(json["children"][0]["children"][0]["cost"], 10);
        assert_eq!(json["children"][1]["label"], OTHER_OVERHEAD);
    }

    #[test]
    fn test_share_of() {
        let mut builder = SizeTreeBuilder::new("Module");
        builder.add(&["A"], "m", 25).unwrap();
        let tree = builder.finalize(100).unwrap();

        let a = tree.find(&["A"]).unwrap();
        assert!((a.share_of(100) - 0.25).abs() < f64::EPSILON);
        assert_eq!(a.share_of(0), 0.0);
    }
}
