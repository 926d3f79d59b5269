//! Link tree data model
//!
//! The traversal builds the tree in two phases. While crawling, every
//! discovered link becomes a [`DiscoveredLink`] record in a [`TreeBuilder`]
//! arena and receives its child list at most once, when it is expanded. After
//! the traversal the arena is folded into an immutable [`LinkNode`] tree.

use crate::url::NormalizedUrl;
use serde::Serialize;

/// A link as it was found: anchor text plus normalized target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    pub text: String,
    pub url: NormalizedUrl,
}

/// A node of the finished link tree
///
/// `children` is `None` for nodes that were never expanded (a duplicate of an
/// already visited URL, or a node left over when the page cap was reached) and
/// `Some` for every expanded node, empty for leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkNode {
    pub text: String,
    pub url: NormalizedUrl,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<LinkNode>>,
}

impl LinkNode {
    /// Returns true if this node was expanded and has no children
    pub fn is_leaf(&self) -> bool {
        matches!(&self.children, Some(children) if children.is_empty())
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(LinkNode::node_count)
            .sum::<usize>()
    }
}

/// Index of a node inside a [`TreeBuilder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Slot {
    link: DiscoveredLink,
    children: Option<Vec<NodeId>>,
}

/// Arena of discovered links with write-once child lists
///
/// `NodeId(0)` is the root; every other id indexes `slots` offset by one.
#[derive(Debug)]
pub struct TreeBuilder {
    root: Slot,
    slots: Vec<Slot>,
}

impl TreeBuilder {
    /// Creates a builder holding only the root node
    ///
    /// The root's display text is its own URL.
    pub fn new(root: NormalizedUrl) -> (Self, NodeId) {
        let builder = Self {
            root: Slot {
                link: DiscoveredLink {
                    text: root.to_string(),
                    url: root,
                },
                children: None,
            },
            slots: Vec::new(),
        };
        (builder, NodeId(0))
    }

    fn slot(&self, id: NodeId) -> &Slot {
        match id.0 {
            0 => &self.root,
            n => &self.slots[n - 1],
        }
    }

    fn slot_mut(&mut self, id: NodeId) -> &mut Slot {
        match id.0 {
            0 => &mut self.root,
            n => &mut self.slots[n - 1],
        }
    }

    /// The discovery record of a node
    pub fn link(&self, id: NodeId) -> &DiscoveredLink {
        &self.slot(id).link
    }

    /// Returns true once a node has received its child list
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.slot(id).children.is_some()
    }

    /// Attaches the expansion result of `parent` and returns the new child ids
    ///
    /// A node is expanded at most once; a second call leaves the existing
    /// children in place and returns no ids.
    pub fn attach(&mut self, parent: NodeId, links: Vec<DiscoveredLink>) -> Vec<NodeId> {
        if self.is_expanded(parent) {
            tracing::warn!("Node {} was already expanded", self.link(parent).url);
            return Vec::new();
        }

        let ids: Vec<NodeId> = links
            .into_iter()
            .map(|link| {
                self.slots.push(Slot {
                    link,
                    children: None,
                });
                NodeId(self.slots.len())
            })
            .collect();

        self.slot_mut(parent).children = Some(ids.clone());
        ids
    }

    /// Number of nodes discovered so far, including the root
    pub fn node_count(&self) -> usize {
        self.slots.len() + 1
    }

    /// Folds the arena into the immutable tree
    ///
    /// Children are always pushed after their parent, so walking the arena
    /// backwards finishes every child before the node that owns it.
    pub fn build(self) -> LinkNode {
        let mut built: Vec<Option<LinkNode>> = Vec::with_capacity(self.slots.len() + 1);
        built.resize_with(self.slots.len() + 1, || None);

        for (index, slot) in self.slots.into_iter().enumerate().rev() {
            let node = finish(slot, &mut built);
            built[index + 1] = Some(node);
        }

        finish(self.root, &mut built)
    }
}

fn finish(slot: Slot, built: &mut [Option<LinkNode>]) -> LinkNode {
    LinkNode {
        text: slot.link.text,
        url: slot.link.url,
        children: slot.children.map(|ids| {
            ids.into_iter()
                .filter_map(|child| built[child.0].take())
                .collect()
        }),
    }
}
