//! Arena-indexed rooted phylogenetic tree
//!
//! Nodes are numbered `0..n_nodes` with leaves first (`0..n_leaves`), so a
//! leaf index equals the feature index it carries. Every node except the root
//! stores its incoming edge and parent; walking parents from any node ends at
//! the root.

use ecodive_core::{error::try_zeroed, Error, Result};

/// Edge leading into a node from its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incoming {
    /// Position of the edge in the edge list
    pub edge: usize,
    /// Parent node
    pub parent: usize,
    /// Branch length
    pub length: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Node {
    /// `None` only for the root
    pub incoming: Option<Incoming>,
}

/// Rooted tree with one leaf per feature
#[derive(Debug, Clone, PartialEq)]
pub struct PhyloTree {
    nodes: Vec<Node>,
    lengths: Vec<f64>,
    n_leaves: usize,
    root: usize,
}

impl PhyloTree {
    /// Build from 0-based `(parent, child)` edges.
    ///
    /// A tree with `E` edges has `E + 1` nodes; leaves must be `0..n_leaves`.
    pub fn from_edges(n_leaves: usize, edges: &[(usize, usize)], lengths: &[f64]) -> Result<Self> {
        if edges.len() != lengths.len() {
            return Err(Error::invalid_tree(format!(
                "{} edges but {} branch lengths",
                edges.len(),
                lengths.len()
            )));
        }
        if edges.is_empty() {
            return Err(Error::invalid_tree("tree has no edges"));
        }
        if let Some((edge, &length)) = lengths
            .iter()
            .enumerate()
            .find(|(_, l)| !(l.is_finite() && **l >= 0.0))
        {
            return Err(Error::invalid_tree(format!(
                "edge {edge} has invalid length {length}"
            )));
        }

        let n_nodes = edges.len() + 1;
        let mut nodes: Vec<Node> = try_zeroed(n_nodes, "tree nodes")?;
        for (edge, (&(parent, child), &length)) in edges.iter().zip(lengths).enumerate() {
            if parent >= n_nodes || child >= n_nodes {
                return Err(Error::invalid_tree(format!(
                    "edge {edge} ({parent} -> {child}) references a node outside 0..{n_nodes}"
                )));
            }
            if parent < n_leaves {
                return Err(Error::invalid_tree(format!("leaf {parent} has children")));
            }
            let slot = &mut nodes[child].incoming;
            if slot.is_some() {
                return Err(Error::invalid_tree(format!("node {child} has multiple parents")));
            }
            *slot = Some(Incoming {
                edge,
                parent,
                length,
            });
        }

        let mut roots = nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.incoming.is_none())
            .map(|(i, _)| i);
        let root = match (roots.next(), roots.next()) {
            (Some(root), None) => root,
            (None, _) => return Err(Error::invalid_tree("no root node")),
            (Some(a), Some(b)) => {
                return Err(Error::invalid_tree(format!(
                    "multiple root nodes ({a}, {b}, ...)"
                )))
            }
        };
        if root < n_leaves {
            return Err(Error::invalid_tree(format!("root {root} is a leaf")));
        }

        check_acyclic(&nodes)?;

        Ok(Self {
            nodes,
            lengths: lengths.to_vec(),
            n_leaves,
            root,
        })
    }

    /// Build from a 1-based edge matrix where tips are `1..=n_tips` and the
    /// root is `n_tips + 1`.
    pub fn from_ape_edges(n_tips: usize, edges: &[[usize; 2]], lengths: &[f64]) -> Result<Self> {
        let mut zero_based = Vec::with_capacity(edges.len());
        for (edge, &[parent, child]) in edges.iter().enumerate() {
            if parent == 0 || child == 0 {
                return Err(Error::invalid_tree(format!(
                    "edge {edge} uses node 0 in a 1-based edge matrix"
                )));
            }
            zero_based.push((parent - 1, child - 1));
        }
        let tree = Self::from_edges(n_tips, &zero_based, lengths)?;
        if tree.root != n_tips {
            return Err(Error::invalid_tree(format!(
                "root is node {} but expected {}",
                tree.root + 1,
                n_tips + 1
            )));
        }
        Ok(tree)
    }

    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_edges(&self) -> usize {
        self.lengths.len()
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// Branch lengths indexed by edge
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Edges on the path from `node` up to the root, nearest first
    pub fn path_to_root(&self, node: usize) -> PathToRoot<'_> {
        PathToRoot {
            nodes: &self.nodes,
            current: node,
        }
    }
}

/// Iterator over the incoming edges met while walking to the root
#[derive(Debug, Clone)]
pub struct PathToRoot<'a> {
    nodes: &'a [Node],
    current: usize,
}

impl Iterator for PathToRoot<'_> {
    type Item = Incoming;

    #[inline]
    fn next(&mut self) -> Option<Incoming> {
        let incoming = self.nodes[self.current].incoming?;
        self.current = incoming.parent;
        Some(incoming)
    }
}

/// Every parent chain must reach the root.
fn check_acyclic(nodes: &[Node]) -> Result<()> {
    #[derive(Clone, Copy, PartialEq, Default)]
    enum Mark {
        #[default]
        Unseen,
        OnPath,
        Done,
    }

    let mut marks: Vec<Mark> = try_zeroed(nodes.len(), "tree node marks")?;
    let mut path = Vec::new();
    for start in 0..nodes.len() {
        let mut node = start;
        loop {
            match marks[node] {
                Mark::Done => break,
                Mark::OnPath => {
                    return Err(Error::invalid_tree(format!("cycle through node {node}")));
                }
                Mark::Unseen => {}
            }
            marks[node] = Mark::OnPath;
            path.push(node);
            match nodes[node].incoming {
                Some(incoming) => node = incoming.parent,
                None => break,
            }
        }
        for visited in path.drain(..) {
            marks[visited] = Mark::Done;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ((0:1, 1:2)3:0.5, 2:3)4
    fn small() -> PhyloTree {
        PhyloTree::from_edges(3, &[(4, 3), (3, 0), (3, 1), (4, 2)], &[0.5, 1.0, 2.0, 3.0]).unwrap()
    }

    #[test]
    fn test_from_edges() {
        let tree = small();
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.root(), 4);
        let path: Vec<usize> = tree.path_to_root(1).map(|e| e.edge).collect();
        assert_eq!(path, vec![2, 0]);
        assert!(tree.node(4).incoming.is_none());
    }

    #[test]
    fn test_from_ape_edges() {
        let ape = PhyloTree::from_ape_edges(
            3,
            &[[4, 5], [5, 1], [5, 2], [4, 3]],
            &[0.5, 1.0, 2.0, 3.0],
        )
        .unwrap();
        assert_eq!(ape.root(), 3);
        let path: Vec<f64> = ape.path_to_root(0).map(|e| e.length).collect();
        assert_eq!(path, vec![1.0, 0.5]);
        assert_eq!(ape.path_to_root(2).count(), 1);
    }

    #[test]
    fn test_rejects_malformed() {
        let err = |r: Result<PhyloTree>| matches!(r, Err(Error::InvalidTree(_)));
        // length mismatch
        assert!(err(PhyloTree::from_edges(2, &[(2, 0), (2, 1)], &[1.0])));
        // negative length
        assert!(err(PhyloTree::from_edges(2, &[(2, 0), (2, 1)], &[1.0, -1.0])));
        // two parents for node 1
        assert!(err(PhyloTree::from_edges(2, &[(2, 1), (2, 1)], &[1.0, 1.0])));
        // 2 <-> 3 cycle detached from root 4
        assert!(err(PhyloTree::from_edges(
            2,
            &[(2, 0), (3, 1), (3, 2), (2, 3)],
            &[1.0; 4]
        )));
        // leaf with children
        assert!(err(PhyloTree::from_edges(2, &[(0, 1), (2, 0)], &[1.0, 1.0])));
        // ape root must be n + 1
        assert!(err(PhyloTree::from_ape_edges(2, &[[1, 2], [1, 3]], &[1.0, 1.0])));
        assert!(err(PhyloTree::from_edges(1, &[], &[])));
    }

    #[test]
    fn test_cycle_detected() {
        // 1 <-> 2 cycle beside root 3
        let r = PhyloTree::from_edges(1, &[(1, 0), (2, 1), (1, 2)], &[1.0; 3]);
        assert!(matches!(r, Err(Error::InvalidTree(_))));

        // root exists but 2 <-> 3 form a detached cycle
        let nodes = vec![
            Node {
                incoming: Some(Incoming { edge: 0, parent: 1, length: 1.0 }),
            },
            Node { incoming: None },
            Node {
                incoming: Some(Incoming { edge: 1, parent: 3, length: 1.0 }),
            },
            Node {
                incoming: Some(Incoming { edge: 2, parent: 2, length: 1.0 }),
            },
        ];
        assert!(check_acyclic(&nodes).is_err());
    }
}
