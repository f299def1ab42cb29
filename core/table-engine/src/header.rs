//! FILENAME: core/table-engine/src/header.rs
//! Header Grid - reconstructs the 2-D header layout implied by row/col spans.
//!
//! Header rows arrive as ragged sequences of cells. A cell with
//! `rowSpan > 1` occupies slots in the rows below it, so a later row's
//! cells start at the first free slot. Once the grid is filled:
//! - a cell's parent is the cell occupying the slot directly above its start
//! - a leaf column is whatever occupies the bottom slot of that column
//! - a leaf's hierarchy is the root-to-leaf chain of parents
//!
//! Nodes live in an arena and refer to each other by index.

use engine::HeaderCell;
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

pub type NodeId = usize;

/// Root-to-leaf chain. Real tables rarely nest more than four levels.
pub type Hierarchy = SmallVec<[NodeId; 4]>;

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderNode {
    pub cell: HeaderCell,
    /// Grid row the cell starts in.
    pub row: usize,
    /// Grid column the cell starts in.
    pub col: usize,
    pub parent: Option<NodeId>,
}

impl HeaderNode {
    fn covers_row(&self, row: usize) -> bool {
        row >= self.row && row < self.row + self.cell.row_span as usize
    }
}

/// One rendered header cell after column ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderSlot {
    pub key: String,
    pub label: String,
    pub col_span: usize,
    pub row_span: usize,
    pub is_measure_group: bool,
    pub is_leaf: bool,
    /// Index of the first leaf column this slot covers.
    pub first_column: usize,
}

impl HeaderSlot {
    /// Only plain leaf headers take sort clicks.
    pub fn is_sortable(&self) -> bool {
        self.is_leaf && !self.is_measure_group
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeaderGrid {
    nodes: Vec<HeaderNode>,
    leaves: Vec<NodeId>,
    by_key: FxHashMap<String, NodeId>,
    depth: usize,
}

impl HeaderGrid {
    pub fn build(header_rows: &[Vec<HeaderCell>]) -> Self {
        let depth = header_rows.len();
        let mut slots: Vec<Vec<Option<NodeId>>> = vec![Vec::new(); depth];
        let mut nodes: Vec<HeaderNode> = Vec::new();

        for (r, cells) in header_rows.iter().enumerate() {
            let mut c = 0;
            for cell in cells {
                while slots[r].get(c).copied().flatten().is_some() {
                    c += 1;
                }
                let id = nodes.len();
                let row_span = (cell.row_span.max(1) as usize).min(depth - r);
                let col_span = cell.col_span.max(1) as usize;
                for row in slots.iter_mut().skip(r).take(row_span) {
                    if row.len() < c + col_span {
                        row.resize(c + col_span, None);
                    }
                    for slot in &mut row[c..c + col_span] {
                        *slot = Some(id);
                    }
                }
                let parent = if r == 0 {
                    None
                } else {
                    slots[r - 1].get(c).copied().flatten()
                };
                nodes.push(HeaderNode {
                    cell: cell.clone(),
                    row: r,
                    col: c,
                    parent,
                });
                c += col_span;
            }
        }

        let mut leaves: Vec<NodeId> = Vec::new();
        if let Some(bottom) = slots.last() {
            for id in bottom.iter().flatten() {
                if leaves.last() != Some(id) {
                    leaves.push(*id);
                }
            }
        }

        let mut by_key = FxHashMap::default();
        for (id, node) in nodes.iter().enumerate() {
            by_key.entry(node.cell.key.clone()).or_insert(id);
        }

        HeaderGrid {
            nodes,
            leaves,
            by_key,
            depth,
        }
    }

    /// Single-row header from bare column keys.
    pub fn from_keys(keys: &[String]) -> Self {
        let row: Vec<HeaderCell> = keys.iter().map(|k| HeaderCell::new(k.as_str(), k.as_str())).collect();
        HeaderGrid::build(&[row])
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn node(&self, id: NodeId) -> &HeaderNode {
        &self.nodes[id]
    }

    pub fn find(&self, key: &str) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    pub fn parent(&self, key: &str) -> Option<&HeaderCell> {
        let id = self.find(key)?;
        self.nodes[id].parent.map(|p| &self.nodes[p].cell)
    }

    /// Leaf column keys in natural grid order.
    pub fn leaf_keys(&self) -> Vec<&str> {
        self.leaves.iter().map(|id| self.nodes[*id].cell.key.as_str()).collect()
    }

    pub fn leaf(&self, key: &str) -> Option<&HeaderCell> {
        self.leaves
            .iter()
            .map(|id| &self.nodes[*id].cell)
            .find(|cell| cell.key == key)
    }

    /// Root-to-node chain for a key.
    pub fn hierarchy(&self, key: &str) -> Hierarchy {
        let mut chain = Hierarchy::new();
        let mut current = self.find(key);
        while let Some(id) = current {
            chain.push(id);
            current = self.nodes[id].parent;
        }
        chain.reverse();
        chain
    }

    /// Header rows for the given leaf order. Neighbouring leaves that share
    /// an ancestor merge into one spanned cell; leaves moved apart split
    /// their ancestor into separate cells.
    pub fn layout(&self, ordered_leaves: &[String]) -> Vec<Vec<HeaderSlot>> {
        let chains: Vec<Hierarchy> = ordered_leaves.iter().map(|k| self.hierarchy(k)).collect();
        let mut rows: Vec<Vec<HeaderSlot>> = vec![Vec::new(); self.depth];

        for (r, row) in rows.iter_mut().enumerate() {
            let mut previous: Option<NodeId> = None;
            for (column, chain) in chains.iter().enumerate() {
                let Some(&id) = chain.iter().find(|id| self.nodes[**id].covers_row(r)) else {
                    previous = None;
                    continue;
                };
                let node = &self.nodes[id];
                if node.row != r {
                    // covered by a row span from above
                    previous = Some(id);
                    continue;
                }
                if previous == Some(id) {
                    if let Some(last) = row.last_mut() {
                        last.col_span += 1;
                    }
                } else {
                    let is_leaf = self.leaves.contains(&id);
                    row.push(HeaderSlot {
                        key: node.cell.key.clone(),
                        label: node.cell.label.clone(),
                        col_span: 1,
                        row_span: if is_leaf {
                            self.depth - r
                        } else {
                            node.cell.row_span.max(1) as usize
                        },
                        is_measure_group: node.cell.is_measure_group,
                        is_leaf,
                        first_column: column,
                    });
                }
                previous = Some(id);
            }
        }
        rows
    }
}
