//! Board graph: node arena, adjacency lists and per-player tallies.

use std::fmt;
use std::sync::Arc;

use crate::error::BoardError;
use crate::game::{MAX_PLAYERS, PlayerId};

/// Stable identity of a node within one board.
///
/// Ids are slot indices. A removed node leaves an empty slot behind, so the
/// ids of the remaining nodes never shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Create an id from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw value of this id.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Slot index in the board arena.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Where a node sits in board space. Only renderers and hit testing read it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    /// Horizontal centre.
    pub x: f64,
    /// Vertical centre.
    pub y: f64,
    /// Radius of the drawn circle.
    pub radius: f64,
}

impl Placement {
    /// Create a placement.
    #[must_use]
    pub const fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    /// Check whether a board-space point falls inside the node's circle.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (x - self.x).hypot(y - self.y) <= self.radius
    }
}

/// A single node on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Tokens currently held.
    pub(crate) count: u32,
    /// Owner (None = unclaimed).
    pub(crate) owner: Option<PlayerId>,
    /// Presentation payload.
    pub(crate) placement: Placement,
}

impl Node {
    /// Tokens currently held.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Owner of this node (None = unclaimed).
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Where the node is drawn.
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }
}

/// Adjacency lists indexed by slot.
#[derive(Debug, Clone, PartialEq, Default)]
struct Adjacency(Vec<Vec<NodeId>>);

/// Tally slot for a player id, if the id is in range.
#[inline]
pub(crate) fn tally_slot(player: PlayerId) -> Option<usize> {
    let idx = usize::from(player).checked_sub(1)?;
    (idx < MAX_PLAYERS).then_some(idx)
}

/// Hand a node to `player`, moving one unit of tally from its old owner.
fn transfer(tally: &mut [u32; MAX_PLAYERS], node: &mut Node, player: PlayerId) {
    if node.owner == Some(player) {
        return;
    }
    if let Some(previous) = node.owner
        && let Some(idx) = tally_slot(previous)
    {
        tally[idx] = tally[idx].saturating_sub(1);
    }
    if let Some(idx) = tally_slot(player) {
        tally[idx] += 1;
    }
    node.owner = Some(player);
}

/// The game board.
///
/// Cloning is a full value copy. The adjacency lists are shared between
/// clones until one of them changes its structure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Board {
    /// Node slots; `None` marks a removed node.
    slots: Vec<Option<Node>>,
    /// Neighbour lists, one per slot.
    adjacency: Arc<Adjacency>,
    /// Nodes owned per player, indexed by `player_id - 1`.
    tally: [u32; MAX_PLAYERS],
    /// Number of occupied slots.
    live: usize,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unclaimed, empty node. No edges are added.
    pub fn add_node(&mut self, placement: Placement) -> NodeId {
        #[allow(clippy::cast_possible_truncation)]
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Some(Node {
            count: 0,
            owner: None,
            placement,
        }));
        Arc::make_mut(&mut self.adjacency).0.push(Vec::new());
        self.live += 1;
        id
    }

    /// Join two nodes with a symmetric edge. Connecting twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if either node is missing or if `a == b`.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> Result<(), BoardError> {
        for id in [a, b] {
            if !self.contains(id) {
                return Err(BoardError::NotAMember(id));
            }
        }
        if a == b {
            return Err(BoardError::SelfLoop(a));
        }

        let lists = &mut Arc::make_mut(&mut self.adjacency).0;
        if !lists[a.index()].contains(&b) {
            lists[a.index()].push(b);
        }
        if !lists[b.index()].contains(&a) {
            lists[b.index()].push(a);
        }
        Ok(())
    }

    /// Remove a node and every edge that mentions it.
    ///
    /// If the node was owned, its owner's tally drops by one.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotAMember`] if the node is not on the board.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, BoardError> {
        let node = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(BoardError::NotAMember(id))?;
        self.live -= 1;

        if let Some(idx) = node.owner.and_then(tally_slot) {
            self.tally[idx] = self.tally[idx].saturating_sub(1);
        }

        // Scan every list so a one-way edge cannot leave a dangling reference.
        let lists = &mut Arc::make_mut(&mut self.adjacency).0;
        lists[id.index()].clear();
        for list in lists.iter_mut() {
            list.retain(|&n| n != id);
        }

        Ok(node)
    }

    /// Check whether a node is on the board.
    #[must_use]
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.index()), Some(Some(_)))
    }

    /// Get a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Neighbours of a node (empty if the node is missing).
    #[must_use]
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        if self.contains(id) {
            &self.adjacency.0[id.index()]
        } else {
            &[]
        }
    }

    /// Number of distinct other nodes adjacent to this one.
    #[must_use]
    pub fn degree(&self, id: NodeId) -> Option<usize> {
        self.contains(id).then(|| self.adjacency.0[id.index()].len())
    }

    /// Iterate over all nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            #[allow(clippy::cast_possible_truncation)]
            let id = NodeId(idx as u32);
            slot.as_ref().map(|node| (id, node))
        })
    }

    /// Iterate over all node ids in order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    /// Iterate over every undirected edge once, lower id first.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.ids().flat_map(move |a| {
            self.neighbors(a)
                .iter()
                .filter(move |&&b| a < b)
                .map(move |&b| (a, b))
        })
    }

    /// Number of nodes on the board.
    #[must_use]
    pub const fn total_nodes(&self) -> usize {
        self.live
    }

    /// Check if the board has no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of nodes owned by a player (0 for unknown ids).
    #[must_use]
    pub fn tally_for(&self, player: PlayerId) -> u32 {
        tally_slot(player).map_or(0, |idx| self.tally[idx])
    }

    /// Number of owned nodes across all players.
    #[must_use]
    pub fn claimed(&self) -> u32 {
        self.tally.iter().sum()
    }

    /// Total tokens on the board.
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.iter().map(|(_, node)| u64::from(node.count)).sum()
    }

    /// The player owning every node, if any. An empty board has no winner.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        if self.live == 0 {
            return None;
        }
        let idx = self
            .tally
            .iter()
            .position(|&owned| owned as usize == self.live)?;
        #[allow(clippy::cast_possible_truncation)]
        let player = idx as PlayerId + 1;
        Some(player)
    }

    /// Check if some player owns every node.
    #[must_use]
    pub fn has_winner(&self) -> bool {
        self.winner().is_some()
    }

    /// Check if no unclaimed node remains.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.claimed() as usize == self.live
    }

    /// Drop one token on a node and hand it to `player`.
    pub(crate) fn deposit(&mut self, id: NodeId, player: PlayerId) {
        if let Some(node) = self.slots.get_mut(id.index()).and_then(Option::as_mut) {
            node.count = node.count.saturating_add(1);
            transfer(&mut self.tally, node, player);
        }
    }

    /// Fire a node if it holds at least as many tokens as it has neighbours.
    ///
    /// Every neighbour gains a token and is captured by `player`. Returns the
    /// neighbours that received a token, or `None` if the node did not fire.
    /// Isolated nodes never fire.
    pub(crate) fn fire(&mut self, id: NodeId, player: PlayerId) -> Option<&[NodeId]> {
        let idx = id.index();
        let neighbors = self.adjacency.0.get(idx)?;
        let degree = u32::try_from(neighbors.len()).ok()?;
        let node = self.slots.get_mut(idx)?.as_mut()?;
        if degree == 0 || node.count < degree {
            return None;
        }
        node.count -= degree;

        for &target in neighbors {
            if let Some(node) = self.slots.get_mut(target.index()).and_then(Option::as_mut) {
                node.count = node.count.saturating_add(1);
                transfer(&mut self.tally, node, player);
            }
        }
        Some(neighbors)
    }

    /// Raw tally array, for invariant checks.
    pub(crate) const fn tallies(&self) -> &[u32; MAX_PLAYERS] {
        &self.tally
    }

    /// Mutable node access that bypasses tally bookkeeping.
    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Add an edge in one direction only.
    #[cfg(test)]
    pub(crate) fn link_one_way(&mut self, from: NodeId, to: NodeId) {
        Arc::make_mut(&mut self.adjacency).0[from.index()].push(to);
    }

    /// Overwrite a tally entry.
    #[cfg(test)]
    pub(crate) fn set_tally(&mut self, player: PlayerId, owned: u32) {
        if let Some(idx) = tally_slot(player) {
            self.tally[idx] = owned;
        }
    }
}
