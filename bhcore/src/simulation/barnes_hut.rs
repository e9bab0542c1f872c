//! # Barnes–Hut Octree (3D)
//!
//! This module implements a **3D Barnes–Hut octree** for approximating
//! gravitational acceleration in an `N`-body system. It replaces the naive
//! `O(N²)` all-pairs sum with an approximate `O(N log N)` traversal that keeps
//! nearby interactions exact and lumps distant clusters together.
//!
//! ## Core Concepts
//!
//! - Space is recursively split into 8 cubic octants; each octant is a node.
//! - Every node keeps a running **total mass** and **center of mass** (COM) of
//!   everything inserted below it. Both are updated incrementally on insert,
//!   so they are exact no matter how deep the tree goes.
//! - Children are created lazily, only for octants that actually receive a
//!   body.
//! - A node's first body is **deferred**: it is held by reference and only
//!   pushed down once a second body arrives. Isolated bodies therefore never
//!   cost a chain of single-child nodes.
//! - Nodes whose half width would drop below `min_width` are never split.
//!   They act as a merged aggregate, which bounds the depth when bodies
//!   coincide or cluster below the tree's resolution.
//!
//! ## Node occupancy
//!
//! ```text
//! Empty ──add──▶ Deferred(body) ──add──▶ Subdivided ──add──▶ Subdivided
//! ```
//!
//! ## Traversal
//!
//! For a query body at `x` and a node with center of mass `com`:
//!
//! 1. A node holding exactly one body that `x` lies outside of (a point on
//!    the node's surface counts as outside) is applied directly: the lone
//!    occupant is some other body.
//! 2. If `width² < tolerance² · |com − x|²` the node is far enough away to be
//!    applied as a single point mass.
//! 3. Otherwise every existing child is visited.
//!
//! A body never pulls on itself: a node containing only the query body has
//! `com == x`, which fails the criterion, has no children, and would be caught
//! by the radius guard anyway.

use tracing::warn;

use crate::simulation::error::SimError;
use crate::simulation::params::Parameters;
use crate::simulation::states::{check_finite, Body, NVec3};

/// What a node currently holds.
///
/// Tracking the deferred state explicitly (instead of reading it off
/// `total_bodies`) is what makes the second insertion push *both* bodies down.
#[derive(Debug, Clone, Copy)]
pub enum Occupancy<'a> {
    /// No body has been inserted yet.
    Empty,
    /// Exactly one body, held here and not yet pushed into a child.
    Deferred(&'a Body),
    /// Two or more bodies. Each was routed into a child octant, unless the
    /// node is at the minimum width, in which case it has no children.
    Subdivided,
}

/// A single octree node.
///
/// Covers the cube centered at `location` with edge `width`. Aggregates are
/// for the whole subtree.
#[derive(Debug, Clone)]
pub struct OctreeNode<'a> {
    pub location: NVec3,
    pub width: f64,
    pub center_of_mass: NVec3,
    pub total_mass: f64,
    pub total_bodies: usize,
    pub occupancy: Occupancy<'a>,
    pub children: [Option<usize>; 8], // indices into Octree::nodes
}

impl<'a> OctreeNode<'a> {
    /// An empty node. The center of mass starts at the node center as a
    /// placeholder until a body arrives.
    fn new(location: NVec3, width: f64) -> Self {
        Self {
            location,
            width,
            center_of_mass: location,
            total_mass: 0.0,
            total_bodies: 0,
            occupancy: Occupancy::Empty,
            children: [None; 8],
        }
    }

    /// The body held here while the node is in the deferred state.
    pub fn first_body(&self) -> Option<&'a Body> {
        match self.occupancy {
            Occupancy::Deferred(body) => Some(body),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Fold one body into the running mass and center of mass.
    ///
    /// `com ← (M·com + m·x) / (M + m)`. While the total is still zero
    /// (massless bodies only) the placeholder is kept.
    fn absorb(&mut self, body: &Body) {
        let total = self.total_mass + body.mass();
        if total > 0.0 {
            self.center_of_mass =
                (self.center_of_mass * self.total_mass + body.location * body.mass()) / total;
        }
        self.total_mass = total;
        self.total_bodies += 1;
    }

    /// True when `p` is strictly inside this node's cube. Compares squared
    /// offsets per axis, no square root.
    ///
    /// A point on the surface counts as outside. Routing sends a center-plane
    /// coordinate to the lower octant, so a neighbour sitting on the lower
    /// face of an upper octant's leaf must still see that leaf's occupant.
    /// The occupant itself on its own face is stopped by the radius guard.
    fn contains(&self, p: &NVec3) -> bool {
        let half = 0.5 * self.width;
        let half2 = half * half;
        let off = p - self.location;
        off.x * off.x < half2 && off.y * off.y < half2 && off.z * off.z < half2
    }

    /// Octant index for a point, 3 bits:
    ///
    /// - Bit 0 (value 1): x above the center
    /// - Bit 1 (value 2): y above the center
    /// - Bit 2 (value 4): z above the center
    ///
    /// A coordinate exactly on the center plane goes to the lower octant. The
    /// tie-break is arbitrary, it only has to be the same for every insert.
    fn octant_for(&self, p: &NVec3) -> usize {
        let mut idx = 0;

        if p.x > self.location.x { idx |= 1; } // bit 0
        if p.y > self.location.y { idx |= 2; } // bit 1
        if p.z > self.location.z { idx |= 4; } // bit 2

        idx
    }

    /// Center of the child cube for `octant`: parent center ± width/4 per axis,
    /// using the same bit layout as [`OctreeNode::octant_for`].
    fn child_center(&self, octant: usize) -> NVec3 {
        let q = 0.25 * self.width;
        let sign = |bit: usize| if octant & bit == 0 { -q } else { q };
        self.location + NVec3::new(sign(1), sign(2), sign(4))
    }
}

/// A 3D Barnes–Hut octree over borrowed bodies.
///
/// Owns every node in a flat arena (`nodes`); children are indices into it,
/// so ownership is strictly tree-shaped. Bodies are only borrowed, which is
/// why queries return an acceleration instead of writing into the body: the
/// caller adds the result once the tree has been dropped.
///
/// Built fresh each tick. Insertion must finish before any query; queries
/// take `&self` and can run concurrently.
#[derive(Debug, Clone)]
pub struct Octree<'a> {
    nodes: Vec<OctreeNode<'a>>,
    root: usize,
    params: Parameters,
}

impl<'a> Octree<'a> {
    /// Empty tree whose root cube of edge `width` is centered at the origin.
    ///
    /// The explicit `width` defines the root cube; `params.width` is ignored
    /// here and only read by [`Octree::build`].
    pub fn new(width: f64, params: Parameters) -> Self {
        Self::with_center(NVec3::zeros(), width, params)
    }

    /// Empty tree whose root cube of edge `width` is centered at `location`.
    /// As with [`Octree::new`], `width` wins over `params.width`.
    pub fn with_center(location: NVec3, width: f64, params: Parameters) -> Self {
        Self {
            nodes: vec![OctreeNode::new(location, width)],
            root: 0,
            params,
        }
    }

    /// Build a tree spanning `params.width` around the origin and insert every
    /// body, in order.
    ///
    /// # Errors
    /// Fails on the first body with a non-finite location. The partially
    /// built tree is discarded.
    pub fn build(bodies: &'a [Body], params: Parameters) -> Result<Self, SimError> {
        let mut tree = Self::new(params.width, params);
        for body in bodies {
            tree.add(body)?;
        }
        Ok(tree)
    }

    /// Insert one body.
    ///
    /// Updates the aggregates of every node on the way down. The first body a
    /// node sees is parked in it; when the second arrives both are routed to
    /// their octants.
    ///
    /// Bodies outside the root cube are still accepted: they are routed by
    /// the sign of their offset like any other body and count towards every
    /// aggregate.
    ///
    /// # Errors
    /// [`SimError::NonFiniteVector`] if the body's location has a NaN or
    /// infinite component. The tree is left untouched in that case.
    pub fn add(&mut self, body: &'a Body) -> Result<(), SimError> {
        if let Err(err) = check_finite("location", &body.location) {
            warn!(%err, mass = body.mass(), "rejecting body from octree");
            return Err(err);
        }
        self.insert(self.root, body);
        Ok(())
    }

    /// Net acceleration on `body` from everything in the tree.
    pub fn acceleration_on(&self, body: &Body) -> NVec3 {
        let mut acc = NVec3::zeros();
        self.accelerate(body, &mut acc);
        acc
    }

    /// Add the Barnes–Hut approximation of the pull on `body` into `acc`.
    ///
    /// `acc` is the caller's per-body accumulator; nothing else is written,
    /// so independent bodies may be queried from several threads at once.
    pub fn accelerate(&self, body: &Body, acc: &mut NVec3) {
        self.traverse_node(self.root, body, acc);
    }

    pub fn root(&self) -> &OctreeNode<'a> {
        &self.nodes[self.root]
    }

    pub fn node(&self, idx: usize) -> Option<&OctreeNode<'a>> {
        self.nodes.get(idx)
    }

    /// Existing children of `node` as `(octant, child)` pairs.
    pub fn children<'t>(
        &'t self,
        node: &'t OctreeNode<'a>,
    ) -> impl Iterator<Item = (usize, &'t OctreeNode<'a>)> + 't {
        node.children
            .iter()
            .enumerate()
            .filter_map(move |(octant, child)| child.map(|idx| (octant, &self.nodes[idx])))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn total_mass(&self) -> f64 {
        self.root().total_mass
    }

    pub fn total_bodies(&self) -> usize {
        self.root().total_bodies
    }

    pub fn center_of_mass(&self) -> NVec3 {
        self.root().center_of_mass
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    // helpers ==============================================================================

    /// Insert `body` into the subtree rooted at `node_idx`.
    ///
    /// - **Empty**: absorb and park the body (deferred).
    /// - **Deferred**: absorb, route the new body, then route the parked one.
    /// - **Subdivided**: absorb and route the new body.
    fn insert(&mut self, node_idx: usize, body: &'a Body) {
        let node = &mut self.nodes[node_idx];
        node.absorb(body);

        match node.occupancy {
            Occupancy::Empty => {
                node.occupancy = Occupancy::Deferred(body);
            }
            Occupancy::Deferred(first) => {
                node.occupancy = Occupancy::Subdivided;
                self.route(node_idx, body);
                self.route(node_idx, first);
            }
            Occupancy::Subdivided => {
                self.route(node_idx, body);
            }
        }
    }

    /// Push `body` one level down from `node_idx`, creating the child octant
    /// if it doesn't exist yet.
    ///
    /// Does nothing when the child would be narrower than `min_width`: the
    /// body then only lives on in this node's aggregates.
    fn route(&mut self, node_idx: usize, body: &'a Body) {
        let node = &self.nodes[node_idx];
        let sub_width = 0.5 * node.width;

        // Second check stops coincident bodies recursing forever when min_width is 0.
        if sub_width < self.params.min_width || sub_width <= f64::MIN_POSITIVE {
            return;
        }

        let octant = node.octant_for(&body.location);
        let child_idx = match node.children[octant] {
            Some(idx) => idx,
            None => {
                let center = node.child_center(octant);
                let new_idx = self.nodes.len();
                self.nodes.push(OctreeNode::new(center, sub_width));
                // now we can safely update the parent
                self.nodes[node_idx].children[octant] = Some(new_idx);
                new_idx
            }
        };

        self.insert(child_idx, body);
    }

    /// Recursively accumulate the pull of the subtree at `node_idx` on `body`.
    ///
    /// - **Empty node**: no contribution.
    /// - **One occupant, body outside the cube**: the occupant is some other
    ///   body and there is no subtree to descend into, apply it directly.
    /// - **Far enough** (`width² < tolerance² · d²`): apply the aggregate.
    /// - **Too close**: visit every existing child.
    fn traverse_node(&self, node_idx: usize, body: &Body, acc: &mut NVec3) {
        let node = &self.nodes[node_idx];

        if node.total_bodies == 0 {
            return;
        }

        let d = node.center_of_mass - body.location;

        if node.total_bodies == 1 && !node.contains(&body.location) {
            self.perform_acceleration(node, body, &d, acc);
            return;
        }

        let tol2 = self.params.tolerance * self.params.tolerance;
        if node.width * node.width < tol2 * d.norm_squared() {
            self.perform_acceleration(node, body, &d, acc);
            return;
        }

        for child in node.children.iter().flatten() {
            self.traverse_node(*child, body, acc);
        }
    }

    /// Newtonian pull of `node`'s aggregate mass, displaced by `d` from `body`:
    /// `a += G · M / |d|³ · d`.
    ///
    /// Skipped when `|d|` is below the body's radius. That covers the body's
    /// own mass sitting at (nearly) zero distance and stops overlapping
    /// bodies from slingshotting each other.
    fn perform_acceleration(&self, node: &OctreeNode<'a>, body: &Body, d: &NVec3, acc: &mut NVec3) {
        let dist2 = d.norm_squared();
        let radius = body.radius();
        if dist2 < radius * radius {
            return;
        }

        let dist = dist2.sqrt();
        let norm_acc = self.params.g * node.total_mass / (dist2 * dist);
        *acc += d * norm_acc;
    }
}
