//! Chain links and chains for a logical sudoku solver.
//!
//! Chaining techniques (X-chains, XY-chains, AICs, forcing nets) describe a
//! deduction as a sequence of inferences between candidates. This crate
//! provides the link model those techniques share.
//!
//! # Overview
//!
//! 1. **Links**
//!    - [`node`]: [`ChainLink`] and [`ChainNode`], the typed link model.
//!    - [`packed`]: [`PackedLink`], the 32-bit word form and its codec.
//! 2. **Almost-structures** - [`almost`]: the [`AlmostStructure`] and
//!    [`AlmostBuddies`] traits a side array implements, and
//!    [`AlsMaterialization`].
//! 3. **Chains** - [`chain`]: [`Chain`] with window and length scoring;
//!    [`penalty`]: the size penalty policy shared by scoring and ALSs.
//! 4. **Compaction** - [`compact`]: [`compact_almost_structures`].
//!
//! # Features
//!
//! * `serde`: serializes [`PackedLink`] and [`Chain`] as packed words.
//!
//! # Examples
//!
//! ```
//! use deduce_chain::{Chain, ChainLink, PackedLink};
//!
//! // r1c1=5 - r1c9=5 = r9c9(5)
//! let chain: Chain = [
//!     ChainLink::normal(0, 5, true),
//!     ChainLink::normal(8, 5, false),
//!     ChainLink::normal(80, 5, true),
//! ]
//! .into_iter()
//! .collect();
//!
//! let words: Vec<PackedLink> = chain.to_packed();
//! let decoded = Chain::from_packed(&words)?;
//! assert_eq!(decoded, chain);
//! assert_eq!(decoded.length(), 3);
//! # Ok::<(), deduce_chain::DecodeError>(())
//! ```

pub mod almost;
pub mod chain;
pub mod compact;
pub mod error;
pub mod node;
pub mod packed;
pub mod penalty;

pub use self::{
    almost::{AlmostBuddies, AlmostStructure, AlsMaterialization},
    chain::Chain,
    compact::compact_almost_structures,
    error::{DecodeError, LinkError},
    node::{AlmostKind, ChainLink, ChainNode, GroupCells, NodeKind},
    packed::{NO_INDEX, PackedLink, join_almost_index, split_almost_index},
};
