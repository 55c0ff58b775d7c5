//! Versioned cluster descriptor APIs with hub-and-spoke conversion.
//!
//! Every kind in the `cluster.wheelhouse.dev` family exists in multiple
//! schema versions. Older versions ("spokes") convert to and from the single
//! canonical version ("hub", currently `v1beta1`) and never directly to each
//! other. `util::conversion` carries the capability traits and the
//! differential fuzz harness that verifies the round-trip laws.

pub mod api;
pub mod constants;
pub mod helper;
pub mod util;
