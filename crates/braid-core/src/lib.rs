//! Core types and traits for the Braid coupling framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers, grid classification and the [`Port`] contract that
//! every coupled component implements.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod kind;
pub mod port;

pub use error::PortError;
pub use id::{GridId, Shape, MAX_RANK};
pub use kind::GridKind;
pub use port::{share, Port, SharedPort};
