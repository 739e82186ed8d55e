//! Intrusive red-black tree.
//!
//! Records embed an [`RbLink`] and implement [`HasRb`]; the tree links them
//! together without ever allocating or freeing memory. Rebalancing after
//! insertion and removal is iterative and driven by a fixed-capacity ancestor
//! path, the same structure that backs [`Cursor`].

#![cfg_attr(not(test), no_std)]

pub mod config;
mod cursor;
mod drain;
mod link;
mod path;
mod tree;
#[cfg(any(test, feature = "verify"))]
mod verify;

pub use cursor::{
  Cursor,
  Iter,
};
pub use drain::RbDrainer;
pub use link::{
  Color,
  HasRb,
  RbLink,
};
pub use tree::RbTree;
#[cfg(any(test, feature = "verify"))]
pub use verify::VerifyError;

#[derive(Debug, PartialEq, Eq)]
pub enum RbError {
  AlreadyPresent,
}

pub type RbResult<T> = Result<T, RbError>;

pub mod prelude {
  pub use super::{
    Color,
    Cursor,
    HasRb,
    RbDrainer,
    RbError,
    RbLink,
    RbResult,
    RbTree,
  };
}
