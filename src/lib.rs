#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod dict;

pub use dict::{
  Dict,
  DictError,
  DictIter,
  DictResult,
};
pub use rbkit_rbtree as rbtree;
pub use rbkit_sync as sync;

pub mod prelude {
  pub use rbkit_rbtree::prelude::*;
  pub use rbkit_sync::SharedTree;

  pub use super::{
    Dict,
    DictError,
    DictResult,
  };
}

#[cfg(test)]
mod tests;
