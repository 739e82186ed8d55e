#![cfg_attr(not(test), no_std)]

mod shared;

pub use shared::SharedTree;

#[cfg(test)]
mod tests;
