use core::{
  iter::FusedIterator,
  ptr::NonNull,
};

use crate::{
  RbTree,
  link::HasRb,
};

/// Tears a tree down one node at a time, see [`RbTree::fini_step`].
///
/// Holding the tree mutably for the whole teardown keeps other operations
/// from being interleaved with it. Dropping the drainer early finishes the
/// teardown so the tree is left empty and valid; the remaining nodes are
/// simply unlinked.
pub struct RbDrainer<'tree, T>
where
  T: HasRb,
{
  tree: &'tree mut RbTree<T>,
}

impl<'tree, T> RbDrainer<'tree, T>
where
  T: HasRb,
{
  pub fn new(tree: &'tree mut RbTree<T>) -> Self {
    Self { tree }
  }
}

impl<T> Iterator for RbDrainer<'_, T>
where
  T: HasRb,
{
  type Item = NonNull<T>;

  fn next(&mut self) -> Option<Self::Item> {
    self.tree.fini_step()
  }
}

impl<T> FusedIterator for RbDrainer<'_, T> where T: HasRb {}

impl<T> Drop for RbDrainer<'_, T>
where
  T: HasRb,
{
  fn drop(&mut self) {
    while self.tree.fini_step().is_some() {}
  }
}
