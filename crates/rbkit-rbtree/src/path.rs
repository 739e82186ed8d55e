use core::ptr::NonNull;

use crate::{
  config::MAX_DEPTH,
  link::{
    HasRb,
    left,
    present,
    right,
  },
};

/// Nodes from the root down to a current position, root first.
///
/// A slot may hold `None` only while removal rebalances the hole left by the
/// detached node.
pub(crate) struct Path<T> {
  stack: [Option<NonNull<T>>; MAX_DEPTH],
  len: usize,
}

impl<T> Path<T>
where
  T: HasRb,
{
  pub(crate) const fn new() -> Self {
    Self {
      stack: [None; MAX_DEPTH],
      len: 0,
    }
  }

  #[inline(always)]
  pub(crate) fn len(&self) -> usize {
    self.len
  }

  #[inline(always)]
  pub(crate) fn is_empty(&self) -> bool {
    self.len == 0
  }

  #[inline(always)]
  pub(crate) fn clear(&mut self) {
    self.len = 0;
  }

  #[inline(always)]
  pub(crate) fn truncate(&mut self, len: usize) {
    debug_assert!(len <= self.len);
    self.len = len;
  }

  #[inline(always)]
  pub(crate) fn push(&mut self, node: NonNull<T>) {
    self.push_slot(Some(node));
  }

  #[inline(always)]
  pub(crate) fn push_slot(&mut self, slot: Option<NonNull<T>>) {
    debug_assert!(self.len < MAX_DEPTH, "ancestor path overflow");
    self.stack[self.len] = slot;
    self.len += 1;
  }

  #[inline(always)]
  pub(crate) fn slot(&self, index: usize) -> Option<NonNull<T>> {
    debug_assert!(index < self.len);
    self.stack[index]
  }

  #[inline(always)]
  pub(crate) fn set(&mut self, index: usize, slot: Option<NonNull<T>>) {
    debug_assert!(index < self.len);
    self.stack[index] = slot;
  }

  /// The node at `index`, which must not be the removal hole.
  #[inline(always)]
  pub(crate) fn node(&self, index: usize) -> NonNull<T> {
    present(self.slot(index))
  }

  /// The node at `index - 1`, or `None` when `index` is the root.
  #[inline(always)]
  pub(crate) fn above(&self, index: usize) -> Option<NonNull<T>> {
    index.checked_sub(1).map(|up| self.node(up))
  }

  #[inline(always)]
  pub(crate) fn top(&self) -> Option<NonNull<T>> {
    self.len.checked_sub(1).and_then(|top| self.stack[top])
  }

  /// Whether the top node is still a child of the node recorded above it.
  pub(crate) fn top_is_linked(&self) -> bool {
    match self.len {
      0 | 1 => true,
      len => {
        let parent = self.node(len - 2);
        let top = self.slot(len - 1);
        left(parent) == top || right(parent) == top
      }
    }
  }

  pub(crate) fn push_leftmost(&mut self, mut node: Option<NonNull<T>>) {
    while let Some(current) = node {
      self.push(current);
      node = left(current);
    }
  }

  pub(crate) fn push_rightmost(&mut self, mut node: Option<NonNull<T>>) {
    while let Some(current) = node {
      self.push(current);
      node = right(current);
    }
  }
}

impl<T> Clone for Path<T> {
  fn clone(&self) -> Self {
    Self {
      stack: self.stack,
      len: self.len,
    }
  }
}
