use core::ptr::NonNull;

use getset::{
  CopyGetters,
  Getters,
};

/// Implemented by records that embed an [`RbLink`] and can therefore be
/// linked into an [`RbTree`](crate::RbTree).
pub trait HasRb {
  fn rb_link(&self) -> &RbLink<Self>
  where
    Self: Sized;
  fn rb_link_mut(&mut self) -> &mut RbLink<Self>
  where
    Self: Sized;
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Color {
  #[default]
  Red,
  Black,
}

/// Topology fields of a tree node. Read-only outside of this crate; only the
/// tree rewires them.
#[derive(Debug, Getters, CopyGetters)]
pub struct RbLink<T>
where
  T: HasRb,
{
  #[getset(get = "pub")]
  left: Option<NonNull<T>>,
  #[getset(get = "pub")]
  right: Option<NonNull<T>>,
  #[getset(get_copy = "pub")]
  color: Color,
}

impl<T> RbLink<T>
where
  T: HasRb,
{
  pub const fn new() -> Self {
    Self {
      left: None,
      right: None,
      color: Color::Red,
    }
  }

  pub(crate) fn reset(&mut self) {
    self.left = None;
    self.right = None;
    self.color = Color::Red;
  }
}

impl<T> Default for RbLink<T>
where
  T: HasRb,
{
  fn default() -> Self {
    Self::new()
  }
}

// SAFETY: a link only points at other records of the same type, which are
// themselves `Send`/`Sync` under the same bound.
unsafe impl<T: HasRb + Send> Send for RbLink<T> {}
unsafe impl<T: HasRb + Sync> Sync for RbLink<T> {}

// Raw accessors used by the balancing code. Every pointer handed to them is
// either a node currently linked into a tree or a node being inserted, both of
// which the caller of `RbTree::insert` keeps alive.

#[inline(always)]
pub(crate) fn left<T: HasRb>(node: NonNull<T>) -> Option<NonNull<T>> {
  unsafe { node.as_ref() }.rb_link().left
}

#[inline(always)]
pub(crate) fn right<T: HasRb>(node: NonNull<T>) -> Option<NonNull<T>> {
  unsafe { node.as_ref() }.rb_link().right
}

#[inline(always)]
pub(crate) fn color<T: HasRb>(node: NonNull<T>) -> Color {
  unsafe { node.as_ref() }.rb_link().color
}

#[inline(always)]
pub(crate) fn is_red<T: HasRb>(node: NonNull<T>) -> bool {
  color(node) == Color::Red
}

/// Missing children count as black.
#[inline(always)]
pub(crate) fn is_black<T: HasRb>(node: Option<NonNull<T>>) -> bool {
  !node.is_some_and(is_red)
}

#[inline(always)]
pub(crate) fn set_left<T: HasRb>(mut node: NonNull<T>, child: Option<NonNull<T>>) {
  unsafe { node.as_mut() }.rb_link_mut().left = child;
}

#[inline(always)]
pub(crate) fn set_right<T: HasRb>(mut node: NonNull<T>, child: Option<NonNull<T>>) {
  unsafe { node.as_mut() }.rb_link_mut().right = child;
}

#[inline(always)]
pub(crate) fn paint<T: HasRb>(mut node: NonNull<T>, color: Color) {
  unsafe { node.as_mut() }.rb_link_mut().color = color;
}

#[inline(always)]
pub(crate) fn detach<T: HasRb>(mut node: NonNull<T>) {
  unsafe { node.as_mut() }.rb_link_mut().reset();
}

/// Unwraps a child the red-black invariants guarantee to exist.
#[inline(always)]
pub(crate) fn present<T>(node: Option<NonNull<T>>) -> NonNull<T> {
  debug_assert!(node.is_some(), "red-black invariant guarantees this child");
  // SAFETY: callers only use this where the tree shape implies a node.
  unsafe { node.unwrap_unchecked() }
}
