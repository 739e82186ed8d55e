use core::{
  cmp::Ordering,
  ptr::NonNull,
};

use crate::{
  RbTree,
  link::{
    Color,
    HasRb,
    color,
    is_red,
    left,
    right,
  },
};

#[derive(Debug, PartialEq, Eq)]
pub enum VerifyError {
  RedRoot,
  DoubleRed,
  BlackHeight { left: usize, right: usize },
  OutOfOrder,
}

impl<T> RbTree<T>
where
  T: HasRb,
{
  /// Checks the coloring invariants and returns the black height of the tree,
  /// counting the missing children below the leaves as one black level.
  pub fn verify(&self) -> Result<usize, VerifyError> {
    if self.root().is_some_and(is_red) {
      return Err(VerifyError::RedRoot);
    }

    black_height(self.root())
  }

  /// Checks that an in-order walk is strictly ascending under `cmp`.
  pub fn verify_order<F>(&self, cmp: F) -> Result<(), VerifyError>
  where
    F: Fn(&T, &T) -> Ordering,
  {
    let mut cursor = self.head();
    let Some(mut prev) = cursor.current() else {
      return Ok(());
    };

    while let Some(next) = cursor.next() {
      if cmp(unsafe { prev.as_ref() }, unsafe { next.as_ref() }) != Ordering::Less {
        return Err(VerifyError::OutOfOrder);
      }
      prev = next;
    }

    Ok(())
  }
}

fn black_height<T: HasRb>(node: Option<NonNull<T>>) -> Result<usize, VerifyError> {
  let Some(node) = node else {
    return Ok(1);
  };

  let children = [left(node), right(node)];
  if is_red(node) && children.iter().flatten().any(|&child| is_red(child)) {
    return Err(VerifyError::DoubleRed);
  }

  let left = black_height(children[0])?;
  let right = black_height(children[1])?;
  if left != right {
    return Err(VerifyError::BlackHeight { left, right });
  }

  Ok(left + usize::from(color(node) == Color::Black))
}
