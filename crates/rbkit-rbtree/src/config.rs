/// Capacity of every ancestor path.
///
/// No process can hold more than `2^usize::BITS` nodes and the longest
/// root-to-leaf path of a red-black tree is at most twice the shortest one, so
/// this bound covers trees of any size.
pub const MAX_DEPTH: usize = 2 * usize::BITS as usize;
