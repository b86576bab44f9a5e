mod errors;
mod handle;
mod iter;
mod list;
mod node;

pub use errors::ListError;
pub use handle::{Access, ConstHandle, Handle, MutHandle, Mutable, ReadOnly};
pub use iter::{Handles, IntoIter, Iter, IterMut};
pub use list::{swap, ForwardList};
