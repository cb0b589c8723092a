pub(crate) mod predicate;
pub(crate) mod statement;
pub(crate) mod target;

pub use predicate::{Assignment, Comparator, Condition};
pub use statement::*;
pub use target::SelectList;
