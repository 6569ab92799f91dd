//! Pure core: flags, guard expressions, availability gates and history.
//!
//! Nothing in this module performs I/O or holds mutable state.

mod expr;
mod flag;
mod gate;
mod history;

pub use expr::Expr;
pub use flag::{Combination, Flag, EMPTY, MAX_BIT, RESERVED_IDS};
pub use gate::Gate;
pub use history::{ActionHistory, ActionRecord};

pub(crate) use flag::{is_reserved, is_valid_identifier};
