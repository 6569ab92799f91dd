//! Validation-based lint pass over a compiled multistate.
//!
//! Rules accumulate ALL violations instead of stopping at the first one,
//! using Stillwater's `Validation`. What happens with them at compile time
//! is decided by [`LintLevel`](crate::LintLevel):
//!
//! ```rust
//! use multistate::{Expr, LintLevel, LintViolation, MemoryEntity, Multistate, MultistateConfig};
//!
//! let mut ms = Multistate::<MemoryEntity>::with_config(
//!     MultistateConfig::default().with_lint(LintLevel::Warn),
//! );
//! ms.add_state(0, "a", "A").unwrap();
//! ms.add_state(1, "unused", "Unused").unwrap();
//! ms.add_action("set_a", "Set A", Expr::empty(), &["a"], &[], None, None).unwrap();
//! ms.compile().unwrap();
//!
//! assert_eq!(
//!     ms.lint(),
//!     vec![LintViolation::UnusedState { state: "unused".to_string() }]
//! );
//! ```

mod rules;
mod violations;

pub use violations::LintViolation;

pub(crate) use rules::{enforce, into_violations};

use crate::effects::Entity;
use crate::machine::Multistate;

impl<E: Entity> Multistate<E> {
    /// Run every lint rule against the compiled graph.
    ///
    /// Returns nothing before a successful compile.
    pub fn lint(&self) -> Vec<LintViolation> {
        self.graph
            .as_ref()
            .map(|graph| into_violations(enforce(self, graph)))
            .unwrap_or_default()
    }
}
