//! Flags: the named bits a multistate is composed of.
//!
//! A combination of flags is a plain `u64`. There are no allocated state
//! objects; identity and equality are integer comparison.

use serde::{Deserialize, Serialize};

/// A combination of flags, one bit per declared state.
pub type Combination = u64;

/// The combination with no flags set. Always present in a compiled graph.
pub const EMPTY: Combination = 0;

/// Highest bit a flag may occupy.
pub const MAX_BIT: u8 = 63;

/// Identifiers reserved for the `empty` and `any` guard leaves.
pub const RESERVED_IDS: [&str; 2] = ["empty", "any"];

/// One named bit of a combination.
///
/// Flags are created by [`Multistate::add_state`](crate::Multistate::add_state)
/// and are immutable afterwards. They are cheap to clone and can be used
/// directly as guard leaves:
///
/// ```rust
/// use multistate::{Expr, Multistate, MemoryEntity};
///
/// let mut ms = Multistate::<MemoryEntity>::new("New");
/// let signed = ms.add_state(0, "signed", "Signed").unwrap();
///
/// assert_eq!(signed.mask(), 1);
/// assert!(Expr::from(&signed).eval(0b1));
/// assert!(!signed.is_set(0b10));
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Flag {
    pub(crate) id: String,
    pub(crate) caption: String,
    pub(crate) bit: u8,
}

impl Flag {
    pub(crate) fn new(bit: u8, id: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            caption: caption.into(),
            bit,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn bit(&self) -> u8 {
        self.bit
    }

    /// The single-bit mask of this flag.
    pub fn mask(&self) -> Combination {
        1 << self.bit
    }

    /// Check whether this flag is set in `combination`.
    pub fn is_set(&self, combination: Combination) -> bool {
        combination & self.mask() != 0
    }
}

impl AsRef<str> for Flag {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

/// Check a state or action identifier against `[a-z0-9_-]+`.
pub(crate) fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

pub(crate) fn is_reserved(id: &str) -> bool {
    RESERVED_IDS.contains(&id)
}
