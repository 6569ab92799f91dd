//! Declarative construction of a compiled multistate.

use crate::builder::action::ActionBuilder;
use crate::builder::error::DeclarationError;
use crate::config::MultistateConfig;
use crate::core::Expr;
use crate::effects::{Entity, OnActionCallback};
use crate::graph::CompileError;
use crate::machine::Multistate;
use thiserror::Error;

/// A flag declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDecl {
    pub bit: u8,
    pub id: String,
    pub caption: String,
}

impl StateDecl {
    pub fn new(bit: u8, id: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            bit,
            id: id.into(),
            caption: caption.into(),
        }
    }

    /// Guard leaf testing this flag's bit.
    pub fn expr(&self) -> Expr {
        Expr::bit(self.bit)
    }
}

/// A cluster declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterDecl {
    pub name: String,
    pub guard: Expr,
}

impl ClusterDecl {
    pub fn new(name: impl Into<String>, guard: Expr) -> Self {
        Self {
            name: name.into(),
            guard,
        }
    }
}

/// Errors that can occur while building a multistate from a [`Schema`].
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Everything needed to declare and compile a multistate in one go.
///
/// ```rust
/// use multistate::{ActionBuilder, Expr, MemoryEntity, Multistate, Schema, StateDecl};
///
/// struct Switch;
///
/// impl Schema<MemoryEntity> for Switch {
///     fn states(&self) -> Vec<StateDecl> {
///         vec![StateDecl::new(0, "on", "On")]
///     }
///
///     fn actions(&self) -> Vec<ActionBuilder<MemoryEntity>> {
///         vec![
///             ActionBuilder::new("turn_on").set(["on"]),
///             ActionBuilder::new("turn_off").from(Expr::bit(0)).reset(["on"]),
///         ]
///     }
/// }
///
/// let ms = Multistate::<MemoryEntity>::from_schema(&Switch).unwrap();
/// assert_eq!(ms.combinations().collect::<Vec<_>>(), vec![0, 1]);
/// ```
pub trait Schema<E: Entity> {
    fn config(&self) -> MultistateConfig {
        MultistateConfig::default()
    }

    fn states(&self) -> Vec<StateDecl>;

    fn actions(&self) -> Vec<ActionBuilder<E>>;

    fn clusters(&self) -> Vec<ClusterDecl> {
        Vec::new()
    }

    fn on_action(&self) -> Option<OnActionCallback<E>> {
        None
    }
}

impl<E: Entity> Multistate<E> {
    /// Declare everything `schema` describes, then compile.
    pub fn from_schema<S: Schema<E>>(schema: &S) -> Result<Self, SchemaError> {
        let mut ms = Self::with_config(schema.config());

        for state in schema.states() {
            ms.add_state(state.bit, &state.id, &state.caption)?;
        }
        for builder in schema.actions() {
            ms.register(builder)?;
        }
        for cluster in schema.clusters() {
            ms.add_cluster(&cluster.name, cluster.guard)?;
        }
        if let Some(callback) = schema.on_action() {
            ms.set_on_action(move |event| callback(event))?;
        }

        ms.compile()?;
        Ok(ms)
    }
}
