//! # Transition
//!
//! Conditional state transitions for a declarative configuration engine.
//!
//! A transition watches a set of gate resources (`prior_to`). When any gate
//! has a pending change, the transition forces its target resource through
//! an alternate attribute set before the gates are synchronized. A typical
//! use is stopping a service while its configuration file is rewritten.
//!
//! ## Flow
//!
//! 1. [`Transition::validate`] resolves references against the catalog
//! 2. [`Transition::contribute_ordering`] orders the transition before its
//!    target and gates
//! 3. [`Transition::evaluate`] checks the gates ([`has_pending_change`]) and,
//!    if needed, applies the override attributes ([`apply::apply`])
//!
//! ## Example
//!
//! ```ignore
//! use declarative::Catalog;
//! use transition::{Declarations, evaluate_all};
//!
//! let mut transitions = Declarations::from_toml_str(r#"
//! [[transition]]
//! name = "stop puppet service"
//! resource = "Service[puppet]"
//! attributes = { ensure = "stopped" }
//! prior_to = "File[/tmp/test.cfg]"
//! "#)?
//! .into_transitions()?;
//!
//! let outcome = evaluate_all(&mut transitions, &mut catalog, &mut synchronizer);
//! assert!(outcome.summary.is_success());
//! ```

pub mod apply;
pub mod declaration;
pub mod error;
pub mod ordering;
pub mod pending;
pub mod reference;
pub mod runner;
pub mod transition;

#[cfg(test)]
mod testing;

pub use declaration::{Declarations, OneOrMany, TransitionDecl};
pub use error::{Error, ReferenceProblem, Result};
pub use pending::has_pending_change;
pub use reference::{ResourceReference, resolve, resolve_all};
pub use runner::{RunOutcome, evaluate_all};
pub use transition::{Transition, TransitionState};
