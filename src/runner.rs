//! Sequential evaluation of a set of transitions against one catalog

use crate::error::Result;
use crate::transition::Transition;
use declarative::{ApplyResult, DependencyGraph, ExecuteSummary, Relationship, Synchronizer};

/// Per-transition outcomes of a run
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub summary: ExecuteSummary,
    /// `(transition name, result)` in evaluation order
    pub results: Vec<(String, ApplyResult)>,
}

impl RunOutcome {
    fn record(&mut self, name: &str, result: ApplyResult) {
        self.summary.add_result(&result);
        self.results.push((name.to_string(), result));
    }

    /// Result for a transition by name
    pub fn result(&self, name: &str) -> Option<&ApplyResult> {
        self.results
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }
}

/// Resolve references in place, then register ordering edges
fn prepare(
    transition: &mut Transition,
    graph: &mut dyn DependencyGraph,
) -> Result<Vec<Relationship>> {
    transition.validate(&*graph)?;
    transition.contribute_ordering(graph)
}

/// Validate, order and evaluate every transition
///
/// Each transition succeeds or fails on its own: validation or apply
/// errors are logged and recorded as [`ApplyResult::Failed`], and the
/// remaining transitions still run.
pub fn evaluate_all<G: DependencyGraph>(
    transitions: &mut [Transition],
    graph: &mut G,
    sync: &mut dyn Synchronizer,
) -> RunOutcome {
    let mut outcome = RunOutcome::default();
    let mut ready = Vec::with_capacity(transitions.len());

    for transition in transitions.iter_mut() {
        match prepare(transition, graph) {
            Ok(edges) => {
                log::debug!(
                    "{} ordered before {} resources",
                    transition.key(),
                    edges.len()
                );
                ready.push(&*transition);
            }
            Err(e) => {
                log::warn!("{}: {e}", transition.key());
                outcome.record(
                    transition.name(),
                    ApplyResult::Failed {
                        error: e.to_string(),
                    },
                );
            }
        }
    }

    for transition in ready {
        let result = match transition.evaluate(graph, sync) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("{}: {e}", transition.key());
                ApplyResult::Failed {
                    error: e.to_string(),
                }
            }
        };
        outcome.record(transition.name(), result);
    }

    outcome
}
