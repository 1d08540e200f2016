//! Ordering contribution
//!
//! A transition must be evaluated before its target and before every gate.
//! The graph only offers a "depends on" relation, so each of those
//! resources is registered as depending on the transition.

use crate::error::Result;
use crate::transition::Transition;
use declarative::{DependencyGraph, Relationship, ResourceIndex};

/// Edges `transition → gate` for each gate, then `transition → target`
///
/// References are resolved so an unknown resource fails here instead of
/// silently adding an edge to nothing.
pub fn relationships(
    transition: &Transition,
    index: &dyn ResourceIndex,
) -> Result<Vec<Relationship>> {
    let source = transition.key();
    let mut edges: Vec<Relationship> = Vec::new();

    for reference in transition.prior_to().iter().chain([transition.target()]) {
        let target = reference.resolve(index)?.key().clone();
        let edge = Relationship::new(source.clone(), target);
        if !edges.contains(&edge) {
            edges.push(edge);
        }
    }

    Ok(edges)
}

/// Register the transition's ordering edges with the graph
pub fn contribute(
    transition: &Transition,
    graph: &mut dyn DependencyGraph,
) -> Result<Vec<Relationship>> {
    let edges = relationships(transition, &*graph)?;
    for edge in &edges {
        log::debug!("Adding ordering edge {edge}");
        graph.add_relationship(edge)?;
    }
    Ok(edges)
}
