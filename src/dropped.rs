//! Detection of customers the solver never scheduled.

use std::collections::HashMap;

use tracing::debug;

use crate::error::ReportError;
use crate::model::Dataset;
use crate::tours::Tour;
use crate::traits::AssignmentOracle;
use crate::NodeId;

/// Returns the nodes of every non-boundary slot that is its own successor,
/// in ascending slot order.
pub fn find_dropped<O>(oracle: &O) -> Vec<NodeId>
where
    O: AssignmentOracle + ?Sized,
{
    let dropped: Vec<NodeId> = (0..oracle.slot_count())
        .filter(|&index| !oracle.is_start(index) && !oracle.is_end(index))
        .filter(|&index| oracle.next(index) == index)
        .map(|index| oracle.index_to_node(index))
        .collect();

    debug!(slots = oracle.slot_count(), dropped = dropped.len(), "scanned for dropped nodes");

    dropped
}

/// Checks that every customer of the dataset is either toured or dropped,
/// exactly once. Depots and `excluded` nodes (vehicle start locations) are
/// not counted.
pub fn ensure_coverage(
    tours: &[Tour],
    dropped: &[NodeId],
    dataset: &Dataset,
    excluded: &[NodeId],
) -> Result<(), ReportError> {
    let mut occurrences: HashMap<NodeId, usize> = HashMap::new();

    let visited = tours.iter().flat_map(|tour| tour.stops.iter().map(|stop| stop.node));
    for node in visited.chain(dropped.iter().copied()) {
        if !dataset.node(node)?.depot && !excluded.contains(&node) {
            *occurrences.entry(node).or_default() += 1;
        }
    }

    for customer in dataset.customers().filter(|node| !excluded.contains(&node.id)) {
        let count = occurrences.get(&customer.id).copied().unwrap_or(0);
        if count != 1 {
            return Err(ReportError::InconsistentCoverage {
                node: customer.id,
                occurrences: count,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::SolvedAssignment;
    use crate::model::Node;
    use crate::tours::compile_tours;

    // Slots: 0,1 = starts, 2..=5 customers 1..=4, 6,7 = ends.
    fn assignment() -> SolvedAssignment {
        let mut solved = SolvedAssignment::new(vec![0, 0, 1, 2, 3, 4, 0, 0], vec![0, 1], vec![6, 7]).unwrap();
        solved.set_route(0, &[4]).unwrap();
        solved.set_route(1, &[2]).unwrap();
        solved
    }

    fn dataset() -> Dataset {
        let mut nodes = vec![Node::depot(0, 0.0, 0.0)];
        nodes.extend((1..=4).map(|id| Node::customer(id, "job", id as f64, 0.0)));
        Dataset::new(nodes, HashMap::new(), Vec::new())
    }

    #[test]
    fn test_self_loops_are_dropped() {
        assert_eq!(find_dropped(&assignment()), vec![2, 4]);
    }

    #[test]
    fn test_idle_boundary_slots_are_not_dropped() {
        // Vehicle 0 idles with its start pointing at itself.
        let solved = SolvedAssignment::new(vec![0, 1], vec![0], vec![0]).unwrap();
        assert_eq!(find_dropped(&solved), vec![1]);
    }

    #[test]
    fn test_coverage_holds_for_decoded_solution() {
        let solved = assignment();
        let tours = compile_tours(&solved, false, None).unwrap();
        let dropped = find_dropped(&solved);
        assert_eq!(ensure_coverage(&tours, &dropped, &dataset(), &[]), Ok(()));
    }

    #[test]
    fn test_coverage_detects_missing_and_duplicates() {
        let solved = assignment();
        let tours = compile_tours(&solved, false, None).unwrap();

        assert_eq!(
            ensure_coverage(&tours, &[2], &dataset(), &[]),
            Err(ReportError::InconsistentCoverage { node: 4, occurrences: 0 })
        );
        assert_eq!(
            ensure_coverage(&tours, &[2, 4, 3], &dataset(), &[]),
            Err(ReportError::InconsistentCoverage { node: 3, occurrences: 2 })
        );
        assert_eq!(
            ensure_coverage(&tours, &[2, 4, 9], &dataset(), &[]),
            Err(ReportError::UnknownNodeReference(9))
        );
    }

    #[test]
    fn test_excluded_start_locations_are_ignored() {
        // Customer node 1 doubles as vehicle 1's start location.
        let mut solved = SolvedAssignment::new(vec![0, 1, 1, 2, 3, 4, 0, 0], vec![0, 1], vec![6, 7]).unwrap();
        solved.set_route(0, &[3, 4]).unwrap();
        let tours = compile_tours(&solved, false, None).unwrap();
        let dropped = find_dropped(&solved);
        assert_eq!(dropped, vec![1, 4]);

        assert!(ensure_coverage(&tours, &dropped, &dataset(), &[]).is_err());
        assert_eq!(ensure_coverage(&tours, &dropped, &dataset(), &[1]), Ok(()));
    }
}
