use crate::graph::GraphTrait;
use crate::grid::NodeIndex;

/// Follows predecessor links from `target` back to `source`.
///
/// Returns the path in travel order, starting at `source`. `None` if the chain breaks before
/// reaching `source` or grows longer than `node_count`, which can only happen on a cycle.
pub fn reconstruct_path(
    previous: impl Fn(NodeIndex) -> Option<NodeIndex>,
    node_count: usize,
    source: NodeIndex,
    target: NodeIndex,
) -> Option<Vec<NodeIndex>> {
    let mut path = vec![target];
    let mut current = target;

    while current != source {
        current = previous(current)?;
        path.push(current);
        if path.len() > node_count {
            return None;
        }
    }

    path.reverse();
    Some(path)
}

/// Sum of the edge weights along `path`, `None` if two consecutive nodes are not adjacent
pub fn path_cost<G: GraphTrait>(graph: &G, path: &[NodeIndex]) -> Option<u32> {
    path.windows(2).try_fold(0u32, |total, pair| {
        let weight = graph
            .neighbors_of(pair[0])
            .filter(|(n, _)| *n == pair[1])
            .map(|(_, w)| w)
            .min()?;
        Some(total.saturating_add(weight))
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::MazeGraph;
    use crate::grid::Point;

    #[test]
    fn test_walks_back_to_source() {
        let previous = [None, Some(0), Some(1), Some(1)];
        assert_eq!(
            reconstruct_path(|n| previous[n], 4, 0, 2),
            Some(vec![0, 1, 2])
        );
        assert_eq!(
            reconstruct_path(|n| previous[n], 4, 0, 3),
            Some(vec![0, 1, 3])
        );
    }

    #[test]
    fn test_single_node_path() {
        let previous = [None, None];
        assert_eq!(reconstruct_path(|n| previous[n], 2, 1, 1), Some(vec![1]));
    }

    #[test]
    fn test_unreached_target() {
        let previous = [None, Some(0), None];
        assert_eq!(reconstruct_path(|n| previous[n], 3, 0, 2), None);
    }

    #[test]
    fn test_cycle_is_cut_off() {
        let previous = [None, Some(2), Some(1)];
        assert_eq!(reconstruct_path(|n| previous[n], 3, 0, 2), None);
    }

    #[test]
    fn test_path_cost() {
        let mut graph = MazeGraph::new(vec![Point::new(0, 0), Point::new(0, 3), Point::new(2, 3)]);
        graph.connect(0, 1, 3);
        graph.connect(1, 2, 2);

        assert_eq!(path_cost(&graph, &[0, 1, 2]), Some(5));
        assert_eq!(path_cost(&graph, &[2]), Some(0));
        assert_eq!(path_cost(&graph, &[0, 2]), None);
    }
}
