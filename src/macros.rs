//! Test helpers shared between the modules.

/// Builds a [`Graph`](crate::graph::Graph) out of paths, each consecutive pair of vertices in a
/// path becomes an edge.
macro_rules! graph {
    ($($path:expr),*) => {{
        let mut graph = $crate::graph::Graph::new();

        $(
            let mut iter = $path.into_iter().peekable();
            while let (Some(a), Some(b)) = (iter.next(), iter.peek()) {
                graph.insert($crate::edge::Edge::new(a, *b));
            }
        )*

        graph
    }}
}
