//! A module for working with edges.

/// A pair of vertices representing a graph edge.
///
/// Edges are stored with a direction, `source` to `target`. Whether that direction is honoured
/// is decided by the analysis request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge<T> {
    source: T,
    target: T,
}

impl<T> Edge<T> {
    /// Creates a new edge from two vertices.
    ///
    /// # Examples
    ///
    /// ```
    /// use netanalyzer::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    /// assert_ne!(edge, Edge::new("b", "a"));
    /// ```
    pub fn new(source: T, target: T) -> Self {
        Self { source, target }
    }

    /// Returns the vertex the edge leaves from.
    ///
    /// # Examples
    ///
    /// ```
    /// use netanalyzer::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    /// assert_eq!(edge.source(), &"a");
    /// ```
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Returns the vertex the edge points to.
    ///
    /// # Examples
    ///
    /// ```
    /// use netanalyzer::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    /// assert_eq!(edge.target(), &"b");
    /// ```
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns whether both ends of the edge are the same vertex.
    pub fn is_self_loop(&self) -> bool
    where
        T: PartialEq,
    {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        let (source, target) = ("a", "b");

        assert_eq!(Edge::new(source, target), Edge { source, target })
    }

    #[test]
    fn source() {
        let (a, b) = ("a", "b");
        let edge = Edge::new(a, b);

        assert_eq!(edge.source(), &a);
    }

    #[test]
    fn target() {
        let (a, b) = ("a", "b");
        let edge = Edge::new(a, b);

        assert_eq!(edge.target(), &b);
    }

    #[test]
    fn self_loop() {
        assert!(Edge::new("a", "a").is_self_loop());
        assert!(!Edge::new("a", "b").is_self_loop());
    }

    #[test]
    fn direction_matters_for_equality() {
        let (a, b) = ("a", "b");

        assert_eq!(Edge::new(a, b), Edge::new(a, b));
        assert_ne!(Edge::new(a, b), Edge::new(b, a));
    }
}
