//! Cancellation and progress shared between a run and its caller.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

/// A cloneable handle onto a running analysis.
///
/// The run itself is single-threaded, callers are expected to drive it from a worker thread and
/// keep a clone of the handle to poll progress or cancel it.
///
/// Besides [`cancel`](Self::cancel), a run can be given a node budget with
/// [`cancel_after`](Self::cancel_after). The run then stops by itself once that many nodes have
/// been visited, as if cancelled at that point.
#[derive(Clone, Debug)]
pub struct AnalysisHandle {
    cancelled: Arc<AtomicBool>,
    /// Stop once progress reaches this many visited nodes.
    limit: Arc<AtomicUsize>,
    progress: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
}

impl AnalysisHandle {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            limit: Arc::new(AtomicUsize::new(usize::MAX)),
            progress: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
        }
    }

    /// Asks the run to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Gives the run a budget of `ticks` visited nodes, it stops once the budget is used up.
    ///
    /// The budget counts every node visit across all passes, as reported by
    /// [`progress`](Self::progress). Components finished within the budget are kept in the
    /// report, the one being analysed when it runs out is discarded.
    ///
    /// # Examples
    ///
    /// ```
    /// use netanalyzer::{edge::Edge, graph::Graph, AnalysisRequest, NetworkAnalyzer};
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    /// graph.insert(Edge::new("b", "c"));
    ///
    /// let analyzer = NetworkAnalyzer::new(&graph, AnalysisRequest::undirected()).unwrap();
    /// let handle = analyzer.handle();
    /// handle.cancel_after(1);
    ///
    /// let report = analyzer.run();
    /// assert!(report.cancelled);
    /// assert_eq!(handle.progress(), 1);
    /// ```
    pub fn cancel_after(&self, ticks: usize) {
        self.limit.store(ticks, Ordering::SeqCst);
    }

    /// Whether the run has been asked to stop, or has reached its node budget.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self.progress.load(Ordering::SeqCst) >= self.limit.load(Ordering::SeqCst)
    }

    /// The number of nodes visited so far.
    pub fn progress(&self) -> usize {
        self.progress.load(Ordering::SeqCst)
    }

    /// The number of nodes the run will visit when it isn't cancelled.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub(crate) fn tick(&self) -> usize {
        self.progress.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn cancel() {
        let handle = AnalysisHandle::new(3);
        assert!(!handle.is_cancelled());

        let remote = handle.clone();
        thread::spawn(move || remote.cancel()).join().unwrap();

        assert!(handle.is_cancelled());
    }

    #[test]
    fn budget() {
        let handle = AnalysisHandle::new(3);
        handle.cancel_after(2);

        assert_eq!(handle.tick(), 1);
        assert!(!handle.is_cancelled());
        assert_eq!(handle.tick(), 2);
        assert!(handle.is_cancelled());

        assert_eq!(handle.progress(), 2);
        assert_eq!(handle.total(), 3);
    }
}
