use std::{collections::HashSet, net::SocketAddr};

use netanalyzer::{edge::Edge, graph::Graph, AnalysisRequest, NetworkAnalyzer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// A mock node implementation, has an address and stores peers.
struct Node {
    addr: SocketAddr,
    peers: HashSet<SocketAddr>,
}

impl Node {
    fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            peers: HashSet::new(),
        }
    }

    fn addr(&self) -> &SocketAddr {
        &self.addr
    }

    fn peers(&self) -> &HashSet<SocketAddr> {
        &self.peers
    }

    fn connect(&mut self, peer: &mut Node) {
        self.peers.insert(*peer.addr());
        peer.peers.insert(*self.addr());
    }

    fn disconnect(&mut self, peer: &mut Node) {
        self.peers.remove(peer.addr());
        peer.peers.remove(self.addr());
    }
}

// Every connection is reported by both of its peers, so the crawled graph is analysed as directed.
fn report(graph: &Graph<SocketAddr>) {
    let request = AnalysisRequest::directed().with_duplicate_edges(graph.has_parallel_edges());
    let report = NetworkAnalyzer::new(graph, request)
        .expect("the crawled network has nodes")
        .run();
    let stats = &report.statistics;

    println!(
        "Total connection count: {}, diameter: {:?}, average shortest path length: {:?}",
        graph.edge_count(),
        stats.integer("diameter"),
        stats.scalar("avSpl"),
    );

    for (addr, metrics) in &report.nodes {
        println!(
            "  {addr}: degree {}, closeness {:?}, betweenness {:?}",
            metrics.degree, metrics.closeness_centrality, metrics.betweenness_centrality
        );
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netanalyzer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    const N: usize = 4;
    let mut nodes: Vec<Node> = vec![];

    for i in 0..N {
        let mut node = Node::new(format!("127.0.0.1:000{i}").parse().unwrap());

        // For each node connect to the previous node as a peer, creating a line topology.
        if let Some(peer) = nodes.last_mut() {
            node.connect(peer);
        }

        nodes.push(node)
    }

    println!("\nCrawling network with {} nodes...", N);

    // Simulate crawling the network and use each node's peers to create the graph.
    let mut graph = Graph::new();
    for node in &nodes {
        for peer in node.peers() {
            graph.insert(Edge::new(*node.addr(), *peer));
        }
    }

    report(&graph);

    // Update the topology by connecting the two bounding nodes in the set.
    println!("Connecting first and last node...");
    let mut last = nodes.pop().expect("vec has no last item");

    nodes
        .first_mut()
        .expect("vec has no first item")
        .connect(&mut last);

    // Add the node back into the set after mutating it.
    nodes.push(last);

    // Simulate crawling the network and updating the graph.
    for node in &nodes {
        let peers: Vec<SocketAddr> = node.peers.iter().cloned().collect();
        graph.update_subset(*node.addr(), &peers);
    }

    report(&graph);

    // Update the topology by removing a connection.
    println!("Disconnecting second to last and last node...");
    let mut last = nodes.pop().expect("vec has no last item");
    let mut second_to_last = nodes.pop().expect("vec has no last item");

    last.disconnect(&mut second_to_last);

    // Add the nodes back into the set after mutating it.
    nodes.push(second_to_last);
    nodes.push(last);

    // Simulate crawling the network and updating the graph.
    for node in nodes {
        let peers: Vec<SocketAddr> = node.peers.iter().cloned().collect();
        graph.update_subset(*node.addr(), &peers);
    }

    report(&graph);

    // A run can also be restricted to a few nodes, only the local parameters are computed then.
    let hub: SocketAddr = "127.0.0.1:0000".parse().unwrap();
    let local = NetworkAnalyzer::new(&graph, AnalysisRequest::directed().with_subset(vec![hub]))
        .expect("the hub is part of the network")
        .run();
    println!(
        "Local statistics for {hub}: {}",
        local.statistics.to_json().expect("statistics serialize")
    );
}
