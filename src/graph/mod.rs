use std::collections::{HashMap, HashSet};

use crate::config::Config;
use crate::parser::Row;
use crate::{Edge, Node, NodeType, OwlnetsResult};

mod builder;
pub use builder::{BuildReport, Builder, Empty, RejectedRow, Scaffolded};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `Graph` holds the deduplicated nodes and edges of a crosswalk
///
/// Every node id and every `subject - predicate - object` triple is
/// present only once. Nodes and edges are kept in insertion order:
/// the four hierarchy fixtures first, then every entity in the order
/// it was first seen in the crosswalk.
///
/// # Examples
///
/// ```
/// use ftu_owlnets::{Config, Graph, Row, RowEntity};
///
/// let rows = vec![
///     Row::new(
///         RowEntity::new("L1", "Liver"),
///         RowEntity::new("LB1", "Lobule"),
///         RowEntity::new("S1", "Sinusoid").with_dbxrefs(["UBERON:0002107"]),
///     ),
///     Row::new(
///         RowEntity::new("L1", "Liver"),
///         RowEntity::new("LB1", "Lobule"),
///         RowEntity::new("P1", "PortalTriad"),
///     ),
/// ];
///
/// let (graph, report) = Graph::from_rows(&rows, &Config::for_sab("FTU")).unwrap();
/// assert_eq!(graph.len(), 8);
/// assert_eq!(graph.edge_count(), 10);
/// assert!(report.rejected().is_empty());
///
/// assert!(graph.contains_edge("L1", "has_ftu", "LB1"));
/// assert_eq!(graph.node("S1").unwrap().dbxrefs().to_string(), "UBERON:0002107");
/// ```
///
/// # Layout
///
/// ```mermaid
/// graph BT
///     ORGAN_PARENT[organ parent] -- isa --> ROOT[root]
///     FTU_PARENT[ftu parent] -- isa --> ROOT
///     FTU_PART_PARENT[ftu part parent] -- isa --> ROOT
///     ORGAN[organ] -- isa --> ORGAN_PARENT
///     FTU[ftu] -- isa --> FTU_PARENT
///     FTU_PART[ftu part] -- isa --> FTU_PART_PARENT
///     ORGAN -- has_ftu --> FTU
///     FTU -- has_ftu_part --> FTU_PART
/// ```
#[derive(Debug, Default, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_set: HashSet<Edge>,
}

impl Graph {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            edges: Vec::with_capacity(capacity * 2),
            edge_set: HashSet::with_capacity(capacity * 2),
        }
    }

    /// Builds the graph of all `rows` using the fixtures of `config`
    ///
    /// Malformed rows are skipped and listed in the [`BuildReport`],
    /// unless [`Config::strict`] is set.
    ///
    /// # Errors
    ///
    /// - [`crate::OwlnetsError::ConfigurationMissing`] if a fixture id or label is blank
    /// - [`crate::OwlnetsError::MalformedRow`] for the first malformed row in strict mode
    pub fn from_rows(rows: &[Row], config: &Config) -> OwlnetsResult<(Graph, BuildReport)> {
        let fixtures = config.fixtures()?;
        let mut builder = Builder::new(&fixtures)?
            .strict(config.strict)
            .add_fixtures();
        builder.add_rows(rows)?;
        Ok(builder.build())
    }

    /// Returns the number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph contains no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the [`Node`] with the given id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|idx| &self.nodes[*idx])
    }

    /// Returns `true` if a node with this id exists
    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns `true` if the triple exists
    pub fn contains_edge(&self, subject: &str, predicate: &str, object: &str) -> bool {
        self.edge_set
            .contains(&Edge::new(subject, predicate, object))
    }

    /// Iterates all nodes in insertion order
    pub fn nodes(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Iterates all nodes of the given [`NodeType`] in insertion order
    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(move |node| node.node_type() == node_type)
    }

    /// Iterates all edges in insertion order
    pub fn edges(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    /// Returns the distinct predicates in order of first use
    pub fn predicates(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .map(Edge::predicate)
            .filter(|predicate| seen.insert(*predicate))
            .collect()
    }

    /// Inserts a node unless a node with the same id exists
    ///
    /// Returns whether the node was newly inserted
    fn insert_node(&mut self, node: Node) -> bool {
        if self.index.contains_key(node.id()) {
            return false;
        }
        self.index.insert(node.id().to_string(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        match self.index.get(id) {
            Some(idx) => self.nodes.get_mut(*idx),
            None => None,
        }
    }

    /// Inserts an edge unless the same triple exists
    ///
    /// Returns whether the edge was newly inserted
    fn insert_edge(&mut self, edge: Edge) -> bool {
        if self.edge_set.insert(edge.clone()) {
            self.edges.push(edge);
            true
        } else {
            false
        }
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;
    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
