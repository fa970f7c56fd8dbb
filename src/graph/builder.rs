use std::fmt::Display;
use std::marker::PhantomData;

use tracing::{debug, info, trace, warn};

use crate::config::Fixtures;
use crate::parser::{Level, Row, RowEntity};
use crate::{Edge, Graph, Node, NodeType, OwlnetsError, OwlnetsResult, DEFAULT_NUM_NODES};

/// Builder state before the hierarchy fixtures are created
pub struct Empty;
/// Builder state after the hierarchy fixtures are created
pub struct Scaffolded;

fn transition_state<TX, TY>(builder: Builder<TX>) -> Builder<TY> {
    Builder::<TY> {
        graph: builder.graph,
        fixtures: builder.fixtures,
        strict: builder.strict,
        report: builder.report,
        state: PhantomData,
    }
}

/// A row that was not added to the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    row: usize,
    missing: Vec<Level>,
}

impl RejectedRow {
    /// The 1-based position of the row in the input sequence
    pub fn row(&self) -> usize {
        self.row
    }

    /// The levels without an identifier
    pub fn missing(&self) -> &[Level] {
        &self.missing
    }

    fn reason(&self) -> String {
        let levels: Vec<String> = self
            .missing
            .iter()
            .map(|level| format!("{level} id"))
            .collect();
        format!("missing {}", levels.join(", "))
    }
}

impl Display for RejectedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.reason())
    }
}

/// Summary of a build: how many rows were processed and which were rejected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    rows: usize,
    rejected: Vec<RejectedRow>,
}

impl BuildReport {
    /// Number of rows passed to the builder, including rejected ones
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of rows that were added to the graph
    pub fn accepted(&self) -> usize {
        self.rows - self.rejected.len()
    }

    /// The rows that were skipped because of missing identifiers
    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }
}

/// Builds a [`Graph`] from crosswalk [`Row`]s in a single pass
///
/// The builder first creates the root and the three parent nodes
/// ([`Builder::add_fixtures`]) and then folds every row into the graph:
///
/// 1. organ node, created on first sight, `organ isa organ parent`
/// 2. ftu node, `ftu isa ftu parent` and `organ has_ftu ftu`
/// 3. ftu part node, `ftu part isa ftu part parent` and `ftu has_ftu_part ftu part`
///
/// Cross-references of every level are merged into the existing node.
///
/// A row that lacks an identifier at any level is rejected as a whole.
/// It does not contribute nodes, edges or cross-references and is listed
/// in the [`BuildReport`]. In strict mode the build fails instead.
///
/// # Examples
///
/// ```
/// use ftu_owlnets::{Builder, Config, Row, RowEntity};
///
/// let fixtures = Config::for_sab("FTU").fixtures().unwrap();
/// let mut builder = Builder::new(&fixtures).unwrap().add_fixtures();
///
/// let row = Row::new(
///     RowEntity::new("L1", "Liver"),
///     RowEntity::new("LB1", "Lobule"),
///     RowEntity::new("", "Sinusoid"),
/// );
/// assert!(!builder.add_row(&row).unwrap());
///
/// let (graph, report) = builder.build();
/// assert_eq!(graph.len(), 4);
/// assert_eq!(report.rejected()[0].row(), 1);
/// ```
pub struct Builder<T> {
    graph: Graph,
    fixtures: Fixtures,
    strict: bool,
    report: BuildReport,
    state: PhantomData<T>,
}

impl Builder<Empty> {
    /// Constructs a new builder for the given hierarchy fixtures
    ///
    /// # Errors
    ///
    /// - [`OwlnetsError::ConfigurationMissing`] if a fixture id, label
    ///   or predicate is blank
    /// - [`OwlnetsError::InvalidConfig`] if two fixtures share an id
    pub fn new(fixtures: &Fixtures) -> OwlnetsResult<Builder<Empty>> {
        fixtures.validate()?;
        Ok(Builder::<Empty> {
            graph: Graph::with_capacity(DEFAULT_NUM_NODES),
            fixtures: fixtures.clone(),
            strict: false,
            report: BuildReport::default(),
            state: PhantomData,
        })
    }

    /// Fail on the first malformed row instead of skipping it
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Builder<Empty> {
        self.strict = strict;
        self
    }

    /// Creates the root, the three parent nodes and their `isa` edges
    #[must_use]
    pub fn add_fixtures(mut self) -> Builder<Scaffolded> {
        let types = [
            NodeType::Root,
            NodeType::OrganParent,
            NodeType::FtuParent,
            NodeType::FtuPartParent,
        ];
        let fixtures = self.fixtures.clone();
        for (fixture, node_type) in fixtures.nodes().into_iter().zip(types) {
            self.graph
                .insert_node(Node::new(&fixture.id, &fixture.label, node_type));
        }
        for level in Level::ALL {
            self.graph.insert_edge(Edge::new(
                &fixtures.parent_of(level).id,
                &fixtures.predicates.isa,
                &fixtures.root.id,
            ));
        }
        debug!(
            nodes = self.graph.len(),
            edges = self.graph.edge_count(),
            "created hierarchy fixtures"
        );
        transition_state(self)
    }
}

impl Builder<Scaffolded> {
    /// Adds a single row to the graph
    ///
    /// Returns `true` if the row was added and `false` if it was
    /// rejected because of a missing identifier.
    ///
    /// # Errors
    ///
    /// [`OwlnetsError::MalformedRow`] for a rejected row in strict mode
    pub fn add_row(&mut self, row: &Row) -> OwlnetsResult<bool> {
        self.report.rows += 1;
        let row_number = self.report.rows;

        let missing = row.missing_ids();
        if !missing.is_empty() {
            let rejected = RejectedRow {
                row: row_number,
                missing,
            };
            warn!("skipping {}", rejected);
            let reason = rejected.reason();
            self.report.rejected.push(rejected);
            if self.strict {
                return Err(OwlnetsError::MalformedRow {
                    row: row_number,
                    reason,
                });
            }
            return Ok(false);
        }

        self.add_entity(Level::Organ, row.organ());

        self.add_entity(Level::Ftu, row.ftu());
        self.graph.insert_edge(Edge::new(
            row.organ().id(),
            &self.fixtures.predicates.has_ftu,
            row.ftu().id(),
        ));

        self.add_entity(Level::FtuPart, row.ftu_part());
        self.graph.insert_edge(Edge::new(
            row.ftu().id(),
            &self.fixtures.predicates.has_ftu_part,
            row.ftu_part().id(),
        ));
        Ok(true)
    }

    /// Adds all rows in the given order
    ///
    /// # Errors
    ///
    /// [`OwlnetsError::MalformedRow`] for the first rejected row in strict mode
    pub fn add_rows<'a, I: IntoIterator<Item = &'a Row>>(&mut self, rows: I) -> OwlnetsResult<()> {
        for row in rows {
            self.add_row(row)?;
        }
        Ok(())
    }

    /// Creates the node of `entity` on first sight and merges its
    /// cross-references
    fn add_entity(&mut self, level: Level, entity: &RowEntity) {
        let node = Node::new(entity.id(), entity.label(), NodeType::from(level));
        if self.graph.insert_node(node) {
            debug!("new {} node {}", level, entity.id());
            self.graph.insert_edge(Edge::new(
                entity.id(),
                &self.fixtures.predicates.isa,
                &self.fixtures.parent_of(level).id,
            ));
        }

        let Some(node) = self.graph.node_mut(entity.id()) else {
            return;
        };
        let added = node.add_dbxrefs(entity.dbxrefs());
        if added > 0 {
            trace!("added {added} dbxrefs to {}", entity.id());
        }
    }

    /// The report of all rows added so far
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Finishes the build and returns the [`Graph`] and the [`BuildReport`]
    pub fn build(self) -> (Graph, BuildReport) {
        info!(
            nodes = self.graph.len(),
            edges = self.graph.edge_count(),
            rows = self.report.rows(),
            rejected = self.report.rejected().len(),
            "graph complete"
        );
        (self.graph, self.report)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Config;

    fn fixtures() -> Fixtures {
        Config::for_sab("FTU").fixtures().unwrap()
    }

    fn scaffolded() -> Builder<Scaffolded> {
        Builder::new(&fixtures()).unwrap().add_fixtures()
    }

    fn row(organ: (&str, &str), ftu: (&str, &str), part: (&str, &str)) -> Row {
        Row::new(
            RowEntity::new(organ.0, organ.1),
            RowEntity::new(ftu.0, ftu.1),
            RowEntity::new(part.0, part.1),
        )
    }

    #[test]
    fn fixtures_only() {
        for _ in 0..3 {
            let (graph, report) = scaffolded().build();
            assert_eq!(graph.len(), 4);
            assert_eq!(graph.edge_count(), 3);
            assert_eq!(report.rows(), 0);

            let ids: Vec<&str> = graph.nodes().map(Node::id).collect();
            assert_eq!(
                ids,
                vec!["FTU:0000000", "FTU:1000000", "FTU:2000000", "FTU:3000000"]
            );
            assert!(graph.contains_edge("FTU:1000000", "isa", "FTU:0000000"));
            assert!(graph.contains_edge("FTU:2000000", "isa", "FTU:0000000"));
            assert!(graph.contains_edge("FTU:3000000", "isa", "FTU:0000000"));
            // parents do not chain to each other
            assert!(!graph.contains_edge("FTU:2000000", "isa", "FTU:1000000"));
        }
    }

    #[test]
    fn liver_example() {
        let mut builder = scaffolded();
        let rows = vec![
            Row::new(
                RowEntity::new("L1", "Liver"),
                RowEntity::new("LB1", "Lobule"),
                RowEntity::new("S1", "Sinusoid").with_dbxrefs(["UBERON:0002107"]),
            ),
            Row::new(
                RowEntity::new("L1", "Liver"),
                RowEntity::new("LB1", "Lobule"),
                RowEntity::new("P1", "PortalTriad").with_dbxrefs(["UBERON:XXXX"]),
            ),
        ];
        builder.add_rows(&rows).unwrap();
        let (graph, report) = builder.build();

        assert_eq!(graph.len(), 8);
        assert_eq!(graph.edge_count(), 10);
        assert_eq!(report.accepted(), 2);

        let ids: Vec<&str> = graph.nodes().skip(4).map(Node::id).collect();
        assert_eq!(ids, vec!["L1", "LB1", "S1", "P1"]);

        assert_eq!(graph.node("L1").unwrap().node_type(), NodeType::Organ);
        assert_eq!(graph.node("LB1").unwrap().label(), "Lobule");
        assert_eq!(graph.node("S1").unwrap().node_type(), NodeType::FtuPart);
        assert!(graph.node("S1").unwrap().dbxrefs().contains("UBERON:0002107"));
        assert!(graph.node("P1").unwrap().dbxrefs().contains("UBERON:XXXX"));
        assert!(graph.node("L1").unwrap().dbxrefs().is_empty());

        for (s, p, o) in [
            ("L1", "isa", "FTU:1000000"),
            ("LB1", "isa", "FTU:2000000"),
            ("L1", "has_ftu", "LB1"),
            ("S1", "isa", "FTU:3000000"),
            ("P1", "isa", "FTU:3000000"),
            ("LB1", "has_ftu_part", "S1"),
            ("LB1", "has_ftu_part", "P1"),
        ] {
            assert!(graph.contains_edge(s, p, o), "missing {s} {p} {o}");
        }
    }

    #[test]
    fn edge_insertion_order() {
        let mut builder = scaffolded();
        let rows = vec![
            row(("L1", "Liver"), ("LB1", "Lobule"), ("S1", "Sinusoid")),
            row(("L1", "Liver"), ("LB1", "Lobule"), ("P1", "PortalTriad")),
        ];
        builder.add_rows(&rows).unwrap();
        let (graph, _) = builder.build();
        let edges: Vec<String> = graph.edges().map(ToString::to_string).collect();
        assert_eq!(
            edges,
            vec![
                "FTU:1000000\tisa\tFTU:0000000",
                "FTU:2000000\tisa\tFTU:0000000",
                "FTU:3000000\tisa\tFTU:0000000",
                "L1\tisa\tFTU:1000000",
                "LB1\tisa\tFTU:2000000",
                "L1\thas_ftu\tLB1",
                "S1\tisa\tFTU:3000000",
                "LB1\thas_ftu_part\tS1",
                "P1\tisa\tFTU:3000000",
                "LB1\thas_ftu_part\tP1",
            ]
        );
    }

    #[test]
    fn organ_dbxrefs_are_merged() {
        let mut builder = scaffolded();
        for (idx, dbxref) in ["UBERON:0002107", "FMA:7197", "UBERON:0002107"]
            .into_iter()
            .enumerate()
        {
            let part_id = format!("S{idx}");
            builder
                .add_row(&Row::new(
                    RowEntity::new("L1", "Liver").with_dbxrefs([dbxref]),
                    RowEntity::new("LB1", "Lobule"),
                    RowEntity::new(&part_id, "Part"),
                ))
                .unwrap();
        }
        let (graph, _) = builder.build();
        assert_eq!(graph.nodes_of_type(NodeType::Organ).count(), 1);
        let organ = graph.node("L1").unwrap();
        let dbxrefs: Vec<&str> = organ.dbxrefs().iter().collect();
        assert_eq!(dbxrefs, vec!["FMA:7197", "UBERON:0002107"]);
    }

    #[test]
    fn first_label_wins() {
        let mut builder = scaffolded();
        builder
            .add_row(&row(("L1", "Liver"), ("LB1", "Lobule"), ("S1", "Sinusoid")))
            .unwrap();
        builder
            .add_row(&row(("L1", "liver"), ("LB1", "Hepatic lobule"), ("S1", "sinusoid")))
            .unwrap();
        let (graph, _) = builder.build();
        assert_eq!(graph.len(), 7);
        assert_eq!(graph.node("L1").unwrap().label(), "Liver");
        assert_eq!(graph.node("LB1").unwrap().label(), "Lobule");
        assert_eq!(graph.node("S1").unwrap().label(), "Sinusoid");
    }

    #[test]
    fn edge_uniqueness() {
        let mut builder = scaffolded();
        let rows = vec![
            row(("L1", "Liver"), ("LB1", "Lobule"), ("S1", "Sinusoid")),
            row(("L1", "Liver"), ("LB1", "Lobule"), ("P1", "PortalTriad")),
            row(("L1", "Liver"), ("LB1", "Lobule"), ("P1", "PortalTriad")),
        ];
        builder.add_rows(&rows).unwrap();
        let (graph, _) = builder.build();
        let has_ftu = graph.edges().filter(|e| e.predicate() == "has_ftu").count();
        let has_ftu_part = graph
            .edges()
            .filter(|e| e.predicate() == "has_ftu_part")
            .count();
        assert_eq!(has_ftu, 1);
        assert_eq!(has_ftu_part, 2);
        assert_eq!(graph.edge_count(), 10);
    }

    #[test]
    fn shared_ftu_across_organs() {
        let mut builder = scaffolded();
        let rows = vec![
            row(("K1", "Kidney"), ("N1", "Nephron"), ("G1", "Glomerulus")),
            row(("K2", "Kidney left"), ("N1", "Nephron"), ("G1", "Glomerulus")),
        ];
        builder.add_rows(&rows).unwrap();
        let (graph, _) = builder.build();
        assert!(graph.contains_edge("K1", "has_ftu", "N1"));
        assert!(graph.contains_edge("K2", "has_ftu", "N1"));
        assert_eq!(graph.nodes_of_type(NodeType::Ftu).count(), 1);
        assert_eq!(
            graph
                .edges()
                .filter(|e| e.subject() == "N1" && e.predicate() == "isa")
                .count(),
            1
        );
    }

    #[test]
    fn hierarchy_integrity() {
        let mut builder = scaffolded();
        let rows = vec![
            row(("L1", "Liver"), ("LB1", "Lobule"), ("S1", "Sinusoid")),
            row(("K1", "Kidney"), ("N1", "Nephron"), ("G1", "Glomerulus")),
            row(("K1", "Kidney"), ("N1", "Nephron"), ("T1", "Tubule")),
        ];
        builder.add_rows(&rows).unwrap();
        let (graph, _) = builder.build();
        let fixtures = fixtures();
        for node in graph.nodes().filter(|node| !node.node_type().is_fixture()) {
            let parent = match node.node_type() {
                NodeType::Organ => &fixtures.organ_parent.id,
                NodeType::Ftu => &fixtures.ftu_parent.id,
                NodeType::FtuPart => &fixtures.ftu_part_parent.id,
                _ => unreachable!(),
            };
            assert!(graph.contains_edge(node.id(), "isa", parent));
        }
    }

    #[test]
    fn rejected_row_contributes_nothing() {
        let mut builder = scaffolded();
        let bad = Row::new(
            RowEntity::new("L1", "Liver").with_dbxrefs(["UBERON:0002107"]),
            RowEntity::new("LB1", "Lobule").with_dbxrefs(["UBERON:0004647"]),
            RowEntity::new("", "Sinusoid"),
        );
        assert!(!builder.add_row(&bad).unwrap());
        assert!(builder
            .add_row(&row(("L1", "Liver"), ("LB1", "Lobule"), ("P1", "PortalTriad")))
            .unwrap());

        let (graph, report) = builder.build();
        assert_eq!(graph.len(), 7);
        assert_eq!(graph.edge_count(), 8);
        assert!(graph.node("L1").unwrap().dbxrefs().is_empty());
        assert!(graph.node("LB1").unwrap().dbxrefs().is_empty());
        assert!(graph.node("").is_none());

        assert_eq!(report.rows(), 2);
        assert_eq!(report.accepted(), 1);
        assert_eq!(report.rejected().len(), 1);
        let rejected = &report.rejected()[0];
        assert_eq!(rejected.row(), 1);
        assert_eq!(rejected.missing(), &[Level::FtuPart]);
        assert_eq!(rejected.to_string(), "row 1: missing ftu_part id");
    }

    #[test]
    fn rejected_row_alone() {
        let mut builder = scaffolded();
        builder
            .add_row(&row(("", "Liver"), ("", "Lobule"), ("S1", "Sinusoid")))
            .unwrap();
        let (graph, report) = builder.build();
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(
            report.rejected()[0].to_string(),
            "row 1: missing organ id, ftu id"
        );
    }

    #[test]
    fn strict_mode_fails() {
        let mut builder = Builder::new(&fixtures()).unwrap().strict(true).add_fixtures();
        builder
            .add_row(&row(("L1", "Liver"), ("LB1", "Lobule"), ("S1", "Sinusoid")))
            .unwrap();
        let err = builder
            .add_row(&row(("L1", "Liver"), ("", "Lobule"), ("S1", "Sinusoid")))
            .unwrap_err();
        match err {
            OwlnetsError::MalformedRow { row, reason } => {
                assert_eq!(row, 2);
                assert_eq!(reason, "missing ftu id");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(builder.report().rejected().len(), 1);
    }

    #[test]
    fn custom_predicates() {
        let mut config = Config::for_sab("FTU");
        config.predicates.isa = "subClassOf".to_string();
        config.predicates.has_ftu = "contains".to_string();
        let mut builder = Builder::new(&config.fixtures().unwrap())
            .unwrap()
            .add_fixtures();
        builder
            .add_row(&row(("L1", "Liver"), ("LB1", "Lobule"), ("S1", "Sinusoid")))
            .unwrap();
        let (graph, _) = builder.build();
        assert!(graph.contains_edge("FTU:1000000", "subClassOf", "FTU:0000000"));
        assert!(graph.contains_edge("L1", "contains", "LB1"));
        assert!(graph.contains_edge("LB1", "has_ftu_part", "S1"));
        assert_eq!(graph.predicates(), vec!["subClassOf", "contains", "has_ftu_part"]);
    }

    #[test]
    fn blank_fixture() {
        let mut fixtures = fixtures();
        fixtures.ftu_parent.label = " ".to_string();
        assert!(matches!(
            Builder::new(&fixtures),
            Err(OwlnetsError::ConfigurationMissing(_))
        ));
    }
}
