//! Serialization of a [`Graph`] to the OWLNETS text files
//!
//! An OWLNETS export consists of three tab separated files, each with
//! a header line:
//!
//! - `OWLNETS_node_metadata.txt`
//!     `node_id  node_namespace  node_label  node_definition  node_synonyms  node_dbxrefs`
//! - `OWLNETS_edgelist.txt`
//!     `subject  predicate  object`
//! - `OWLNETS_relations.txt`
//!     `relation_id  relation_namespace  relation_label  relation_definition`
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::{Graph, OwlnetsResult};

pub const NODES_FILE: &str = "OWLNETS_node_metadata.txt";
pub const EDGES_FILE: &str = "OWLNETS_edgelist.txt";
pub const RELATIONS_FILE: &str = "OWLNETS_relations.txt";

const NODES_HEADER: [&str; 6] = [
    "node_id",
    "node_namespace",
    "node_label",
    "node_definition",
    "node_synonyms",
    "node_dbxrefs",
];
const EDGES_HEADER: [&str; 3] = ["subject", "predicate", "object"];
const RELATIONS_HEADER: [&str; 4] = [
    "relation_id",
    "relation_namespace",
    "relation_label",
    "relation_definition",
];

/// Paths of the files created by [`write_dir`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwlnetsFiles {
    pub nodes: PathBuf,
    pub edges: PathBuf,
    pub relations: PathBuf,
}

/// Replaces tabs and line breaks that would break the row layout
fn clean(value: &str) -> Cow<'_, str> {
    if value.contains(['\t', '\n', '\r']) {
        Cow::Owned(value.replace(['\t', '\n', '\r'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

fn write_header<W: Write>(writer: &mut W, header: &[&str]) -> OwlnetsResult<()> {
    writeln!(writer, "{}", header.join("\t"))?;
    Ok(())
}

/// Writes the node metadata file
///
/// Definitions and synonyms are not part of a crosswalk and are left empty.
pub fn write_nodes<W: Write>(writer: &mut W, graph: &Graph, namespace: &str) -> OwlnetsResult<()> {
    write_header(writer, &NODES_HEADER)?;
    for node in graph {
        writeln!(
            writer,
            "{}\t{}\t{}\t\t\t{}",
            clean(node.id()),
            namespace,
            clean(node.label()),
            clean(&node.dbxrefs().to_string())
        )?;
    }
    Ok(())
}

/// Writes the edge list file
pub fn write_edges<W: Write>(writer: &mut W, graph: &Graph) -> OwlnetsResult<()> {
    write_header(writer, &EDGES_HEADER)?;
    for edge in graph.edges() {
        writeln!(
            writer,
            "{}\t{}\t{}",
            clean(edge.subject()),
            clean(edge.predicate()),
            clean(edge.object())
        )?;
    }
    Ok(())
}

/// Writes the relations file with one line per predicate of the graph
pub fn write_relations<W: Write>(
    writer: &mut W,
    graph: &Graph,
    namespace: &str,
) -> OwlnetsResult<()> {
    write_header(writer, &RELATIONS_HEADER)?;
    for predicate in graph.predicates() {
        let predicate = clean(predicate);
        writeln!(writer, "{predicate}\t{namespace}\t{predicate}\t")?;
    }
    Ok(())
}

fn write_file<P, F>(path: P, write: F) -> OwlnetsResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> OwlnetsResult<()>,
{
    info!("building: {}", path.as_ref().display());
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes all OWLNETS files of the graph into `dir`
///
/// The directory is created if it does not exist, existing files are
/// overwritten.
///
/// # Errors
///
/// [`crate::OwlnetsError::Io`] if the directory or a file cannot be written
///
/// # Examples
///
/// ```no_run
/// use ftu_owlnets::{Config, Graph};
/// use ftu_owlnets::writer;
///
/// let config = Config::for_sab("FTU");
/// let (graph, _) = Graph::from_rows(&[], &config).unwrap();
/// let files = writer::write_dir("owlnets/FTU", &graph, &config.sab).unwrap();
/// println!("{}", files.nodes.display());
/// ```
pub fn write_dir<P: AsRef<Path>>(
    dir: P,
    graph: &Graph,
    namespace: &str,
) -> OwlnetsResult<OwlnetsFiles> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let files = OwlnetsFiles {
        nodes: dir.join(NODES_FILE),
        edges: dir.join(EDGES_FILE),
        relations: dir.join(RELATIONS_FILE),
    };
    write_file(&files.nodes, |w| write_nodes(w, graph, namespace))?;
    write_file(&files.edges, |w| write_edges(w, graph))?;
    write_file(&files.relations, |w| write_relations(w, graph, namespace))?;
    Ok(files)
}
