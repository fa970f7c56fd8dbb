//! Nodes of the OWLNETS graph
use std::fmt::Display;

mod dbxrefs;
pub use dbxrefs::Dbxrefs;

use crate::parser::Level;

/// The role of a [`Node`] inside the four level hierarchy
///
/// The first four variants are the hierarchy fixtures that exist
/// independent of the crosswalk content, the other three are created
/// from the rows of the crosswalk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    Root,
    OrganParent,
    FtuParent,
    FtuPartParent,
    Organ,
    Ftu,
    FtuPart,
}

impl NodeType {
    /// Returns `true` for the root and the three parent nodes
    pub fn is_fixture(&self) -> bool {
        matches!(
            self,
            NodeType::Root | NodeType::OrganParent | NodeType::FtuParent | NodeType::FtuPartParent
        )
    }

    /// The parent fixture type of an entity type
    ///
    /// Returns `None` for the fixtures themselves
    pub fn parent(&self) -> Option<NodeType> {
        match self {
            NodeType::Organ => Some(NodeType::OrganParent),
            NodeType::Ftu => Some(NodeType::FtuParent),
            NodeType::FtuPart => Some(NodeType::FtuPartParent),
            _ => None,
        }
    }
}

impl From<Level> for NodeType {
    fn from(level: Level) -> Self {
        match level {
            Level::Organ => NodeType::Organ,
            Level::Ftu => NodeType::Ftu,
            Level::FtuPart => NodeType::FtuPart,
        }
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeType::Root => "root",
            NodeType::OrganParent => "organ-parent",
            NodeType::FtuParent => "ftu-parent",
            NodeType::FtuPartParent => "ftu-part-parent",
            NodeType::Organ => "organ",
            NodeType::Ftu => "ftu",
            NodeType::FtuPart => "ftu-part",
        };
        write!(f, "{name}")
    }
}

/// A unique entity of the graph
///
/// A node is created only once per id. Every later mention of the same id
/// can only add cross-references, the label is kept from the first mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: String,
    label: String,
    node_type: NodeType,
    dbxrefs: Dbxrefs,
}

impl Node {
    /// Initializes a new Node without cross-references
    ///
    /// This method should rarely, if ever, be used directly. The
    /// preferred way to create new nodes is through the [`crate::Builder`]
    /// to ensure that each node exists only once.
    pub fn new(id: &str, label: &str, node_type: NodeType) -> Node {
        Node {
            id: id.to_string(),
            label: label.to_string(),
            node_type,
            dbxrefs: Dbxrefs::default(),
        }
    }

    /// The unique id of the node
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name of the node
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The [`NodeType`] of the node
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// The cross-references collected for the node
    pub fn dbxrefs(&self) -> &Dbxrefs {
        &self.dbxrefs
    }

    /// Adds cross-references to the node
    ///
    /// Returns the number of newly added values
    pub fn add_dbxrefs<'a, I: IntoIterator<Item = &'a str>>(&mut self, dbxrefs: I) -> usize {
        self.dbxrefs.merge(dbxrefs)
    }
}
