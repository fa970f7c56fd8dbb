//! Directed, labeled relationships between two nodes
use std::fmt::Display;

/// A `subject - predicate - object` triple
///
/// Two edges are equal if all three parts are equal. The [`crate::Graph`]
/// contains every triple only once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    subject: String,
    predicate: String,
    object: String,
}

impl Edge {
    /// Constructs a new edge
    pub fn new(subject: &str, predicate: &str, object: &str) -> Self {
        Self {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object: object.to_string(),
        }
    }

    /// The id of the subject node
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The relationship name
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    /// The id of the object node
    pub fn object(&self) -> &str {
        &self.object
    }
}

/// Formats the edge as one line of the OWLNETS edgelist, without newline
impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}\t{}", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality() {
        let mut edges = HashSet::new();
        assert!(edges.insert(Edge::new("L1", "has_ftu", "LB1")));
        assert!(!edges.insert(Edge::new("L1", "has_ftu", "LB1")));
        assert!(edges.insert(Edge::new("LB1", "has_ftu", "L1")));
        assert!(edges.insert(Edge::new("L1", "isa", "LB1")));
    }

    #[test]
    fn display() {
        let edge = Edge::new("S1", "isa", "FTU:3000000");
        assert_eq!(edge.to_string(), "S1\tisa\tFTU:3000000");
        assert_eq!(edge.subject(), "S1");
        assert_eq!(edge.predicate(), "isa");
        assert_eq!(edge.object(), "FTU:3000000");
    }
}
