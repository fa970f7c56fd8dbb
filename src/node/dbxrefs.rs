use std::fmt::Display;
use std::ops::BitOr;

use smallvec::SmallVec;

use crate::{DEFAULT_NUM_DBXREFS, VALUE_SEPARATOR};

/// A set of cross-references of a [`crate::Node`]
///
/// Each cross-reference can occur only once in the set. The values are
/// kept sorted, so that iterating and serializing is deterministic,
/// independent of the order in which rows contributed them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dbxrefs {
    values: SmallVec<[String; DEFAULT_NUM_DBXREFS]>,
}

impl Dbxrefs {
    /// Constructs a new, empty [`Dbxrefs`] set
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the set contains no cross-references
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of cross-references in the set
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Adds a cross-reference to the set
    ///
    /// Returns whether the value was newly inserted. That is:
    ///
    /// - If the set did not previously contain this value, true is returned.
    /// - If the set already contained this value, false is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ftu_owlnets::Dbxrefs;
    ///
    /// let mut dbxrefs = Dbxrefs::new();
    /// assert!(dbxrefs.insert("UBERON:0002107"));
    /// assert!(!dbxrefs.insert("UBERON:0002107"));
    /// assert_eq!(dbxrefs.len(), 1);
    /// ```
    pub fn insert(&mut self, value: &str) -> bool {
        match self
            .values
            .binary_search_by(|probe| probe.as_str().cmp(value))
        {
            Ok(_) => false,
            Err(idx) => {
                self.values.insert(idx, value.to_string());
                true
            }
        }
    }

    /// Adds every value of `other` to the set
    ///
    /// Returns the number of newly inserted values
    pub fn merge<'a, I: IntoIterator<Item = &'a str>>(&mut self, other: I) -> usize {
        other.into_iter().filter(|value| self.insert(value)).count()
    }

    /// Returns `true` if the set contains the value
    pub fn contains(&self, value: &str) -> bool {
        self.values
            .binary_search_by(|probe| probe.as_str().cmp(value))
            .is_ok()
    }

    /// Returns an iterator of the cross-references in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for Dbxrefs {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut set = Dbxrefs::new();
        set.merge(iter);
        set
    }
}

impl BitOr for &Dbxrefs {
    type Output = Dbxrefs;

    fn bitor(self, rhs: &Dbxrefs) -> Dbxrefs {
        let mut union = self.clone();
        union.merge(rhs.iter());
        union
    }
}

/// Formats the set as the OWLNETS `node_dbxrefs` column
impl Display for Dbxrefs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, value) in self.values.iter().enumerate() {
            if idx > 0 {
                write!(f, "{VALUE_SEPARATOR}")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}
