//! Reading the organ - FTU - FTU part crosswalk table
//!
//! Every line of the crosswalk describes one full path through the
//! anatomical hierarchy and is represented as a [`Row`]. The same organ
//! or FTU usually appears on many lines.
use std::fmt::Display;

pub mod crosswalk;

/// One of the three entity levels of the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Organ,
    Ftu,
    FtuPart,
}

impl Level {
    /// All levels, from the top of the hierarchy to the bottom
    pub const ALL: [Level; 3] = [Level::Organ, Level::Ftu, Level::FtuPart];
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Organ => write!(f, "organ"),
            Level::Ftu => write!(f, "ftu"),
            Level::FtuPart => write!(f, "ftu_part"),
        }
    }
}

/// The id, label and cross-references of one level of a [`Row`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowEntity {
    id: String,
    label: String,
    dbxrefs: Vec<String>,
}

impl RowEntity {
    /// Constructs a new entity without cross-references
    ///
    /// Leading and trailing whitespace is removed from `id` and `label`
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.trim().to_string(),
            label: label.trim().to_string(),
            dbxrefs: Vec::new(),
        }
    }

    /// Adds cross-references to the entity
    ///
    /// # Examples
    ///
    /// ```
    /// use ftu_owlnets::RowEntity;
    ///
    /// let liver = RowEntity::new("L1", "Liver").with_dbxrefs(["UBERON:0002107"]);
    /// assert_eq!(liver.dbxrefs().count(), 1);
    /// ```
    #[must_use]
    pub fn with_dbxrefs<I: IntoIterator<Item = S>, S: Into<String>>(mut self, dbxrefs: I) -> Self {
        self.dbxrefs.extend(dbxrefs.into_iter().map(Into::into));
        self
    }

    /// The identifier, can be empty for malformed rows
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The cross-references mentioned in this row
    pub fn dbxrefs(&self) -> impl Iterator<Item = &str> {
        self.dbxrefs.iter().map(String::as_str)
    }

    fn push_dbxref(&mut self, dbxref: &str) {
        self.dbxrefs.push(dbxref.to_string());
    }
}

/// One record of the crosswalk table
///
/// A row is not validated on construction. Rows with missing identifiers
/// are rejected by the [`crate::Builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    organ: RowEntity,
    ftu: RowEntity,
    ftu_part: RowEntity,
}

impl Row {
    pub fn new(organ: RowEntity, ftu: RowEntity, ftu_part: RowEntity) -> Self {
        Self {
            organ,
            ftu,
            ftu_part,
        }
    }

    /// The [`RowEntity`] of the given [`Level`]
    pub fn entity(&self, level: Level) -> &RowEntity {
        match level {
            Level::Organ => &self.organ,
            Level::Ftu => &self.ftu,
            Level::FtuPart => &self.ftu_part,
        }
    }

    pub fn organ(&self) -> &RowEntity {
        &self.organ
    }

    pub fn ftu(&self) -> &RowEntity {
        &self.ftu
    }

    pub fn ftu_part(&self) -> &RowEntity {
        &self.ftu_part
    }

    /// Returns the levels whose identifier is empty
    pub fn missing_ids(&self) -> Vec<Level> {
        Level::ALL
            .into_iter()
            .filter(|level| self.entity(*level).id().is_empty())
            .collect()
    }
}
