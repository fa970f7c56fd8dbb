//! Runtime configuration of a conversion run
//!
//! A [`Config`] is usually read once from a YAML file and then passed by
//! reference to the [`crate::parser`], the [`crate::Builder`] and the
//! [`crate::writer`].
//!
//! ```yaml
//! sab: FTU
//! source:
//!   path: ftu_crosswalk.csv
//!   skip_rows: 10
//! dbxref_columns:
//!   organ: [organ_uberon]
//!   ftu_part: [ftu_part_uberon, ftu_part_cl]
//! ```
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::parser::Level;
use crate::{OwlnetsError, OwlnetsResult};

/// The full configuration of a conversion run
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Source abbreviation, used as the namespace of every node
    pub sab: String,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub fixtures: FixtureOverrides,
    #[serde(default)]
    pub predicates: Predicates,
    #[serde(default)]
    pub columns: Columns,
    #[serde(default)]
    pub dbxref_columns: DbxrefColumns,
    /// Abort the build on the first malformed row instead of skipping it
    #[serde(default)]
    pub strict: bool,
}

/// Location and layout of the crosswalk table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub path: Option<PathBuf>,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Number of preamble lines before the header line
    #[serde(default)]
    pub skip_rows: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: default_delimiter(),
            skip_rows: 0,
        }
    }
}

fn default_delimiter() -> char {
    ','
}

/// Static descriptive values of the run. They are only logged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    pub schema_version: Option<String>,
    pub contact: Option<String>,
    pub version: Option<String>,
}

/// A fixed `id` / `label` pair of a hierarchy fixture
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureNode {
    pub id: String,
    pub label: String,
}

impl FixtureNode {
    fn new(id: String, label: String) -> Self {
        Self { id, label }
    }
}

/// Optional overrides of the SAB derived fixture nodes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureOverrides {
    pub root: Option<FixtureNode>,
    pub organ_parent: Option<FixtureNode>,
    pub ftu_parent: Option<FixtureNode>,
    pub ftu_part_parent: Option<FixtureNode>,
}

/// Names of the relationships used in the edges file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Predicates {
    #[serde(default = "default_isa")]
    pub isa: String,
    #[serde(default = "default_has_ftu")]
    pub has_ftu: String,
    #[serde(default = "default_has_ftu_part")]
    pub has_ftu_part: String,
}

impl Default for Predicates {
    fn default() -> Self {
        Self {
            isa: default_isa(),
            has_ftu: default_has_ftu(),
            has_ftu_part: default_has_ftu_part(),
        }
    }
}

fn default_isa() -> String {
    "isa".to_string()
}

fn default_has_ftu() -> String {
    "has_ftu".to_string()
}

fn default_has_ftu_part() -> String {
    "has_ftu_part".to_string()
}

/// Header names of the required columns of the crosswalk table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Columns {
    pub organ_id: String,
    pub organ_label: String,
    pub ftu_id: String,
    pub ftu_label: String,
    pub ftu_part_id: String,
    pub ftu_part_label: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            organ_id: "organ_id".to_string(),
            organ_label: "organ_label".to_string(),
            ftu_id: "ftu_id".to_string(),
            ftu_label: "ftu_label".to_string(),
            ftu_part_id: "ftu_part_id".to_string(),
            ftu_part_label: "ftu_part_label".to_string(),
        }
    }
}

impl Columns {
    /// The `(id, label)` column names of the given [`Level`]
    pub fn for_level(&self, level: Level) -> (&str, &str) {
        match level {
            Level::Organ => (&self.organ_id, &self.organ_label),
            Level::Ftu => (&self.ftu_id, &self.ftu_label),
            Level::FtuPart => (&self.ftu_part_id, &self.ftu_part_label),
        }
    }
}

/// Ordered lists of the columns that hold cross-references for each level
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbxrefColumns {
    pub organ: Vec<String>,
    pub ftu: Vec<String>,
    pub ftu_part: Vec<String>,
}

impl DbxrefColumns {
    /// The dbxref column names of the given [`Level`]
    pub fn for_level(&self, level: Level) -> &[String] {
        match level {
            Level::Organ => &self.organ,
            Level::Ftu => &self.ftu,
            Level::FtuPart => &self.ftu_part,
        }
    }
}

/// Resolved ids and labels of the four hierarchy fixtures plus the
/// predicate names
///
/// This is the part of the [`Config`] that the [`crate::Builder`] needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixtures {
    pub root: FixtureNode,
    pub organ_parent: FixtureNode,
    pub ftu_parent: FixtureNode,
    pub ftu_part_parent: FixtureNode,
    pub predicates: Predicates,
}

impl Fixtures {
    /// The fixture nodes in the order they are created
    pub fn nodes(&self) -> [&FixtureNode; 4] {
        [
            &self.root,
            &self.organ_parent,
            &self.ftu_parent,
            &self.ftu_part_parent,
        ]
    }

    /// The parent fixture that entities of `level` are linked to
    pub fn parent_of(&self, level: Level) -> &FixtureNode {
        match level {
            Level::Organ => &self.organ_parent,
            Level::Ftu => &self.ftu_parent,
            Level::FtuPart => &self.ftu_part_parent,
        }
    }

    /// Checks that no id, label or predicate is blank and that the
    /// fixture ids are distinct
    ///
    /// # Errors
    ///
    /// - [`OwlnetsError::ConfigurationMissing`] naming the first blank value
    /// - [`OwlnetsError::InvalidConfig`] if two fixtures share an id
    pub fn validate(&self) -> OwlnetsResult<()> {
        let names = ["root", "organ_parent", "ftu_parent", "ftu_part_parent"];
        for (name, node) in names.iter().zip(self.nodes()) {
            if node.id.trim().is_empty() {
                return Err(OwlnetsError::ConfigurationMissing(format!(
                    "fixtures.{name}.id"
                )));
            }
            if node.label.trim().is_empty() {
                return Err(OwlnetsError::ConfigurationMissing(format!(
                    "fixtures.{name}.label"
                )));
            }
        }
        let ids = self.nodes().map(|node| node.id.trim());
        if ids.iter().enumerate().any(|(idx, id)| ids[..idx].contains(id)) {
            return Err(OwlnetsError::InvalidConfig(
                "fixture ids must be distinct".to_string(),
            ));
        }
        let predicates = [
            ("isa", &self.predicates.isa),
            ("has_ftu", &self.predicates.has_ftu),
            ("has_ftu_part", &self.predicates.has_ftu_part),
        ];
        for (name, value) in predicates {
            if value.trim().is_empty() {
                return Err(OwlnetsError::ConfigurationMissing(format!(
                    "predicates.{name}"
                )));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Constructs a default configuration for the given SAB
    ///
    /// # Examples
    ///
    /// ```
    /// use ftu_owlnets::Config;
    ///
    /// let config = Config::for_sab("FTU");
    /// let fixtures = config.fixtures().unwrap();
    /// assert_eq!(fixtures.root.id, "FTU:0000000");
    /// assert_eq!(fixtures.ftu_part_parent.label, "FTU_ftu_part");
    /// ```
    pub fn for_sab(sab: &str) -> Self {
        Self {
            sab: sab.to_string(),
            source: SourceConfig::default(),
            metadata: Metadata::default(),
            fixtures: FixtureOverrides::default(),
            predicates: Predicates::default(),
            columns: Columns::default(),
            dbxref_columns: DbxrefColumns::default(),
            strict: false,
        }
    }

    /// Parses a configuration from a YAML string
    ///
    /// # Errors
    ///
    /// - [`OwlnetsError::InvalidConfig`] if the YAML is malformed
    /// - [`OwlnetsError::ConfigurationMissing`] if a required value is blank
    pub fn from_yaml_str(s: &str) -> OwlnetsResult<Self> {
        let config: Config =
            serde_yaml::from_str(s).map_err(|err| OwlnetsError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration from a YAML file
    ///
    /// # Errors
    ///
    /// - [`OwlnetsError::ConfigurationMissing`] if the file does not exist
    ///   or a required value is blank
    /// - [`OwlnetsError::InvalidConfig`] if the YAML is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> OwlnetsResult<Self> {
        let filename = path.as_ref().display().to_string();
        let content = fs::read_to_string(path).map_err(|err| {
            OwlnetsError::ConfigurationMissing(format!("cannot read {filename}: {err}"))
        })?;
        let config = Self::from_yaml_str(&content)?;
        info!(sab = %config.sab, "config file found at {filename}");
        Ok(config)
    }

    /// Checks that all required values are present
    ///
    /// # Errors
    ///
    /// [`OwlnetsError::ConfigurationMissing`] naming the first blank value
    pub fn validate(&self) -> OwlnetsResult<()> {
        if self.sab.trim().is_empty() {
            return Err(OwlnetsError::ConfigurationMissing("sab".to_string()));
        }
        for level in Level::ALL {
            let (id, label) = self.columns.for_level(level);
            if id.trim().is_empty() || label.trim().is_empty() {
                return Err(OwlnetsError::ConfigurationMissing(format!(
                    "columns of level {level}"
                )));
            }
        }
        self.fixtures()?;
        Ok(())
    }

    /// Resolves the hierarchy fixtures
    ///
    /// Fixtures that are not overridden in the configuration are derived
    /// from the SAB:
    ///
    /// | fixture         | id            | label          |
    /// |-----------------|---------------|----------------|
    /// | root            | `SAB:0000000` | `SAB`          |
    /// | organ parent    | `SAB:1000000` | `SAB_organ`    |
    /// | ftu parent      | `SAB:2000000` | `SAB_ftu`      |
    /// | ftu part parent | `SAB:3000000` | `SAB_ftu_part` |
    ///
    /// # Errors
    ///
    /// - [`OwlnetsError::ConfigurationMissing`] if any id, label or
    ///   predicate is blank
    /// - [`OwlnetsError::InvalidConfig`] if two fixtures share an id
    pub fn fixtures(&self) -> OwlnetsResult<Fixtures> {
        let sab = self.sab.trim();
        let derive = |num: u32, suffix: &str| {
            let label = if suffix.is_empty() {
                sab.to_string()
            } else {
                format!("{sab}_{suffix}")
            };
            FixtureNode::new(format!("{sab}:{num:07}"), label)
        };
        let fixtures = Fixtures {
            root: self
                .fixtures
                .root
                .clone()
                .unwrap_or_else(|| derive(0, "")),
            organ_parent: self
                .fixtures
                .organ_parent
                .clone()
                .unwrap_or_else(|| derive(1_000_000, "organ")),
            ftu_parent: self
                .fixtures
                .ftu_parent
                .clone()
                .unwrap_or_else(|| derive(2_000_000, "ftu")),
            ftu_part_parent: self
                .fixtures
                .ftu_part_parent
                .clone()
                .unwrap_or_else(|| derive(3_000_000, "ftu_part")),
            predicates: self.predicates.clone(),
        };
        fixtures.validate()?;
        Ok(fixtures)
    }
}
