//! Parses a delimiter separated crosswalk table into [`Row`]s
//!
//! ```text
//! organ_id,organ_label,ftu_id,ftu_label,ftu_part_id,ftu_part_label,ftu_part_uberon
//! UBERON:0002107,liver,UBERON:0004647,liver lobule,UBERON:0001281,hepatic sinusoid,UBERON:0001281
//! UBERON:0002107,liver,UBERON:0004647,liver lobule,UBERON:0003936,portal triad,
//! ```
//!
//! HRA crosswalks start with a preamble of descriptive lines before the
//! header. Those are skipped using [`crate::config::SourceConfig::skip_rows`].
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::config::{Columns, Config, DbxrefColumns};
use crate::parser::{Level, Row, RowEntity};
use crate::{OwlnetsError, OwlnetsResult, VALUE_SEPARATOR};

/// Placeholder that spreadsheet exports write for empty cells
const MISSING_VALUE: &str = "nan";

/// Positions of the configured columns inside the header
struct ColumnIndex {
    ids: [usize; 3],
    labels: [usize; 3],
    dbxrefs: [Vec<usize>; 3],
}

impl ColumnIndex {
    fn try_new(
        header: &StringRecord,
        columns: &Columns,
        dbxref_columns: &DbxrefColumns,
    ) -> OwlnetsResult<Self> {
        let position = |name: &str| {
            header
                .iter()
                .position(|col| col == name)
                .ok_or_else(|| OwlnetsError::SourceUnavailable(format!("missing column `{name}`")))
        };

        let mut ids = [0; 3];
        let mut labels = [0; 3];
        let mut dbxrefs: [Vec<usize>; 3] = Default::default();
        for (idx, level) in Level::ALL.into_iter().enumerate() {
            let (id, label) = columns.for_level(level);
            ids[idx] = position(id)?;
            labels[idx] = position(label)?;
            for name in dbxref_columns.for_level(level) {
                dbxrefs[idx].push(position(name)?);
            }
        }
        Ok(Self {
            ids,
            labels,
            dbxrefs,
        })
    }

    fn row(&self, record: &StringRecord) -> Row {
        let mut entities = Level::ALL.map(|level| {
            let idx = level as usize;
            RowEntity::new(cell(record, self.ids[idx]), cell(record, self.labels[idx]))
        });
        for (entity, positions) in entities.iter_mut().zip(&self.dbxrefs) {
            for pos in positions {
                for dbxref in split_dbxrefs(cell(record, *pos)) {
                    entity.push_dbxref(dbxref);
                }
            }
        }
        let [organ, ftu, ftu_part] = entities;
        Row::new(organ, ftu, ftu_part)
    }
}

/// Returns the cell at `pos` or an empty string for short records
fn cell(record: &StringRecord, pos: usize) -> &str {
    let value = record.get(pos).unwrap_or_default().trim();
    if value == MISSING_VALUE {
        ""
    } else {
        value
    }
}

/// Splits a multi-valued dbxref cell and drops blank values
fn split_dbxrefs(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|dbxref| !dbxref.is_empty() && *dbxref != MISSING_VALUE)
}

/// Removes the preamble lines before the header
fn skip_preamble<R: BufRead>(reader: &mut R, lines: usize) -> OwlnetsResult<()> {
    let mut trash = String::with_capacity(80);
    for line in 0..lines {
        trash.clear();
        let bytes = reader.read_line(&mut trash).map_err(|err| {
            OwlnetsError::SourceUnavailable(format!("cannot read preamble line {}: {err}", line + 1))
        })?;
        if bytes == 0 {
            return Err(OwlnetsError::SourceUnavailable(format!(
                "table ends inside the preamble after {line} lines"
            )));
        }
    }
    Ok(())
}

/// Parses all rows of a crosswalk table
///
/// # Errors
///
/// [`OwlnetsError::SourceUnavailable`] if the table cannot be read,
/// the header is missing, or a configured column is not in the header.
/// Rows with missing values are not an error here, they are rejected
/// by the [`crate::Builder`].
///
/// # Examples
///
/// ```
/// use ftu_owlnets::Config;
/// use ftu_owlnets::parser::crosswalk;
///
/// let table = "organ_id,organ_label,ftu_id,ftu_label,ftu_part_id,ftu_part_label\n\
///              L1,Liver,LB1,Lobule,S1,Sinusoid\n";
/// let rows = crosswalk::read(table.as_bytes(), &Config::for_sab("FTU")).unwrap();
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].ftu().label(), "Lobule");
/// ```
pub fn read<R: Read>(reader: R, config: &Config) -> OwlnetsResult<Vec<Row>> {
    let delimiter = u8::try_from(config.source.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            OwlnetsError::InvalidConfig(format!(
                "delimiter `{}` must be a single ASCII character",
                config.source.delimiter
            ))
        })?;

    let mut reader = BufReader::new(reader);
    skip_preamble(&mut reader, config.source.skip_rows)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = csv_reader
        .headers()
        .map_err(|err| OwlnetsError::SourceUnavailable(format!("invalid header: {err}")))?
        .clone();
    if header.is_empty() {
        return Err(OwlnetsError::SourceUnavailable(
            "table does not contain a header".to_string(),
        ));
    }
    debug!("header: {:?}", header);
    let index = ColumnIndex::try_new(&header, &config.columns, &config.dbxref_columns)?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|err| {
            OwlnetsError::SourceUnavailable(format!("invalid data in row {}: {err}", rows.len() + 1))
        })?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(index.row(&record));
    }
    Ok(rows)
}

/// Parses all rows of a crosswalk file
///
/// # Errors
///
/// [`OwlnetsError::SourceUnavailable`] if the file cannot be opened,
/// otherwise see [`read`]
pub fn read_file<P: AsRef<Path>>(file: P, config: &Config) -> OwlnetsResult<Vec<Row>> {
    let filename = file.as_ref().display().to_string();
    let fh = File::open(file)
        .map_err(|err| OwlnetsError::SourceUnavailable(format!("cannot open {filename}: {err}")))?;
    let rows = read(fh, config)?;
    info!("read {} rows from {filename}", rows.len());
    Ok(rows)
}
