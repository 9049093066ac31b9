//! Airport reference table
//!
//! Loads `airport-lookup.csv` style tables into an ordered, read-only set of
//! [`AirportRecord`]s. Loading is all-or-nothing: the first bad header or row
//! rejects the whole table.

use itinerary_core::{Diagnostic, DiagnosticCode, Location, Severity};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Header names every reference table must provide (in any order)
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "name",
    "iso_country",
    "municipality",
    "icao_code",
    "iata_code",
    "coordinates",
];

/// One airport row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirportRecord {
    pub name: String,
    pub iso_country: String,
    pub municipality: String,
    /// 4-letter ICAO code
    pub icao_code: String,
    /// 3-letter IATA code
    pub iata_code: String,
    pub coordinates: String,
}

/// Column positions of the required fields within a table's header
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    name: usize,
    iso_country: usize,
    municipality: usize,
    icao_code: usize,
    iata_code: usize,
    coordinates: usize,
}

impl ColumnIndex {
    /// Locate every required column, or name all of the missing ones
    fn from_header(header: &csv::StringRecord) -> Result<Self, LookupError> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (index, column) in header.iter().enumerate() {
            // Later duplicates win, matching a plain name -> index map
            positions.insert(column, index);
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !positions.contains_key(*column))
            .map(|column| column.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(LookupError::Schema { missing });
        }

        Ok(Self {
            name: positions["name"],
            iso_country: positions["iso_country"],
            municipality: positions["municipality"],
            icao_code: positions["icao_code"],
            iata_code: positions["iata_code"],
            coordinates: positions["coordinates"],
        })
    }

    fn pairs(&self) -> [(&'static str, usize); 6] {
        [
            ("name", self.name),
            ("iso_country", self.iso_country),
            ("municipality", self.municipality),
            ("icao_code", self.icao_code),
            ("iata_code", self.iata_code),
            ("coordinates", self.coordinates),
        ]
    }

    fn extract(&self, row: &csv::StringRecord, line: u64) -> Result<AirportRecord, LookupError> {
        for (column, index) in self.pairs() {
            if row.get(index).map_or(true, str::is_empty) {
                return Err(LookupError::EmptyField {
                    line,
                    column: column.to_string(),
                });
            }
        }

        let field = |index: usize| row.get(index).unwrap_or_default().to_string();

        Ok(AirportRecord {
            name: field(self.name),
            iso_country: field(self.iso_country),
            municipality: field(self.municipality),
            icao_code: field(self.icao_code),
            iata_code: field(self.iata_code),
            coordinates: field(self.coordinates),
        })
    }
}

/// Ordered airport records with first-match code lookups
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    records: Vec<AirportRecord>,
    by_iata: HashMap<String, usize>,
    by_icao: HashMap<String, usize>,
}

impl ReferenceTable {
    /// Load a reference table from a CSV file
    pub fn from_file(path: &Path) -> Result<Self, LookupError> {
        let file = std::fs::File::open(path).map_err(|source| LookupError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let table = Self::from_reader(std::io::BufReader::new(file))?;
        tracing::debug!(path = %path.display(), records = table.len(), "loaded airport lookup");
        Ok(table)
    }

    /// Load a reference table from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LookupError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header = reader.headers()?.clone();
        let columns = ColumnIndex::from_header(&header)?;

        let mut table = Self::default();
        for (index, row) in reader.records().enumerate() {
            let row = row?;
            let line = row.position().map_or(index as u64 + 2, |p| p.line());

            if row.len() != header.len() {
                return Err(LookupError::RowShape {
                    line,
                    expected: header.len(),
                    found: row.len(),
                });
            }

            table.push(columns.extract(&row, line)?);
        }

        Ok(table)
    }

    /// Parse a reference table held in memory
    pub fn from_csv_str(csv: &str) -> Result<Self, LookupError> {
        Self::from_reader(csv.as_bytes())
    }

    fn push(&mut self, record: AirportRecord) {
        let index = self.records.len();
        // First record in table order wins
        self.by_iata.entry(record.iata_code.clone()).or_insert(index);
        self.by_icao.entry(record.icao_code.clone()).or_insert(index);
        self.records.push(record);
    }

    /// First record whose IATA code matches
    pub fn by_iata(&self, code: &str) -> Option<&AirportRecord> {
        self.by_iata.get(code).map(|&index| &self.records[index])
    }

    /// First record whose ICAO code matches
    pub fn by_icao(&self, code: &str) -> Option<&AirportRecord> {
        self.by_icao.get(code).map(|&index| &self.records[index])
    }

    /// All records in load order
    pub fn records(&self) -> &[AirportRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reference table load failure. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("unreadable CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing or incorrect headers: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("line {line}: expected {expected} fields, found {found}")]
    RowShape { line: u64, expected: usize, found: usize },

    #[error("line {line}: missing data in column '{column}'")]
    EmptyField { line: u64, column: String },
}

impl LookupError {
    /// Line of the offending row, for row-level failures
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::RowShape { line, .. } | Self::EmptyField { line, .. } => Some(*line),
            Self::Csv(err) => err.position().map(|p| p.line()),
            Self::Io { .. } | Self::Schema { .. } => None,
        }
    }

    /// Convert to a report diagnostic
    pub fn to_diagnostic(&self, file: &Path) -> Diagnostic {
        let diag = Diagnostic::new(
            DiagnosticCode::ReferenceTableMalformed,
            Severity::Error,
            format!("airport lookup malformed: {}", self),
        );

        match self.line() {
            Some(line) => {
                diag.with_location(Location::in_file(file.display().to_string(), line as usize))
            }
            None => diag,
        }
    }
}
