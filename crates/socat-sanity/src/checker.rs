//! Record normalization over CSV data files.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::calculate::{DataCalculator, DataRecord, MetadataContext};
use crate::config::{ColumnConfig, InvalidValuePolicy};
use crate::error::{Result, SanityError};
use crate::units::{UnitConverter, UnitConverterRegistry};

/// A cell that could not be converted or calculated, or cells beyond the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckIssue {
    /// Line in the data file (1-based, header included).
    pub line: usize,
    /// Empty when the issue concerns cells beyond the header.
    pub column: String,
    /// Raw cell text; empty for calculated columns.
    pub value: String,
    pub message: String,
}

/// Normalized data and the issues found while producing it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub issues: Vec<CheckIssue>,
}

impl CheckedTable {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Writes headers and rows as CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = WriterBuilder::new().from_writer(writer);
        csv.write_record(&self.headers)?;
        for row in &self.rows {
            csv.write_record(row)?;
        }
        csv.flush()?;
        Ok(())
    }
}

enum ColumnAction<'r> {
    Convert {
        converter: &'r dyn UnitConverter,
        unit: String,
    },
    Calculate(Box<dyn DataCalculator>),
}

struct ResolvedColumn<'r> {
    name: String,
    action: ColumnAction<'r>,
}

/// Applies configured conversions and calculations to every record of a file.
pub struct SanityChecker<'r> {
    config: ColumnConfig,
    columns: Vec<ResolvedColumn<'r>>,
}

impl<'r> SanityChecker<'r> {
    /// Resolves each configured column against `registry` up front, so an
    /// unknown unit fails before any data is read.
    pub fn from_config(config: ColumnConfig, registry: &'r UnitConverterRegistry) -> Result<Self> {
        config.validate()?;
        let mut columns = Vec::with_capacity(config.columns.len());
        for spec in &config.columns {
            let action = match (&spec.unit, &spec.calculator) {
                (Some(unit), None) => {
                    let converter = registry
                        .find(unit)
                        .ok_or_else(|| SanityError::UnsupportedUnit(unit.clone()))?;
                    debug!(column = %spec.name, unit = %unit, converter = converter.name(), "resolved converter");
                    ColumnAction::Convert {
                        converter,
                        unit: unit.clone(),
                    }
                }
                (None, Some(calculator)) => {
                    let calculator = calculator.build();
                    debug!(column = %spec.name, calculator = calculator.name(), "resolved calculator");
                    ColumnAction::Calculate(calculator)
                }
                (None, None) => continue,
                (Some(_), Some(_)) => {
                    return Err(SanityError::Config(format!(
                        "column '{}' has both a unit and a calculator",
                        spec.name
                    )));
                }
            };
            columns.push(ResolvedColumn {
                name: spec.name.trim().to_string(),
                action,
            });
        }
        Ok(Self { config, columns })
    }

    pub fn config(&self) -> &ColumnConfig {
        &self.config
    }

    pub fn check_path(&self, path: &Path, metadata: &MetadataContext) -> Result<CheckedTable> {
        let span = info_span!("sanity_check", file = %path.display());
        let _guard = span.enter();
        self.check_reader(File::open(path)?, metadata)
    }

    /// Reads CSV data from `reader` and normalizes every record.
    ///
    /// Calculated columns missing from the header are appended; converted
    /// columns must already exist.
    pub fn check_reader<R: Read>(&self, reader: R, metadata: &MetadataContext) -> Result<CheckedTable> {
        let mut csv = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut headers: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();
        let source_width = headers.len();

        let mut indices = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let found = headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(&column.name));
            let index = match (found, &column.action) {
                (Some(index), _) => index,
                (None, ColumnAction::Calculate(_)) => {
                    headers.push(column.name.clone());
                    headers.len() - 1
                }
                (None, ColumnAction::Convert { .. }) => {
                    return Err(SanityError::MissingColumn(column.name.clone()));
                }
            };
            indices.push(index);
        }

        let mut table = CheckedTable {
            headers,
            ..CheckedTable::default()
        };
        for (row_index, record) in csv.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map_or(row_index + 2, |position| position.line() as usize);
            let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
            if fields.len() > source_width {
                let extra = fields.split_off(source_width);
                let cells = extra.join(",");
                let error = SanityError::ExtraFields {
                    line,
                    count: extra.len(),
                    cells: cells.clone(),
                };
                if self.config.invalid_values == InvalidValuePolicy::Fail {
                    return Err(error);
                }
                warn!(line, count = extra.len(), "record wider than header");
                table.issues.push(CheckIssue {
                    line,
                    column: String::new(),
                    value: cells,
                    message: error.to_string(),
                });
            }
            fields.resize(source_width, String::new());
            fields.resize(table.headers.len(), String::new());

            for (column, &index) in self.columns.iter().zip(&indices) {
                let (raw, outcome) = match &column.action {
                    ColumnAction::Convert { converter, unit } => {
                        let raw = fields[index].clone();
                        if self.config.is_missing(&raw) {
                            fields[index].clear();
                            continue;
                        }
                        let outcome = converter.convert(&raw, unit);
                        (raw, outcome)
                    }
                    ColumnAction::Calculate(calculator) => {
                        let data = DataRecord::new(line, &table.headers, &fields);
                        let outcome =
                            calculator.calculate_data_value(metadata, &data, index, &column.name);
                        (String::new(), outcome)
                    }
                };
                match outcome {
                    Ok(value) => fields[index] = value,
                    Err(error) if self.config.invalid_values == InvalidValuePolicy::Fail => {
                        return Err(error);
                    }
                    Err(error) => {
                        warn!(line, column = %column.name, %error, "invalid value");
                        fields[index].clear();
                        table.issues.push(CheckIssue {
                            line,
                            column: column.name.clone(),
                            value: raw,
                            message: error.to_string(),
                        });
                    }
                }
            }
            table.rows.push(fields);
        }

        info!(
            rows = table.rows.len(),
            issues = table.issues.len(),
            "sanity check complete"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::default_registry;

    fn checker(json: &str) -> SanityChecker<'static> {
        SanityChecker::from_config(ColumnConfig::from_json(json).unwrap(), default_registry())
            .unwrap()
    }

    #[test]
    fn unknown_unit_fails_before_reading() {
        let config =
            ColumnConfig::from_json(r#"{"columns": [{"name": "SST", "unit": "degf"}]}"#).unwrap();
        assert!(matches!(
            SanityChecker::from_config(config, default_registry()),
            Err(SanityError::UnsupportedUnit(_))
        ));
    }

    #[test]
    fn converts_and_blanks_missing_values() {
        let checker = checker(r#"{"columns": [{"name": "sst", "unit": "kelvin"}]}"#);
        let data = "SST,Sal\n0.0,35\nNaN,35\n-999,34\n";
        let table = checker.check_reader(data.as_bytes(), &MetadataContext::new()).unwrap();
        assert_eq!(table.rows[0], ["273.15", "35"]);
        assert_eq!(table.rows[1], ["", "35"]);
        assert_eq!(table.rows[2], ["", "34"]);
        assert!(!table.has_issues());
    }

    #[test]
    fn reports_unparsable_cells() {
        let checker = checker(r#"{"columns": [{"name": "SST", "unit": "kelvin"}]}"#);
        let data = "SST\nwarm\n1.0\n";
        let table = checker.check_reader(data.as_bytes(), &MetadataContext::new()).unwrap();
        assert_eq!(table.rows[0], [""]);
        assert_eq!(table.rows[1], ["274.15"]);
        assert_eq!(table.issues.len(), 1);
        assert_eq!(table.issues[0].line, 2);
        assert_eq!(table.issues[0].value, "warm");
    }

    #[test]
    fn fail_policy_stops_at_first_problem() {
        let checker = checker(
            r#"{"invalid_values": "fail", "columns": [{"name": "SST", "unit": "kelvin"}]}"#,
        );
        let err = checker
            .check_reader("SST\nwarm\n".as_bytes(), &MetadataContext::new())
            .unwrap_err();
        assert!(matches!(err, SanityError::Conversion { .. }));
    }

    #[test]
    fn missing_converted_column_is_an_error() {
        let checker = checker(r#"{"columns": [{"name": "Pressure", "unit": "kpa"}]}"#);
        let err = checker
            .check_reader("SST\n1\n".as_bytes(), &MetadataContext::new())
            .unwrap_err();
        assert!(matches!(err, SanityError::MissingColumn(name) if name == "Pressure"));
    }

    #[test]
    fn calculated_columns_are_appended() {
        let checker = checker(
            r#"{"columns": [{"name": "expocode", "calculator": {"kind": "metadata", "key": "Cruise_ID"}}]}"#,
        );
        let metadata = MetadataContext::from_pairs([("Cruise_ID", "33RO20120101")]);
        let table = checker.check_reader("SST\n1\n2\n".as_bytes(), &metadata).unwrap();
        assert_eq!(table.headers, ["SST", "expocode"]);
        assert_eq!(table.rows[1], ["2", "33RO20120101"]);
    }

    #[test]
    fn surplus_cells_are_reported() {
        let checker = checker(r#"{"columns": [{"name": "SST", "unit": "kelvin"}]}"#);
        let table = checker
            .check_reader("SST,Sal\n0.0,35,EXTRA\n1.0,34\n".as_bytes(), &MetadataContext::new())
            .unwrap();
        assert_eq!(table.rows[0], ["273.15", "35"]);
        assert_eq!(table.issues.len(), 1);
        assert_eq!(table.issues[0].line, 2);
        assert_eq!(table.issues[0].column, "");
        assert_eq!(table.issues[0].value, "EXTRA");
        assert!(table.issues[0].message.contains("1 cell(s)"));
    }

    #[test]
    fn surplus_cells_do_not_shift_calculated_columns() {
        let checker = checker(
            r#"{"columns": [{"name": "flag", "calculator": {"kind": "fixed", "value": "2"}}]}"#,
        );
        let table = checker
            .check_reader("SST,Sal\n1,35,EXTRA\n".as_bytes(), &MetadataContext::new())
            .unwrap();
        assert_eq!(table.headers, ["SST", "Sal", "flag"]);
        assert_eq!(table.rows[0], ["1", "35", "2"]);
        assert_eq!(table.issues.len(), 1);
        assert_eq!(table.issues[0].value, "EXTRA");
    }

    #[test]
    fn surplus_cells_fail_under_fail_policy() {
        let checker = checker(
            r#"{"invalid_values": "fail", "columns": [{"name": "SST", "unit": "kelvin"}]}"#,
        );
        let err = checker
            .check_reader("SST\n1.0,2.0,3.0\n".as_bytes(), &MetadataContext::new())
            .unwrap_err();
        assert!(matches!(err, SanityError::ExtraFields { line: 2, count: 2, .. }));
    }

    #[test]
    fn written_csv_keeps_headers() {
        let table = CheckedTable {
            headers: vec!["SST".to_string()],
            rows: vec![vec!["273.15".to_string()]],
            issues: Vec::new(),
        };
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "SST\n273.15\n");
    }
}
