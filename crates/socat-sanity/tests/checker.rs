//! Tests for the sanity checker pipeline.

use std::fs;

use socat_model::OmeMetadata;
use socat_sanity::units::TemperatureConverter;
use socat_sanity::{
    ColumnConfig, MetadataContext, SanityChecker, SanityError, UnitConverter,
    UnitConverterRegistry, default_registry,
};

const METADATA: &str = r#"
<x_tags>
  <Cruise_Info>
    <Experiment><Cruise><Cruise_ID>33RO20120101</Cruise_ID></Cruise></Experiment>
    <Vessel><Vessel_Name>Ronald H. Brown</Vessel_Name></Vessel>
  </Cruise_Info>
</x_tags>"#;

const COLUMNS: &str = r#"{
  "columns": [
    {"name": "SST", "unit": "kelvin"},
    {"name": "Pressure", "unit": "kPa"},
    {"name": "expocode", "calculator": {"kind": "metadata", "key": "Cruise_ID"}},
    {"name": "date_time", "calculator": {"kind": "timestamp",
        "year": "yr", "month": "mon", "day": "day", "hour": "hh", "minute": "mm", "second": "ss"}}
  ]
}"#;

#[test]
fn temperature_conversion_matches_checker_output() {
    // Kelvin readings gain the offset rather than losing it.
    assert_eq!(TemperatureConverter.convert("0.0", "kelvin").unwrap(), "273.15");
    assert_eq!(TemperatureConverter.convert("25.0", "degc").unwrap(), "25.0");
}

#[test]
fn normalizes_a_cruise_file() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("cruise.csv");
    fs::write(
        &data_path,
        "yr,mon,day,hh,mm,ss,SST,Pressure\n\
         2012,1,5,13,7,30,0.0,101\n\
         2012,1,5,13,8,,NaN,abc\n\
         2012,2,31,0,0,0,1.0,100\n",
    )
    .unwrap();

    let metadata = MetadataContext::from_metadata(&OmeMetadata::parse_xml(METADATA).unwrap());
    let config = ColumnConfig::from_json(COLUMNS).unwrap();
    let checker = SanityChecker::from_config(config, default_registry()).unwrap();
    let table = checker.check_path(&data_path, &metadata).unwrap();

    assert_eq!(
        table.headers,
        ["yr", "mon", "day", "hh", "mm", "ss", "SST", "Pressure", "expocode", "date_time"]
    );
    assert_eq!(
        table.rows[0][6..],
        ["273.15", "1010.0", "33RO20120101", "2012-01-05T13:07:30Z"]
    );
    assert_eq!(table.rows[1][6..], ["", "", "33RO20120101", "2012-01-05T13:08:00Z"]);
    assert_eq!(table.rows[2][9], "");

    let flagged: Vec<(usize, &str)> = table
        .issues
        .iter()
        .map(|issue| (issue.line, issue.column.as_str()))
        .collect();
    assert_eq!(flagged, [(3, "Pressure"), (4, "date_time")]);

    let out_path = dir.path().join("normalized.csv");
    table.write_csv(fs::File::create(&out_path).unwrap()).unwrap();
    let written = fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with("yr,mon,day,hh,mm,ss,SST,Pressure,expocode,date_time\n"));
}

#[test]
fn conflicted_metadata_cannot_fill_columns() {
    let older = OmeMetadata::parse_xml(METADATA).unwrap();
    let newer = OmeMetadata::parse_xml(
        "<x_tags><Cruise_Info><Experiment><Cruise><Cruise_ID>33RO20120102</Cruise_ID>\
         </Cruise></Experiment></Cruise_Info></x_tags>",
    )
    .unwrap();
    let merged = older.merge(&newer).unwrap();
    let metadata = MetadataContext::from_metadata(&merged);

    let config = ColumnConfig::from_json(
        r#"{"invalid_values": "fail",
            "columns": [{"name": "expocode", "calculator": {"kind": "metadata", "key": "Cruise_ID"}}]}"#,
    )
    .unwrap();
    let checker = SanityChecker::from_config(config, default_registry()).unwrap();
    let err = checker
        .check_reader("SST\n1\n".as_bytes(), &metadata)
        .unwrap_err();
    assert!(matches!(err, SanityError::Data { .. }));
}

#[test]
fn custom_registry_limits_units() {
    let mut registry = UnitConverterRegistry::new();
    registry.register(Box::new(TemperatureConverter));
    let config =
        ColumnConfig::from_json(r#"{"columns": [{"name": "Pressure", "unit": "kpa"}]}"#).unwrap();
    assert!(SanityChecker::from_config(config, &registry).is_err());
}
