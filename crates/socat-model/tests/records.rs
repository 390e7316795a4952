//! Snapshot tests for serialized records.

use socat_model::{CompositeVariable, ElementPath};

fn station_with_conflict() -> CompositeVariable {
    let path = ElementPath::root("x_tags").child("Station");
    let mut variable = CompositeVariable::new(path, ["Station"]);
    variable.add_value("Station", Some("1")).unwrap();
    variable.add_value("Depth", Some("10")).unwrap();
    variable.add_value("Depth", Some("20")).unwrap();
    variable.add_value("Salinity", Some("35")).unwrap();
    variable
}

#[test]
fn record_snapshot() {
    let xml = station_with_conflict().to_record().to_xml_string().unwrap();
    insta::assert_snapshot!(xml, @r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <Station>
      <Station>1</Station>
      <Depth>%%CONFLICT%%</Depth>
      <Salinity>35</Salinity>
    </Station>
    "#);
}

#[test]
fn conflict_record_snapshot() {
    let record = station_with_conflict().to_conflict_record().unwrap();
    let xml = record.to_xml_string().unwrap();
    insta::assert_snapshot!(xml, @r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <Conflict path="x_tags/Station">
      <Station Station="1">
        <Depth>
          <Value>10</Value>
          <Value>20</Value>
        </Depth>
      </Station>
    </Conflict>
    "#);
}
