mod common;

use std::collections::HashMap;

use email_dispatch::error::DispatchError;
use email_dispatch::models::record::{RecipientRecord, RecordSet};
use email_dispatch::render::{render_positional, render_template};

fn record_with(columns: &[(&str, &str)]) -> RecipientRecord {
    let mut row: HashMap<String, String> = common::row("a@x.com", "", "1");
    for (key, value) in columns {
        row.insert(key.to_string(), value.to_string());
    }
    RecordSet::from_rows(vec![row])
        .unwrap()
        .into_records()
        .remove(0)
}

/// Test: Without a variable-column list the template is used verbatim
#[test]
fn test_template_verbatim_without_variables() {
    let record = record_with(&[]);

    let rendered = render_template("<p>Hello {}</p>", None, &record).unwrap();

    assert_eq!(rendered, "<p>Hello {}</p>");
}

/// Test: Markers are filled positionally from the configured columns
#[test]
fn test_positional_substitution() {
    let record = record_with(&[("first_name", "Ada"), ("order_id", "42")]);
    let columns = vec!["first_name".to_string(), "order_id".to_string()];

    let rendered =
        render_template("Hi {}, your order {} shipped", Some(&columns), &record).unwrap();

    assert_eq!(rendered, "Hi Ada, your order 42 shipped");
}

/// Test: Any column of the record can feed the template, including contract columns
#[test]
fn test_contract_columns_usable_as_variables() {
    let record = record_with(&[]);
    let columns = vec!["unique_id".to_string()];

    let rendered = render_template("ref {}", Some(&columns), &record).unwrap();

    assert_eq!(rendered, "ref 1");
}

/// Test: Marker/variable count mismatch is a render error
#[test]
fn test_marker_count_mismatch_is_render_error() {
    let record = record_with(&[("first_name", "Ada")]);
    let columns = vec!["first_name".to_string()];

    let err = render_template("Hi {} {}", Some(&columns), &record).unwrap_err();
    assert!(matches!(err, DispatchError::Render(_)));

    let err = render_template("Hi", Some(&columns), &record).unwrap_err();
    assert!(matches!(err, DispatchError::Render(_)));
}

/// Test: A configured column missing from the record is a render error
#[test]
fn test_missing_column_is_render_error() {
    let record = record_with(&[]);
    let columns = vec!["first_name".to_string()];

    let err = render_template("Hi {}", Some(&columns), &record).unwrap_err();
    assert!(matches!(err, DispatchError::Render(_)));
    assert!(err.to_string().contains("first_name"));
}

/// Test: Substituted values containing markers are not re-expanded
#[test]
fn test_values_with_markers_are_not_reexpanded() {
    let rendered = render_positional("a {} b {}", &["{}", "x"]).unwrap();

    assert_eq!(rendered, "a {} b x");
}
