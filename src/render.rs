use tracing::debug;

use crate::error::DispatchError;
use crate::models::record::RecipientRecord;

/// Fills the template's positional `{}` markers from the record's values
/// for the configured columns, in order. With no column list the template
/// is used verbatim, markers included.
pub fn render_template(
    template: &str,
    variable_columns: Option<&[String]>,
    record: &RecipientRecord,
) -> Result<String, DispatchError> {
    let Some(columns) = variable_columns else {
        return Ok(template.to_string());
    };

    let mut values = Vec::with_capacity(columns.len());
    for column in columns {
        let value = record.variables.get(column).ok_or_else(|| {
            DispatchError::Render(format!(
                "record `{}` has no column `{}`",
                record.unique_id, column
            ))
        })?;
        values.push(value.as_str());
    }

    debug!(unique_id = %record.unique_id, columns = ?columns, values = ?values, "Rendering template");

    render_positional(template, &values)
}

/// Substitutes `values` into the template's `{}` markers in order. A count
/// mismatch in either direction is a render error.
pub fn render_positional(template: &str, values: &[&str]) -> Result<String, DispatchError> {
    let marker_count = template.matches("{}").count();
    if marker_count != values.len() {
        return Err(DispatchError::Render(format!(
            "template has {} positional markers but {} variables are configured",
            marker_count,
            values.len()
        )));
    }

    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    for value in values {
        let Some((head, tail)) = rest.split_once("{}") else {
            return Err(DispatchError::Render(
                "positional marker count changed during substitution".to_string(),
            ));
        };
        rendered.push_str(head);
        rendered.push_str(value);
        rest = tail;
    }

    rendered.push_str(rest);
    Ok(rendered)
}
