use crate::fields::{build_selector, parse_for_view, Preset};
use crate::prelude::{eprintln, *};
use serde::Deserialize;
use trackertools_core::fields::{add_field, remove_field};

use super::{parse_arguments, text_result, JsonRpcError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Operation {
    Build,
    Add,
    Remove,
    Parse,
}

#[derive(Debug, Deserialize)]
struct FieldsEditArgs {
    operation: Operation,
    #[serde(default)]
    selector: Option<String>,
    #[serde(default)]
    preset: Option<Preset>,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    field: Option<String>,
}

fn required<'a>(
    value: &'a Option<String>,
    name: &str,
    operation: &str,
) -> Result<&'a str, JsonRpcError> {
    value.as_deref().ok_or_else(|| {
        JsonRpcError::new(
            JsonRpcError::INVALID_PARAMS,
            format!("'{name}' is required for '{operation}'"),
        )
        .with_data(serde_json::json!({ "argument": name }))
    })
}

pub fn handle_fields_edit(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let args: FieldsEditArgs = parse_arguments(arguments)?;

    if global.verbose {
        eprintln!("Calling fields_edit: operation={:?}", args.operation);
    }

    let selector = args.selector.as_deref().unwrap_or_default();

    let text = match args.operation {
        Operation::Build => build_selector(args.preset, args.selector.as_deref(), &args.fields, &[]),
        Operation::Add => {
            let path = required(&args.path, "path", "add")?;
            let field = required(&args.field, "field", "add")?;
            add_field(selector, path, field)
        }
        Operation::Remove => {
            let path = required(&args.path, "path", "remove")?;
            remove_field(selector, path)
        }
        Operation::Parse => {
            let forest = parse_for_view(selector)
                .map_err(|e| JsonRpcError::new(JsonRpcError::INVALID_PARAMS, e.to_string()))?;
            serde_json::to_string_pretty(&forest).map_err(|e| {
                JsonRpcError::new(
                    JsonRpcError::INTERNAL_ERROR,
                    format!("Serialization error: {e}"),
                )
            })?
        }
    };

    text_result(text)
}
