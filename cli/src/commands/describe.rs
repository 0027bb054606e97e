use anyhow::Result;
use gocd_defs::{field_specifications, well_known_variables, STEP_CAPABILITIES, STEP_INFO};
use serde_json::json;

pub fn handle_describe() -> Result<bool> {
    let description = json!({
        "step": STEP_INFO,
        "fields": field_specifications(),
        "capabilities": STEP_CAPABILITIES,
        "variables": well_known_variables(),
    });
    println!("{}", serde_json::to_string_pretty(&description)?);
    Ok(true)
}
