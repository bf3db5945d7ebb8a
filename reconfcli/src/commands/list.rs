/// Printing the available criteria.
use super::*;

use serde::Serialize;

#[derive(Serialize)]
struct CriterionInfo {
    name: &'static str,
    code: u8,
    extremum: Extremum,
}

pub fn list_criteria() {
    let result: Vec<CriterionInfo> = Criterion::ALL
        .into_iter()
        .map(|c| CriterionInfo {
            name: c.name(),
            code: c.code(),
            extremum: c.extremum(),
        })
        .collect();
    let serialized = match serde_json::to_string_pretty(&result) {
        Ok(s) => s,
        Err(e) => fatal_error!(1, "Error while serializing results: {}", e),
    };
    println!("{}", serialized);
}
