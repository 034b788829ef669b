//! Declaration emission for `declare` output mode.

use plansql_plan::ParameterMap;

/// One `DECLARE <name> AS <type> = <value>` line per parameter, in
/// map (document) order. Types and values are emitted verbatim as
/// captured; any quoting policy is the caller's concern.
pub fn declarations(params: &ParameterMap) -> Vec<String> {
    params
        .iter()
        .map(|(name, param)| {
            format!(
                "DECLARE {name} AS {} = {}",
                param.data_type, param.compiled_value
            )
        })
        .collect()
}
