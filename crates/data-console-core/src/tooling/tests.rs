// crates/data-console-core/src/tooling/tests.rs
// ============================================================================
// Module: Tooling Identifier Tests
// Description: Name stability and catalogue ordering tests.
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use super::ToolName;
use super::tool_definitions;

#[test]
fn parse_round_trips_all_names() {
    for tool in ToolName::all() {
        assert_eq!(ToolName::parse(tool.as_str()), Some(*tool));
    }
}

#[test]
fn parse_rejects_unknown_names() {
    assert_eq!(ToolName::parse("drop_tables"), None);
    assert_eq!(ToolName::parse(""), None);
}

#[test]
fn definitions_cover_every_tool_in_order() {
    let definitions = tool_definitions();
    let listed: Vec<ToolName> = definitions.iter().map(|definition| definition.name).collect();
    assert_eq!(listed, ToolName::all().to_vec());
}

#[test]
fn only_insert_is_mutating() {
    for definition in tool_definitions() {
        let mutating = definition.name == ToolName::InsertDatabaseRecord;
        assert_eq!(definition.annotations.read_only, !mutating, "{}", definition.name);
        assert_eq!(definition.annotations.idempotent, !mutating, "{}", definition.name);
    }
}

#[test]
fn input_schemas_forbid_extra_properties() {
    for definition in tool_definitions() {
        assert_eq!(
            definition.input_schema.get("additionalProperties"),
            Some(&serde_json::Value::Bool(false)),
            "{}",
            definition.name
        );
    }
}
