//! Integration tests that parse realistic schema files end to end.

use baml_define::{STRING_TYPE, TypeExpr, parse};

const RESUME_SCHEMA: &str = r##"
// Resume extraction
class Resume {
  name string
  email string @description("Primary contact address")
  kind "resume" @description("Discriminator")
  experience Experience[]
  seniority Seniority?
}

class Experience {
  company string
  years float
  current bool
}

enum Seniority {
  "junior",
  "mid",
  Senior
}

function ExtractResume(resume_text: string, hints: string[]) -> Resume {
  client "openai/gpt-4o"
  prompt #"
    Extract from: {{ resume_text }}
  "#
}

function Triage(resume: Resume) -> "accept" | "reject" {
  client "anthropic/claude"
}
"##;

#[test]
fn parses_every_declaration_kind() {
    let doc = parse(RESUME_SCHEMA, "schemas/resume.baml");

    assert_eq!(doc.path, "schemas/resume.baml");
    assert_eq!(doc.classes.len(), 2);
    assert_eq!(doc.enums.len(), 1);
    assert_eq!(doc.functions.len(), 2);
    assert_eq!(doc.declaration_count(), 5);
}

#[test]
fn property_count_matches_property_lines() {
    let doc = parse(RESUME_SCHEMA, "resume.baml");
    let resume = &doc.classes[0];

    assert_eq!(resume.name, "Resume");
    assert_eq!(resume.properties.len(), 5);

    for property in &resume.properties {
        if property.is_literal() {
            assert_eq!(property.type_name, STRING_TYPE);
        }
    }

    let kind = resume
        .properties
        .iter()
        .find(|p| p.name == "kind")
        .expect("kind property");
    assert_eq!(kind.literal.as_deref(), Some("resume"));
    assert_eq!(kind.description.as_deref(), Some("Discriminator"));
}

#[test]
fn property_types_parse_as_expressions() {
    let doc = parse(RESUME_SCHEMA, "resume.baml");
    let resume = &doc.classes[0];

    let experience = TypeExpr::parse(&resume.properties[3].type_name);
    assert_eq!(
        experience,
        TypeExpr::List(Box::new(TypeExpr::Named("Experience".to_string())))
    );

    let seniority = TypeExpr::parse(&resume.properties[4].type_name);
    assert!(seniority.refers_directly_to("Seniority"));
}

#[test]
fn enum_values_are_unquoted_in_order() {
    let doc = parse(RESUME_SCHEMA, "resume.baml");
    assert_eq!(doc.enums[0].values, vec!["junior", "mid", "Senior"]);
}

#[test]
fn functions_capture_client_parameters_and_return_type() {
    let doc = parse(RESUME_SCHEMA, "resume.baml");

    let extract = &doc.functions[0];
    assert_eq!(extract.name, "ExtractResume");
    assert_eq!(extract.client.as_deref(), Some("openai/gpt-4o"));
    assert_eq!(extract.return_type, "Resume");
    let params: Vec<_> = extract
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.type_expr.as_str()))
        .collect();
    assert_eq!(params, vec![("resume_text", "string"), ("hints", "string[]")]);

    let triage = &doc.functions[1];
    assert_eq!(triage.return_type, r#""accept" | "reject""#);
    assert_eq!(triage.client.as_deref(), Some("anthropic/claude"));
}

#[test]
fn parsed_document_dumps_as_json() {
    let doc = parse(RESUME_SCHEMA, "resume.baml");
    let json = serde_json::to_string_pretty(&doc).expect("serializable");
    assert!(json.contains("\"ExtractResume\""));
    assert!(json.contains("\"openai/gpt-4o\""));
}
