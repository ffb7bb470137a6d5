//! JSON serializer for call plans.

use super::plan::Plan;
use crate::error::{MidoriError, Result};

/// Render a plan as pretty-printed JSON with a trailing newline.
pub fn render(plan: &Plan) -> Result<String> {
    let mut text = serde_json::to_string_pretty(plan)
        .map_err(|e| MidoriError::projection(format!("JSON serialization failed: {}", e)))?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::plan::{Call, Literal};

    #[test]
    fn test_calls_are_tagged_by_op() {
        let plan = Plan {
            calls: vec![
                Call::AddRemoteController {
                    name: "c1".into(),
                    host: "127.0.0.1".into(),
                    port: 6653,
                },
                Call::Start,
            ],
        };
        let value: serde_json::Value = serde_json::from_str(&render(&plan).unwrap()).unwrap();
        assert_eq!(value["calls"][0]["op"], "add_remote_controller");
        assert_eq!(value["calls"][0]["host"], "127.0.0.1");
        assert_eq!(value["calls"][0]["port"], 6653);
        assert_eq!(value["calls"][1], serde_json::json!({ "op": "start" }));
    }

    #[test]
    fn test_maps_keep_declaration_order() {
        let plan = Plan {
            calls: vec![Call::AddContainer {
                name: "h".into(),
                ip: "10.0.0.1".into(),
                image: "i".into(),
                mac: "00:00:00:00:00:01".into(),
                env: vec![
                    ("ZETA".into(), Literal::Int(1)),
                    ("ALPHA".into(), Literal::Str("a".into())),
                ],
                ports: vec![],
                port_bindings: vec![(9000, 90), (80, 8080)],
                cmd: vec![],
            }],
        };
        let text = render(&plan).unwrap();
        let zeta = text.find("\"ZETA\"").unwrap();
        let alpha = text.find("\"ALPHA\"").unwrap();
        assert!(zeta < alpha);
        let first = text.find("\"9000\"").unwrap();
        let second = text.find("\"80\"").unwrap();
        assert!(first < second);
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_absent_link_options_are_omitted() {
        let plan = Plan {
            calls: vec![Call::AddLink {
                name: "l".into(),
                src: "a".into(),
                dst: "b".into(),
                port1: None,
                port2: None,
                cls: None,
                delay: Some("5ms".into()),
                bw: None,
            }],
        };
        let value: serde_json::Value = serde_json::from_str(&render(&plan).unwrap()).unwrap();
        let link = value["calls"][0].as_object().unwrap();
        assert!(!link.contains_key("cls"));
        assert!(!link.contains_key("bw"));
        assert_eq!(link["delay"], "5ms");
    }
}
