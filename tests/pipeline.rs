//! End-to-end tests for the compile pipeline.

use std::sync::Arc;
use std::thread;

use midori_core::codegen::{Call, Literal};
use midori_core::{Compiler, CompilerConfig, MidoriError, Output, OutputFormat};

const TWO_HOSTS: &str = r#"
host d1 image "ubuntu:trusty"
host d2 image "ubuntu:trusty"
switch s1 s2
link l1 src d1 dst s1
link l2 src s1 dst s2 cls TCLink delay "100ms" bw 1
link l3 src s2 dst d2
up
ping d1 d2
down
"#;

fn json_compiler() -> Compiler {
    Compiler::new(CompilerConfig {
        format: OutputFormat::Json,
        ..CompilerConfig::default()
    })
}

#[test]
fn hosts_without_addresses_get_sequential_defaults() {
    let plan = Compiler::default().plan(TWO_HOSTS).unwrap();
    let containers: Vec<_> = plan
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::AddContainer { name, ip, mac, .. } => Some((name.as_str(), ip.as_str(), mac.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        containers,
        vec![
            ("d1", "10.0.0.1", "00:00:00:00:00:01"),
            ("d2", "10.0.0.2", "00:00:00:00:00:02"),
        ]
    );
}

#[test]
fn calls_follow_statement_order() {
    let plan = Compiler::default().plan(TWO_HOSTS).unwrap();
    let ops: Vec<_> = plan.calls.iter().map(Call::op).collect();
    assert_eq!(
        ops,
        vec![
            "add_container",
            "add_container",
            "add_switch",
            "add_switch",
            "add_link",
            "add_link",
            "add_link",
            "start",
            "ping",
            "stop",
        ]
    );
}

#[test]
fn link_options_reach_the_output() {
    let python = Compiler::default().compile(TWO_HOSTS).unwrap();
    assert!(python.contains("from mininet.link import TCLink\n"));
    assert!(python.contains(
        "context.add_link(name=\"l2\", src=nodes[\"s1\"], dst=nodes[\"s2\"], cls=TCLink, delay=\"100ms\", bw=1)"
    ));
    assert!(python.contains("context.add_link(name=\"l1\", src=nodes[\"d1\"], dst=nodes[\"s1\"])\n"));
}

#[test]
fn remote_controller_is_projected() {
    let source = "remote_controller c1 host \"127.0.0.1\" port 6653";
    let plan = Compiler::default().plan(source).unwrap();
    assert_eq!(
        plan.calls,
        vec![Call::AddRemoteController {
            name: "c1".into(),
            host: "127.0.0.1".into(),
            port: 6653,
        }]
    );
}

#[test]
fn explicit_addresses_are_kept_and_do_not_consume_defaults() {
    let source = r#"
host a image "x" ip "192.168.0.9" mac "aa:bb:cc:dd:ee:ff"
host b image "x"
"#;
    let plan = Compiler::default().plan(source).unwrap();
    match (&plan.calls[0], &plan.calls[1]) {
        (
            Call::AddContainer { ip: ip_a, mac: mac_a, .. },
            Call::AddContainer { ip: ip_b, mac: mac_b, .. },
        ) => {
            assert_eq!(ip_a, "192.168.0.9");
            assert_eq!(mac_a, "aa:bb:cc:dd:ee:ff");
            assert_eq!(ip_b, "10.0.0.1");
            assert_eq!(mac_b, "00:00:00:00:00:01");
        }
        other => panic!("unexpected calls: {:?}", other),
    }
}

#[test]
fn host_collections_keep_declaration_order() {
    let source = r#"host web image "nginx" env {"Z": 1, "A": "two"} ports [443, 80] cmd ["nginx", "-g"]"#;
    let plan = Compiler::default().plan(source).unwrap();
    match &plan.calls[0] {
        Call::AddContainer { env, ports, cmd, port_bindings, .. } => {
            assert_eq!(
                env,
                &vec![
                    ("Z".to_string(), Literal::Int(1)),
                    ("A".to_string(), Literal::Str("two".into())),
                ]
            );
            assert_eq!(ports, &vec![Literal::Int(443), Literal::Int(80)]);
            assert_eq!(cmd, &vec![Literal::Str("nginx".into()), Literal::Str("-g".into())]);
            assert!(port_bindings.is_empty());
        }
        other => panic!("unexpected call: {:?}", other),
    }
}

#[test]
fn multi_hop_intent_expands_pairwise() {
    let source = r#"
host a image "x"
host b image "x"
switch s1
intent a -> s1 -> b
"#;
    let plan = Compiler::default().plan(source).unwrap();
    let intents: Vec<_> = plan
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::AddIntent { src, dst } => Some((src.as_str(), dst.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(intents, vec![("a", "s1"), ("s1", "b")]);
}

#[test]
fn missing_image_is_a_syntax_error_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("net.py");

    let err = Compiler::default()
        .compile_to_path("host d1 ip \"10.0.0.5\"\nswitch s1", &target)
        .unwrap_err();

    assert!(err.is_syntax_error());
    assert!(matches!(err, MidoriError::ParseError { .. }));
    assert!(!target.exists());
}

#[test]
fn lexer_errors_are_reported_with_position() {
    let err = Compiler::default()
        .compile("switch s1\nhost d1 image \"unterminated")
        .unwrap_err();
    assert!(matches!(err, MidoriError::LexerError { .. }));
    assert_eq!(err.position().map(|(line, _)| line), Some(2));
}

#[test]
fn empty_program_is_rejected() {
    let err = Compiler::default().compile("# nothing here\n").unwrap_err();
    assert!(err.is_syntax_error());
}

#[test]
fn string_and_file_output_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.py");
    let compiler = Compiler::default();

    let text = compiler.compile(TWO_HOSTS).unwrap();
    compiler.compile_to_path(TWO_HOSTS, &target).unwrap();

    assert_eq!(std::fs::read(&target).unwrap(), text.into_bytes());
}

#[test]
fn compile_file_honors_output_choice() {
    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("net.midori");
    std::fs::write(&source_path, TWO_HOSTS).unwrap();
    let compiler = Compiler::default();

    let printed = compiler.compile_file(&source_path, &Output::Stdout).unwrap();
    assert!(printed.is_some());
    assert!(!dir.path().join("net.py").exists());

    let explicit = dir.path().join("custom.py");
    let none = compiler
        .compile_file(&source_path, &Output::Path(explicit.clone()))
        .unwrap();
    assert!(none.is_none());
    assert_eq!(std::fs::read_to_string(&explicit).unwrap(), printed.unwrap());
}

#[test]
fn missing_source_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = Compiler::default()
        .compile_file(&dir.path().join("absent.midori"), &Output::Stdout)
        .unwrap_err();
    assert!(matches!(err, MidoriError::FileReadError { .. }));
}

#[test]
fn every_compile_starts_fresh_generators() {
    let compiler = Compiler::default();
    let first = compiler.compile(TWO_HOSTS).unwrap();
    let second = compiler.compile(TWO_HOSTS).unwrap();
    assert_eq!(first, second);
    assert!(second.contains("mac=\"00:00:00:00:00:01\""));
}

#[test]
fn concurrent_compiles_are_independent() {
    let compiler = Arc::new(Compiler::default());
    let expected = compiler.compile(TWO_HOSTS).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let compiler = Arc::clone(&compiler);
            thread::spawn(move || compiler.compile(TWO_HOSTS).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn json_output_lists_tagged_calls() {
    let text = json_compiler().compile(TWO_HOSTS).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let calls = value["calls"].as_array().unwrap();

    assert_eq!(calls.len(), 10);
    assert_eq!(calls[0]["op"], "add_container");
    assert_eq!(calls[0]["mac"], "00:00:00:00:00:01");
    assert_eq!(calls[5]["cls"], "TCLink");
    assert!(calls[4].get("cls").is_none());
    assert_eq!(calls[8]["hosts"], serde_json::json!(["d1", "d2"]));
}

#[test]
fn custom_pool_from_yaml_config() {
    let config = CompilerConfig::from_yaml("ip_pool: 172.16.0.0/30\n").unwrap();
    let compiler = Compiler::new(config);
    let source = "host a image \"x\"\nhost b image \"x\"\nhost c image \"x\"\nhost d image \"x\"";

    let err = compiler.compile(source).unwrap_err();
    assert!(matches!(err, MidoriError::AddressPoolExhausted { .. }));

    let ok = compiler.plan("host a image \"x\"\nhost b image \"x\"\nhost c image \"x\"").unwrap();
    match &ok.calls[2] {
        Call::AddContainer { ip, .. } => assert_eq!(ip, "172.16.0.3"),
        other => panic!("unexpected call: {:?}", other),
    }
}

#[test]
fn link_class_clashing_with_generated_names_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("net.py");

    for cls in ["nodes", "context"] {
        let source = format!("switch a b\nlink l src a dst b cls {}", cls);
        let err = Compiler::default().compile_to_path(&source, &target).unwrap_err();
        assert!(matches!(err, MidoriError::Projection { .. }));
        assert!(!target.exists());
    }
}
