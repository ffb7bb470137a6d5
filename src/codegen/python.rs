//! Python serializer for call plans.
//!
//! The generated module defines `run_network(context)`, which the external
//! runtime imports and calls with its execution context. Nodes returned by
//! `add_container` and `add_switch` are kept in a `nodes` dict keyed by
//! name, so arbitrary DSL names never collide with Python identifiers.

use super::plan::{Call, Literal, Plan};
use crate::error::{MidoriError, Result};

/// Module that link classes named by `cls` are imported from.
pub const LINK_CLASS_MODULE: &str = "mininet.link";

const HEADER: &str = "# Generated by midori. Do not edit.\n";
const INDENT: &str = "    ";

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Names the generated module binds itself. A link class imported under
/// one of these would be shadowed at the call site.
const GENERATED_NAMES: &[&str] = &["context", "nodes", "run_network"];

/// Render a plan as a Python module.
pub fn render(plan: &Plan) -> Result<String> {
    let mut out = String::from(HEADER);

    for cls in plan.link_classes() {
        if PYTHON_KEYWORDS.contains(&cls) {
            return Err(MidoriError::projection(format!(
                "link class '{}' is a Python keyword and cannot be imported",
                cls
            )));
        }
        if GENERATED_NAMES.contains(&cls) {
            return Err(MidoriError::projection(format!(
                "link class '{}' clashes with a name defined by the generated module",
                cls
            )));
        }
        out.push_str(&format!("from {} import {}\n", LINK_CLASS_MODULE, cls));
    }

    out.push_str("\n\ndef run_network(context):\n");
    out.push_str(INDENT);
    out.push_str("nodes = {}\n");

    for call in &plan.calls {
        out.push_str(INDENT);
        out.push_str(&render_call(call));
        out.push('\n');
    }

    Ok(out)
}

fn node(name: &str) -> String {
    format!("nodes[{}]", string_literal(name))
}

fn render_call(call: &Call) -> String {
    match call {
        Call::AddController { name } => {
            format!("context.add_controller(name={})", string_literal(name))
        }
        Call::AddRemoteController { name, host, port } => format!(
            "context.add_remote_controller(name={}, host={}, port={})",
            string_literal(name),
            string_literal(host),
            port
        ),
        Call::AddContainer {
            name,
            ip,
            image,
            mac,
            env,
            ports,
            port_bindings,
            cmd,
        } => {
            let continuation = INDENT.repeat(2);
            let env = env
                .iter()
                .map(|(k, v)| format!("{}: {}", string_literal(k), literal(v)))
                .collect::<Vec<_>>();
            let bindings = port_bindings
                .iter()
                .map(|(host_port, container_port)| format!("{}: {}", host_port, container_port))
                .collect::<Vec<_>>();
            let lines = [
                format!("{} = context.add_container(", node(name)),
                format!(
                    "{}name={}, ip={}, image={}, mac={},",
                    continuation,
                    string_literal(name),
                    string_literal(ip),
                    string_literal(image),
                    string_literal(mac)
                ),
                format!("{}env={{{}}},", continuation, env.join(", ")),
                format!("{}ports={},", continuation, list(ports)),
                format!("{}port_bindings={{{}}},", continuation, bindings.join(", ")),
                format!("{}cmd={})", continuation, list(cmd)),
            ];
            lines.join("\n")
        }
        Call::AddSwitch { name } => format!(
            "{} = context.add_switch(name={})",
            node(name),
            string_literal(name)
        ),
        Call::AddLink {
            name,
            src,
            dst,
            port1,
            port2,
            cls,
            delay,
            bw,
        } => {
            let mut args = vec![
                format!("name={}", string_literal(name)),
                format!("src={}", node(src)),
                format!("dst={}", node(dst)),
            ];
            if let Some(port1) = port1 {
                args.push(format!("port1={}", port1));
            }
            if let Some(port2) = port2 {
                args.push(format!("port2={}", port2));
            }
            if let Some(cls) = cls {
                args.push(format!("cls={}", cls));
            }
            if let Some(delay) = delay {
                args.push(format!("delay={}", string_literal(delay)));
            }
            if let Some(bw) = bw {
                args.push(format!("bw={}", bw));
            }
            format!("context.add_link({})", args.join(", "))
        }
        Call::AddIntent { src, dst } => {
            format!("context.add_intent(src={}, dst={})", node(src), node(dst))
        }
        Call::Start => "context.start()".to_string(),
        Call::Ping { hosts } => {
            let hosts = hosts.iter().map(|h| node(h)).collect::<Vec<_>>();
            format!("context.ping([{}])", hosts.join(", "))
        }
        Call::Stop => "context.stop()".to_string(),
    }
}

fn list(items: &[Literal]) -> String {
    let items = items.iter().map(literal).collect::<Vec<_>>();
    format!("[{}]", items.join(", "))
}

fn literal(value: &Literal) -> String {
    match value {
        Literal::Str(s) => string_literal(s),
        Literal::Int(n) => n.to_string(),
    }
}

/// A double-quoted Python string literal.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
