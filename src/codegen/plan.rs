//! Projection of a defaulted [`Program`] into an ordered call plan.
//!
//! A [`Plan`] records which execution-context operations to invoke and with
//! which arguments, independent of how they are printed. Serializers in
//! [`super::python`] and [`super::json`] turn a plan into text.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::debug;

use crate::dsl::{Host, Link, Program, Statement, Value, ValueKind};
use crate::error::{MidoriError, Result};

/// A literal argument value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Str(String),
    Int(u64),
}

impl From<&Value> for Literal {
    /// Identifiers in data positions are passed on as strings.
    fn from(value: &Value) -> Self {
        match &value.kind {
            ValueKind::Name(s) | ValueKind::Str(s) => Literal::Str(s.clone()),
            ValueKind::Int(n) => Literal::Int(*n),
        }
    }
}

/// One operation on the execution context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    AddController {
        name: String,
    },
    AddRemoteController {
        name: String,
        host: String,
        port: u64,
    },
    AddContainer {
        name: String,
        ip: String,
        image: String,
        mac: String,
        #[serde(serialize_with = "string_keyed_map")]
        env: Vec<(String, Literal)>,
        ports: Vec<Literal>,
        #[serde(serialize_with = "int_keyed_map")]
        port_bindings: Vec<(u64, u64)>,
        cmd: Vec<Literal>,
    },
    AddSwitch {
        name: String,
    },
    AddLink {
        name: String,
        src: String,
        dst: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        port1: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        port2: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cls: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        delay: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bw: Option<u64>,
    },
    AddIntent {
        src: String,
        dst: String,
    },
    Start,
    Ping {
        hosts: Vec<String>,
    },
    Stop,
}

impl Call {
    /// Name of the execution-context operation this call invokes.
    pub fn op(&self) -> &'static str {
        match self {
            Self::AddController { .. } => "add_controller",
            Self::AddRemoteController { .. } => "add_remote_controller",
            Self::AddContainer { .. } => "add_container",
            Self::AddSwitch { .. } => "add_switch",
            Self::AddLink { .. } => "add_link",
            Self::AddIntent { .. } => "add_intent",
            Self::Start => "start",
            Self::Ping { .. } => "ping",
            Self::Stop => "stop",
        }
    }
}

// Maps keep declaration order rather than being sorted.
fn string_keyed_map<S: Serializer>(
    entries: &[(String, Literal)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, value) in entries {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

fn int_keyed_map<S: Serializer>(
    entries: &[(u64, u64)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, value) in entries {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

/// The ordered call sequence for one program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub calls: Vec<Call>,
}

impl Plan {
    /// Project a program whose hosts have already been defaulted.
    pub fn from_program(program: &Program) -> Result<Self> {
        let mut calls = Vec::with_capacity(program.statements.len());

        for statement in &program.statements {
            match statement {
                Statement::Controller(c) => calls.push(Call::AddController {
                    name: c.name.text(),
                }),
                Statement::RemoteController(rc) => calls.push(Call::AddRemoteController {
                    name: rc.name.clone(),
                    host: rc.host.clone(),
                    port: rc.port,
                }),
                Statement::Host(host) => calls.push(container_call(host)?),
                Statement::Switch(switch) => {
                    calls.extend(switch.names.iter().map(|name| Call::AddSwitch {
                        name: name.clone(),
                    }));
                }
                Statement::Link(link) => calls.push(link_call(link)),
                Statement::Intent(intent) => {
                    calls.extend(intent.hops().map(|(src, dst)| Call::AddIntent {
                        src: src.to_string(),
                        dst: dst.to_string(),
                    }));
                }
                Statement::Up { .. } => calls.push(Call::Start),
                Statement::Down { .. } => calls.push(Call::Stop),
                Statement::Ping(ping) => calls.push(Call::Ping {
                    hosts: ping.names.clone(),
                }),
            }
        }

        debug!(calls = calls.len(), "projected program");
        Ok(Self { calls })
    }

    /// Link classes used by the plan, deduplicated in first-use order.
    pub fn link_classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = Vec::new();
        for call in &self.calls {
            if let Call::AddLink { cls: Some(cls), .. } = call {
                if !classes.contains(&cls.as_str()) {
                    classes.push(cls);
                }
            }
        }
        classes
    }
}

fn container_call(host: &Host) -> Result<Call> {
    let unresolved = |field: &str| {
        MidoriError::projection(format!(
            "host '{}' (line {}) has no {}; defaults were not applied",
            host.name, host.pos.line, field
        ))
    };
    Ok(Call::AddContainer {
        name: host.name.clone(),
        ip: host.ip_addr.clone().ok_or_else(|| unresolved("IP address"))?,
        image: host.image.clone(),
        mac: host.mac.clone().ok_or_else(|| unresolved("MAC address"))?,
        env: host
            .env
            .iter()
            .map(|(key, value)| (key.clone(), Literal::from(value)))
            .collect(),
        ports: host.ports.iter().map(Literal::from).collect(),
        port_bindings: host.port_bindings.clone(),
        cmd: host.cmd.iter().map(Literal::from).collect(),
    })
}

fn link_call(link: &Link) -> Call {
    Call::AddLink {
        name: link.name.clone(),
        src: link.src.clone(),
        dst: link.dst.clone(),
        port1: link.port1,
        port2: link.port2,
        cls: link.cls.clone(),
        delay: link.delay.clone(),
        bw: link.bw,
    }
}
