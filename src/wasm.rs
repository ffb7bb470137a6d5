//! WASM bindings for Midori Core.
//!
//! Lets a browser-based editor compile topologies without a server
//! round trip.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCompiler } from 'midori_core';
//!
//! await init();
//!
//! const compiler = new WasmCompiler();
//! const python = compiler.compile(`
//!   host d1 image "ubuntu:trusty"
//!   switch s1
//!   link l1 src d1 dst s1
//! `);
//! ```

use wasm_bindgen::prelude::*;

use crate::codegen::OutputFormat;
use crate::config::CompilerConfig;
use crate::error::MidoriError;
use crate::Compiler;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible topology compiler.
#[wasm_bindgen]
pub struct WasmCompiler {
    python: Compiler,
    json: Compiler,
}

#[wasm_bindgen]
impl WasmCompiler {
    /// Create a compiler using the default address pool.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmCompiler {
        Self::build(CompilerConfig::default())
    }

    /// Create a compiler drawing generated IPs from `ip_pool` (CIDR form).
    #[wasm_bindgen]
    pub fn with_pool(ip_pool: &str) -> Result<WasmCompiler, JsValue> {
        let pool = ip_pool.parse().map_err(to_js)?;
        Ok(Self::build(CompilerConfig {
            ip_pool: pool,
            ..CompilerConfig::default()
        }))
    }

    /// Compile DSL source to the Python runtime module.
    #[wasm_bindgen]
    pub fn compile(&self, source: &str) -> Result<String, JsValue> {
        self.python.compile(source).map_err(to_js)
    }

    /// Compile DSL source to the JSON call list.
    #[wasm_bindgen]
    pub fn compile_json(&self, source: &str) -> Result<String, JsValue> {
        self.json.compile(source).map_err(to_js)
    }
}

impl Default for WasmCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmCompiler {
    fn build(config: CompilerConfig) -> Self {
        let json = CompilerConfig {
            format: OutputFormat::Json,
            ..config.clone()
        };
        Self {
            python: Compiler::new(CompilerConfig {
                format: OutputFormat::Python,
                ..config
            }),
            json: Compiler::new(json),
        }
    }
}

fn to_js(err: MidoriError) -> JsValue {
    let err = MidoriError::WasmError {
        message: err.to_string(),
    };
    JsValue::from_str(&err.to_string())
}
