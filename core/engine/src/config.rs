//! FILENAME: core/engine/src/config.rs
//! PURPOSE: Serializable engine settings.
//! CONTEXT: Lets a host keep its variables, function declarations and
//! resolution settings in a JSON document and apply them to a context in
//! one step (see `EvaluationContext::with_config`).
//!
//! EXAMPLE:
//! ```json
//! {
//!   "variables": { "c": 30, "d": 20 },
//!   "functions": ["x(a,b)=a*b"],
//!   "order": "host_first",
//!   "max_depth": 64
//! }
//! ```

use crate::error::EvalResult;
use crate::resolver::ResolveOrder;
use calc_parser::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Host bindings, present in every pass.
    pub variables: BTreeMap<String, f64>,
    /// `name(params)=body` declarations.
    pub functions: Vec<String>,
    pub order: ResolveOrder,
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            variables: BTreeMap::new(),
            functions: Vec::new(),
            order: ResolveOrder::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> EvalResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> EvalResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
