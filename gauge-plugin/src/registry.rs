//! Plugin Registry

use crate::{EvalContext, FunctionMeta, FunctionPlugin};
use gauge_core::{rank_similar, ErrorReport, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Central function registry
#[derive(Default)]
pub struct PluginRegistry {
    functions: HashMap<String, Arc<dyn FunctionPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    /// Metadata of every function, sorted by name
    pub fn metas(&self) -> Vec<FunctionMeta> {
        let mut metas: Vec<FunctionMeta> = self.functions.values().map(|f| f.meta()).collect();
        metas.sort_by_key(|m| m.name);
        metas
    }

    pub fn call_function(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Value {
        let Some(f) = self.get_function(name) else {
            let similar = rank_similar(name, self.functions.keys().map(|k| k.as_str()));
            return Value::Error(ErrorReport::undefined_func(name).with_alternatives(&similar));
        };

        let meta = f.meta();
        if args.len() < meta.required_args() || args.len() > meta.args.len() {
            return Value::Error(ErrorReport::arg_count(meta.name, meta.required_args(), args.len()));
        }
        f.call(args, ctx)
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        match self.get_function(name) {
            Some(f) => function_to_help(f.meta()),
            None => {
                let similar = rank_similar(name, self.functions.keys().map(|k| k.as_str()));
                Value::Error(
                    ErrorReport::new(gauge_core::codes::NOT_FOUND, format!("No function named '{}'", name))
                        .with_alternatives(&similar),
                )
            }
        }
    }

    fn general_help(&self) -> Value {
        let names: Vec<Value> = self.metas().iter().map(|m| Value::from(m.name)).collect();
        Value::object([
            ("functions", Value::List(names)),
            ("usage", Value::from("Call help('function_name') for detailed help.")),
        ])
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        let funcs: Vec<Value> = self
            .metas()
            .into_iter()
            .filter(|m| category.map_or(true, |c| m.category == c))
            .map(|meta| {
                Value::object([
                    ("name", Value::from(meta.name)),
                    ("description", Value::from(meta.description)),
                    ("usage", Value::from(meta.usage)),
                    ("category", Value::from(meta.category)),
                ])
            })
            .collect();
        Value::List(funcs)
    }
}

fn function_to_help(meta: FunctionMeta) -> Value {
    let args = meta
        .args
        .iter()
        .map(|a| {
            Value::object([
                ("name", Value::from(a.name)),
                ("type", Value::from(a.typ)),
                ("description", Value::from(a.description)),
                ("optional", Value::from(a.optional)),
            ])
        })
        .collect();

    Value::object([
        ("name", Value::from(meta.name)),
        ("description", Value::from(meta.description)),
        ("usage", Value::from(meta.usage)),
        ("returns", Value::from(meta.returns)),
        ("category", Value::from(meta.category)),
        ("args", Value::List(args)),
        ("examples", Value::List(meta.examples.iter().map(|e| Value::from(*e)).collect())),
        ("related", Value::List(meta.related.iter().map(|r| Value::from(*r)).collect())),
    ])
}
