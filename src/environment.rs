use std::collections::HashMap;
use crate::{
    error::{Error, Result},
    token::Token,
    value::Value,
};

/// The single table of global bindings.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Environment {
    values: HashMap<String, Value>,
}

impl Environment {
    pub(crate) fn new() -> Self {
        Self { values: HashMap::new() }
    }

    /// Looks a binding up by presence, so `nil`, `false`, `0` and `""` are all
    /// retrievable like any other value.
    pub(crate) fn get(&self, name: &Token) -> Result<Value> {
        self.values.get(&name.lexeme)
            .cloned()
            .ok_or_else(|| undefined_var_error(name))
    }

    pub(crate) fn define<S: Into<String>>(&mut self, name: S, value: Value) {
        self.values.insert(name.into(), value);
    }
}

fn undefined_var_error(name: &Token) -> Error {
    Error::runtime(
        name.clone(),
        format!("Undefined variable '{}'.", name.lexeme)
    )
}
