use levenshtein::levenshtein;
use std::collections::HashMap;
use super::trig_mode::TrigMode;

/// A context to use when evaluating an expression, containing the values bound to the free
/// variables of the expression and the trigonometric mode.
///
/// The context is read-only during evaluation, so a fully built context can be shared between
/// any number of concurrent evaluations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ctxt {
    /// The variables in the context.
    vars: HashMap<String, f64>,

    /// The trigonometric mode of the context.
    pub trig_mode: TrigMode,
}

impl Ctxt {
    /// Creates a new empty context.
    pub fn new() -> Ctxt {
        Ctxt::default()
    }

    /// Creates a new empty context with the given trigonometric mode.
    pub fn with_trig_mode(trig_mode: TrigMode) -> Ctxt {
        Ctxt {
            trig_mode,
            ..Default::default()
        }
    }

    /// Add a variable to the context.
    pub fn add_var(&mut self, name: &str, value: f64) {
        self.vars.insert(name.to_string(), value);
    }

    /// Get the value of a variable in the context.
    pub fn get_var(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }

    /// Returns the names of all variables in the context with a name similar to the given name.
    pub fn get_similar_vars(&self, name: &str) -> Vec<String> {
        let mut similar = self
            .vars
            .keys()
            .filter(|n| levenshtein(n, name) < 2)
            .cloned()
            .collect::<Vec<_>>();
        similar.sort();
        similar
    }
}
