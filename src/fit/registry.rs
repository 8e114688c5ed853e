//! Registered decay models, looked up by id.

use crate::error::AppError;
use crate::fit::{DecayFunctionModel, DoubleExponential, SingleExponential};

pub struct ModelRegistry {
    models: Vec<Box<dyn DecayFunctionModel>>,
}

impl ModelRegistry {
    pub fn empty() -> Self {
        Self { models: Vec::new() }
    }

    /// Add a model. Ids must be unique.
    pub fn register(&mut self, model: Box<dyn DecayFunctionModel>) -> Result<(), AppError> {
        if self.models.iter().any(|m| m.id() == model.id()) {
            return Err(AppError::invalid_value(format!(
                "A model with id '{}' is already registered.",
                model.id()
            )));
        }
        self.models.push(model);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&dyn DecayFunctionModel, AppError> {
        self.models
            .iter()
            .find(|m| m.id() == id)
            .map(|m| m.as_ref())
            .ok_or_else(|| {
                AppError::invalid_value(format!(
                    "Unknown model '{id}'. Available: {}.",
                    self.ids().join(", ")
                ))
            })
    }

    /// Models in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn DecayFunctionModel> + '_ {
        self.models.iter().map(|m| m.as_ref())
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.models.iter().map(|m| m.id()).collect()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self {
            models: vec![Box::new(SingleExponential), Box::new(DoubleExponential)],
        }
    }
}
