use std::fmt;

use super::errors::ValidationError;
use super::types::Validator;
use crate::session::Session;

/// Runs validators in insertion order and stops at the first failure.
#[derive(Default)]
pub struct ValidatorChain {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style append.
    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.push(validator);
        self
    }

    pub fn push(&mut self, validator: impl Validator + 'static) {
        self.validators.push(Box::new(validator));
    }

    pub fn validators(&self) -> &[Box<dyn Validator>] {
        &self.validators
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for ValidatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.validators.iter().map(|v| v.name()))
            .finish()
    }
}

impl Validator for ValidatorChain {
    fn name(&self) -> &str {
        "ValidatorChain"
    }

    /// The error of the failing member is returned as is, so it names that member.
    fn process(&self, session: &mut Session) -> Result<(), ValidationError> {
        for validator in &self.validators {
            tracing::debug!(validator = validator.name(), "Running session validator");
            validator.process(session)?;
        }
        Ok(())
    }
}
