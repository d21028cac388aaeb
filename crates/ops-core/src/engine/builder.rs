//! Builder para `FlowDefinition`.
//!
//! ```ignore
//! let def = DefinitionBuilder::new("create_org")
//!     .first_step(CreateOrgStep::new(..))
//!     .add_step(CreateGroupStep::new(..))
//!     .build();
//! ```

use crate::repo::FlowDefinition;
use crate::step::StepDefinition;

#[derive(Debug)]
pub struct DefinitionBuilder {
    name: String,
}

impl DefinitionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Define el primer paso del playbook. Un playbook sin steps no se puede
    /// construir con este builder.
    #[inline]
    pub fn first_step<S>(self, step: S) -> StepsBuilder
        where S: StepDefinition + 'static
    {
        StepsBuilder { name: self.name,
                       steps: vec![Box::new(step)] }
    }
}

/// Acumula steps en orden de ejecución.
pub struct StepsBuilder {
    name: String,
    steps: Vec<Box<dyn StepDefinition>>,
}

impl StepsBuilder {
    #[inline]
    pub fn add_step<N>(mut self, next: N) -> Self
        where N: StepDefinition + 'static
    {
        debug_assert!(self.steps.iter().all(|s| s.id() != next.id()),
                      "step id duplicado en el playbook");
        self.steps.push(Box::new(next));
        self
    }

    /// Construye la definición calculando su `definition_hash`.
    #[inline]
    pub fn build(self) -> FlowDefinition {
        FlowDefinition::new(self.name, self.steps)
    }
}
