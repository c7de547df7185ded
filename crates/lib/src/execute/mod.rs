//! Unit-of-work execution pipeline.
//!
//! A [`Pipeline`] is an ordered list of stage functions. Each stage receives
//! the [`ExecutionContext`] and a [`Next`] continuation; calling
//! [`Next::run`] hands control to the following stage, and the continuation
//! past the last stage executes the unit of work itself. A stage can
//! short-circuit by returning without calling `next`.
//!
//! The standard pipeline finalizes every property of the unit of work and
//! then validates it:
//!
//! ```
//! use lazyprop_lib::execute::{ExecuteError, Pipeline, UnitOfWork, WorkOutcome};
//! use lazyprop_lib::property::Property;
//! use lazyprop_lib::value::ValueType;
//!
//! struct Greet {
//!   name: Property,
//! }
//!
//! impl UnitOfWork for Greet {
//!   fn display_name(&self) -> &str {
//!     "task ':greet'"
//!   }
//!
//!   fn properties_mut(&mut self) -> Vec<&mut Property> {
//!     vec![&mut self.name]
//!   }
//!
//!   fn execute(&mut self) -> Result<WorkOutcome, ExecuteError> {
//!     let _name = self.name.get()?;
//!     Ok(WorkOutcome::Executed)
//!   }
//! }
//!
//! let mut name = Property::new("property 'name'", ValueType::String);
//! name.convention("world").unwrap();
//! let mut work = Greet { name };
//!
//! let outcome = Pipeline::standard().execute(&mut work).unwrap();
//! assert_eq!(outcome, WorkOutcome::Executed);
//! assert!(work.name.is_final());
//! ```

mod stages;
mod types;

use std::fmt;

use tracing::{debug, info, warn};

pub use stages::{finalize_stage, validate_stage};
pub use types::*;

/// A stage function: receives the context and the continuation to the rest of the pipeline.
pub type Stage = Box<dyn Fn(&mut ExecutionContext<'_>, Next<'_>) -> Result<WorkOutcome, ExecuteError> + Send + Sync>;

struct NamedStage {
  name: String,
  run: Stage,
}

/// State handed to each stage.
pub struct ExecutionContext<'a> {
  work: &'a mut dyn UnitOfWork,
}

impl<'a> ExecutionContext<'a> {
  /// Wrap `work` for a pipeline run.
  pub fn new(work: &'a mut dyn UnitOfWork) -> Self {
    Self { work }
  }

  /// The unit of work being run.
  pub fn work(&self) -> &(dyn UnitOfWork + 'a) {
    &*self.work
  }

  /// Mutable access to the unit of work, for stages that configure or finalize it.
  pub fn work_mut(&mut self) -> &mut (dyn UnitOfWork + 'a) {
    &mut *self.work
  }
}

/// Continuation into the remaining stages.
pub struct Next<'a> {
  stages: &'a [NamedStage],
}

impl Next<'_> {
  /// Run the remaining stages, then the unit of work.
  pub fn run(self, ctx: &mut ExecutionContext<'_>) -> Result<WorkOutcome, ExecuteError> {
    match self.stages.split_first() {
      Some((stage, rest)) => {
        debug!(stage = %stage.name, work = ctx.work().display_name(), "entering stage");
        (stage.run)(ctx, Next { stages: rest })
      }
      None => {
        debug!(work = ctx.work().display_name(), "executing unit of work");
        ctx.work_mut().execute()
      }
    }
  }
}

/// An ordered list of stages wrapped around unit-of-work execution.
#[derive(Default)]
pub struct Pipeline {
  stages: Vec<NamedStage>,
}

impl Pipeline {
  /// An empty pipeline: executes the unit of work directly.
  pub fn new() -> Self {
    Self::default()
  }

  /// Finalize all properties, then validate.
  pub fn standard() -> Self {
    Self::new()
      .stage("finalize", finalize_stage)
      .stage("validate", validate_stage)
  }

  /// Append a stage. Stages run in the order they are added.
  pub fn stage<F>(mut self, name: impl Into<String>, run: F) -> Self
  where
    F: Fn(&mut ExecutionContext<'_>, Next<'_>) -> Result<WorkOutcome, ExecuteError> + Send + Sync + 'static,
  {
    self.stages.push(NamedStage {
      name: name.into(),
      run: Box::new(run),
    });
    self
  }

  /// Stage names, in execution order.
  pub fn stage_names(&self) -> impl Iterator<Item = &str> {
    self.stages.iter().map(|stage| stage.name.as_str())
  }

  /// Run `work` through every stage.
  pub fn execute(&self, work: &mut dyn UnitOfWork) -> Result<WorkOutcome, ExecuteError> {
    let name = work.display_name().to_string();
    info!(work = %name, stage_count = self.stages.len(), "starting unit of work");

    let mut ctx = ExecutionContext::new(work);
    let result = Next { stages: &self.stages }.run(&mut ctx);

    match &result {
      Ok(outcome) => info!(work = %name, outcome = ?outcome, "unit of work complete"),
      Err(e) => warn!(work = %name, error = %e, "unit of work failed"),
    }
    result
  }
}

impl fmt::Debug for Pipeline {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pipeline")
      .field("stages", &self.stage_names().collect::<Vec<_>>())
      .finish()
  }
}
