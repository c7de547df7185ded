//! Built-in pipeline stages.

use tracing::{debug, info};

use super::{ExecuteError, ExecutionContext, Next, WorkOutcome};

/// Validate the unit of work before running the rest of the pipeline.
///
/// A validation failure is returned as-is and the remaining stages are not run.
pub fn validate_stage(ctx: &mut ExecutionContext<'_>, next: Next<'_>) -> Result<WorkOutcome, ExecuteError> {
  ctx.work().validate()?;
  debug!(work = ctx.work().display_name(), "validation passed");
  next.run(ctx)
}

/// Finalize every property of the unit of work before running the rest of the pipeline.
pub fn finalize_stage(ctx: &mut ExecutionContext<'_>, next: Next<'_>) -> Result<WorkOutcome, ExecuteError> {
  let mut count = 0usize;
  for property in ctx.work_mut().properties_mut() {
    property.finalize()?;
    count += 1;
  }
  info!(work = ctx.work().display_name(), property_count = count, "finalized properties");
  next.run(ctx)
}
