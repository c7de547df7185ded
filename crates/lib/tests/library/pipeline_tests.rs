use lazyprop_lib::execute::{ExecuteError, Pipeline, ValidationError, WorkOutcome, validate_stage};
use lazyprop_lib::value::Value;

use super::common::ArchiveTask;

#[test]
fn standard_pipeline_runs_configured_task() {
  let mut task = ArchiveTask::new();
  task.output_dir.set("dist").unwrap();
  task.level.set(9).unwrap();

  let outcome = Pipeline::standard().execute(&mut task).unwrap();
  assert_eq!(outcome, WorkOutcome::Executed);
  assert_eq!(task.produced.as_deref(), Some("dist/bundle.zip"));
}

#[test]
fn late_configuration_is_ignored_after_execution() {
  let mut task = ArchiveTask::new();
  task.output_dir.set("dist").unwrap();
  Pipeline::standard().execute(&mut task).unwrap();

  task.archive_name.set("other.zip").unwrap();
  assert_eq!(task.archive_name.get().unwrap(), Value::from("bundle.zip"));
}

#[test]
fn missing_required_property_stops_the_pipeline() {
  let mut task = ArchiveTask::new();

  let err = Pipeline::standard().execute(&mut task).unwrap_err();
  assert_eq!(
    err,
    ExecuteError::Validation(ValidationError::MissingValue {
      work: "task ':archive'".to_string(),
      property: "property 'outputDir'".to_string(),
    })
  );
  assert_eq!(
    err.to_string(),
    "validation failed: task ':archive': no value has been specified for property 'outputDir'"
  );
  assert!(task.produced.is_none());
}

#[test]
fn validation_error_passes_through_outer_stages_unchanged() {
  let mut task = ArchiveTask::new();
  task.output_dir.set("dist").unwrap();
  task.level.set(12).unwrap();

  let pipeline = Pipeline::new()
    .stage("outer", |ctx, next| next.run(ctx))
    .stage("validate", validate_stage);

  let err = pipeline.execute(&mut task).unwrap_err();
  assert_eq!(
    err,
    ExecuteError::Validation(ValidationError::invalid("task ':archive'", "level must be between 0 and 9"))
  );
  assert!(!task.output_dir.is_final());
}
