use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lazyprop_lib::execute::{ExecuteError, UnitOfWork, ValidationError, WorkOutcome, require};
use lazyprop_lib::property::Property;
use lazyprop_lib::provider::Provider;
use lazyprop_lib::value::{Value, ValueType};

/// A provider that counts how many times it has been evaluated.
pub fn counted(value: impl Into<Value>) -> (Provider, Arc<AtomicUsize>) {
  let value = value.into();
  let calls = Arc::new(AtomicUsize::new(0));
  let counter = calls.clone();
  let provider = Provider::from_fn(move || {
    counter.fetch_add(1, Ordering::SeqCst);
    Some(value.clone())
  });
  (provider, calls)
}

/// A small archive task: a required output directory, an archive name with a
/// convention, and an optional compression level.
pub struct ArchiveTask {
  pub output_dir: Property,
  pub archive_name: Property,
  pub level: Property,
  pub produced: Option<String>,
}

impl ArchiveTask {
  pub fn new() -> Self {
    let mut archive_name = Property::new("property 'archiveName'", ValueType::String);
    archive_name
      .convention("bundle.zip")
      .expect("convention on a fresh property");
    Self {
      output_dir: Property::new("property 'outputDir'", ValueType::Path),
      archive_name,
      level: Property::new("property 'level'", ValueType::Integer),
      produced: None,
    }
  }
}

impl UnitOfWork for ArchiveTask {
  fn display_name(&self) -> &str {
    "task ':archive'"
  }

  fn validate(&self) -> Result<(), ValidationError> {
    require(self.display_name(), &self.output_dir)?;
    let level = self
      .level
      .get_or_else(6)
      .map_err(|source| ValidationError::Property {
        work: self.display_name().to_string(),
        source,
      })?;
    match level.as_i64() {
      Some(0..=9) => Ok(()),
      _ => Err(ValidationError::invalid(self.display_name(), "level must be between 0 and 9")),
    }
  }

  fn properties_mut(&mut self) -> Vec<&mut Property> {
    vec![&mut self.output_dir, &mut self.archive_name, &mut self.level]
  }

  fn execute(&mut self) -> Result<WorkOutcome, ExecuteError> {
    let dir = self.output_dir.get()?;
    let name = self.archive_name.get()?;
    if let (Some(dir), Some(name)) = (dir.as_path(), name.as_str()) {
      self.produced = Some(dir.join(name).display().to_string());
    }
    Ok(WorkOutcome::Executed)
  }
}
