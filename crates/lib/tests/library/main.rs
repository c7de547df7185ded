mod common;
mod pipeline_tests;
mod property_tests;
mod provider_tests;
