//! Orchestrator and allocator properties, exercised without HTTP

mod orchestration_tests;
mod sequence_tests;
