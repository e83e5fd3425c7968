//! Whole-pipeline tests: script text in, compiled object graph out

mod compile_integration;
mod script_integration;
