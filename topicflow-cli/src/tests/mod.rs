//! Unit tests for topicflow-cli, organized by module.

mod run;
