//! CSV script input and session summary output for the command-line replay.

pub mod action_reader;
pub mod summary_writer;
