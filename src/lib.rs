//! Doctrans - translate documentation with an LLM and publish it as a pull request
//!
//! Doctrans is a CLI tool and library that expands an input list into
//! files, translates each one through an OpenAI-compatible chat endpoint, writes
//! the results along a path pattern and, in CI, commits every file to a session
//! branch tracked by a single pull request.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, commands, console output)
//! - `config`: Run configuration built from flags and environment
//! - `core`: Discovery, path templating and the translation workflow
//! - `llm`: Chat providers and the translate/refine passes
//! - `publish`: Git operations and the pull request lifecycle
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod llm;
pub mod publish;
pub mod utils;
