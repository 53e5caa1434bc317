//! Config facade: single entry point for loading layered configuration.

use super::merge::merge_policy;
use super::sources::{environment, global_file};
use super::CompareConfig;
use crate::error::CompareError;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the global file and the environment
    pub fn load() -> Result<CompareConfig, CompareError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder);
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Load defaults, the global file, `path`, then the environment
    pub fn load_from_file(path: &Path) -> Result<CompareConfig, CompareError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = global_file::add_explicit_to_builder(builder, path)?;
        let builder = environment::add_to_builder(builder);
        Ok(builder.build()?.try_deserialize()?)
    }
}
