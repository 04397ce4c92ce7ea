use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use log::{debug, info};
use sacloud_dns_sync::{
    endpoint::Endpoint,
    plan::Changes,
    provider::{Provider, ProviderError},
};
use thiserror::Error;

/// An executor runs a single reconciliation cycle against a provider
pub struct Executor<'a> {
    provider: &'a dyn Provider,
}

#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum ExecutorError {
    #[error("`{0}`")]
    Provider(ProviderError),
    #[error("could not read changes: {0}")]
    Input(String),
    #[error("could not write output: {0}")]
    Output(String),
}
impl From<ProviderError> for ExecutorError {
    fn from(p: ProviderError) -> Self {
        ExecutorError::Provider(p)
    }
}

/// Summary of an applied set of changes
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct RunResult {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

impl RunResult {
    pub fn is_empty(&self) -> bool {
        self.create + self.update + self.delete == 0
    }
}

/// Read a change document from `path`, or from stdin if `path` is `-`
pub fn read_changes(path: &Path) -> Result<Changes, ExecutorError> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| ExecutorError::Input(e.to_string()))?;
        buf
    } else {
        fs::read_to_string(path)
            .map_err(|e| ExecutorError::Input(format!("{}: {}", path.display(), e)))?
    };
    parse_changes(&content)
}

fn parse_changes(content: &str) -> Result<Changes, ExecutorError> {
    serde_json::from_str(content).map_err(|e| ExecutorError::Input(e.to_string()))
}

impl<'a> Executor<'a> {
    pub fn new(provider: &'a dyn Provider) -> Executor<'a> {
        Self { provider }
    }

    pub fn records(&self) -> Result<Vec<Endpoint>, ExecutorError> {
        let records = self.provider.records()?;
        info!("Retrieved {} records from provider", records.len());
        Ok(records)
    }

    pub fn apply(&self, changes: &Changes) -> Result<RunResult, ExecutorError> {
        let result = RunResult {
            create: changes.create.len(),
            update: changes.update_new.len(),
            delete: changes.delete.len(),
        };
        if result.is_empty() {
            info!("Nothing to do");
            return Ok(result);
        }
        debug!("Applying changes: {:?}", changes);
        for ep in &changes.create {
            info!("Creating {}", ep);
        }
        for ep in &changes.update_new {
            info!("Updating {}", ep);
        }
        for ep in &changes.delete {
            info!("Deleting {}", ep);
        }

        self.provider.apply_changes(Some(changes))?;
        Ok(result)
    }
}
