//! Shutdown-flag file decision sink.
//!
//! The outer launcher reads the flag after the supervisor exits: "1" means
//! power off, "0" means leave the host running.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::info;

use super::DecisionSink;
use crate::domain::Decision;
use crate::error::Result;

/// Writes terminal decisions to a flag file.
#[derive(Debug, Clone)]
pub struct FlagFileSink {
    path: PathBuf,
}

impl FlagFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flag contents for a terminal decision
    fn flag_for(decision: Decision) -> Option<&'static str> {
        match decision {
            Decision::Shutdown => Some("1"),
            Decision::Exit => Some("0"),
            Decision::Restart => None,
        }
    }
}

#[async_trait]
impl DecisionSink for FlagFileSink {
    async fn publish(&self, decision: Decision) -> Result<()> {
        let Some(flag) = Self::flag_for(decision) else {
            return Ok(());
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, flag).await?;
        info!("Wrote shutdown flag {} to {}", flag, self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("shutdown flag file {}", self.path.display())
    }
}
