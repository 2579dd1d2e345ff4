// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SysexecError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SysexecError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.runner, raw.worker))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_runner(cfg)?;
    validate_worker(cfg)?;
    Ok(())
}

fn validate_runner(cfg: &RawConfigFile) -> Result<()> {
    if !cfg.runner.shell.is_absolute() {
        return Err(SysexecError::ConfigError(format!(
            "[runner].shell must be an absolute path (got {:?})",
            cfg.runner.shell
        )));
    }
    Ok(())
}

fn validate_worker(cfg: &RawConfigFile) -> Result<()> {
    if cfg.worker.workers == 0 {
        return Err(SysexecError::ConfigError(
            "[worker].workers must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
