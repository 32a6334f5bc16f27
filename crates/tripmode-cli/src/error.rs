use anyhow::Error;
use std::process::ExitCode;
use thiserror::Error as ThisError;
use tripmode_config::ConfigError;
use tripmode_core::CoreError;
use tripmode_import::ImportError;
use tripmode_store::error::{StoreError, StoreErrorKind};

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:?}", err);
    } else {
        eprintln!("error: {:#}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_status_for(err))
}

fn exit_status_for(err: &Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            };
        }
        if let Some(import_err) = cause.downcast_ref::<ImportError>() {
            return import_exit_code(import_err);
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return store_exit_code(store_err);
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(config_err);
        }
        if cause.downcast_ref::<CoreError>().is_some() {
            return EXIT_INVALID_INPUT;
        }
    }
    EXIT_FAILURE
}

fn import_exit_code(err: &ImportError) -> u8 {
    match err {
        ImportError::Read(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
            EXIT_NOT_FOUND
        }
        ImportError::Parse(_)
        | ImportError::UnsupportedFileType { .. }
        | ImportError::FileTooLarge { .. }
        | ImportError::CapabilityUnavailable
        | ImportError::NoAccessibleFields => EXIT_INVALID_INPUT,
        ImportError::Read(_)
        | ImportError::PermissionDenied
        | ImportError::ConcurrentPicker
        | ImportError::Picker(_) => EXIT_FAILURE,
    }
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::NotFound => EXIT_NOT_FOUND,
        StoreErrorKind::InvalidId | StoreErrorKind::InvalidDataPath | StoreErrorKind::Core => {
            EXIT_INVALID_INPUT
        }
        StoreErrorKind::MissingHomeDir
        | StoreErrorKind::Migration
        | StoreErrorKind::Sql
        | StoreErrorKind::Io => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidMaxFileSize(_)
        | ConfigError::InvalidExtension(_)
        | ConfigError::EmptyExtensions
        | ConfigError::InvalidDefaultOwner
        | ConfigError::InvalidCsvColumn { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;

    #[test]
    fn import_errors_map_through_context() {
        let err: std::result::Result<(), ImportError> = Err(ImportError::UnsupportedFileType {
            name: "notes.txt".to_string(),
        });
        let err = err.with_context(|| "import notes.txt").unwrap_err();
        assert_eq!(exit_status_for(&err), EXIT_INVALID_INPUT);

        let missing = ImportError::Read(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(exit_status_for(&missing.into()), EXIT_NOT_FOUND);

        let denied: Error = ImportError::PermissionDenied.into();
        assert_eq!(exit_status_for(&denied), EXIT_FAILURE);
    }

    #[test]
    fn cli_and_core_errors_map_to_codes() {
        assert_eq!(exit_status_for(&not_found("contact")), EXIT_NOT_FOUND);
        let core: Error = CoreError::EmptyOwnerId.into();
        assert_eq!(exit_status_for(&core), EXIT_INVALID_INPUT);
        assert_eq!(exit_status_for(&anyhow::anyhow!("boom")), EXIT_FAILURE);
    }
}
