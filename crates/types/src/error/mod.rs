// Path: crates/types/src/error/mod.rs
//! Error taxonomy for the oracle module and its collaborators.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised by a state backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The requested key was not found in the state.
    #[error("Key not found in state")]
    KeyNotFound,
    /// An error occurred in the state backend.
    #[error("State backend error: {0}")]
    Backend(String),
    /// An error occurred while writing to the state.
    #[error("State write error: {0}")]
    WriteError(String),
    /// A stored value could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::KeyNotFound => "STATE_KEY_NOT_FOUND",
            Self::Backend(_) => "STATE_BACKEND_ERROR",
            Self::WriteError(_) => "STATE_WRITE_ERROR",
            Self::Decode(_) => "STATE_DECODE_ERROR",
        }
    }
}

/// Errors raised before a sandbox invocation starts running script code.
///
/// Failures while the script runs are not errors; they are reported as an
/// execution status so the gas consumed so far is preserved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    /// The engine or store could not be set up.
    #[error("VM initialization failed: {0}")]
    Initialization(String),
    /// The bytecode failed to compile or link.
    #[error("Invalid bytecode: {0}")]
    InvalidBytecode(String),
    /// The requested entry point is not exported.
    #[error("Function not found: {0}")]
    FunctionNotFound(String),
    /// The bytecode uses floating-point instructions on a float-free instance.
    #[error("Floating-point instructions are disabled: {0}")]
    FloatingPointDisabled(String),
}

impl ErrorCode for VmError {
    fn code(&self) -> &'static str {
        match self {
            Self::Initialization(_) => "VM_INITIALIZATION_FAILED",
            Self::InvalidBytecode(_) => "VM_INVALID_BYTECODE",
            Self::FunctionNotFound(_) => "VM_FUNCTION_NOT_FOUND",
            Self::FloatingPointDisabled(_) => "VM_FLOATING_POINT_DISABLED",
        }
    }
}

/// Errors returned by oracle operations. Any of these aborts the enclosing
/// transaction with no state mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// Oversized, malformed or misordered input.
    #[error("Bad value: {0}")]
    BadValue(String),
    /// An unknown identifier was referenced.
    #[error("Not found: {0}")]
    NotFound(String),
    /// A submission was repeated.
    #[error("Duplicate: {0}")]
    Duplicate(String),
    /// The target is in the wrong lifecycle phase or has expired.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// A permission or membership check failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// A message failed its stateless shape checks.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
    /// Script execution trapped.
    #[error("Sandbox trap: {0}")]
    SandboxTrap(String),
    /// Script execution or transaction metering ran out of gas.
    #[error("Out of gas: {0}")]
    OutOfGas(String),
    /// The state backend failed.
    #[error("State error: {0}")]
    State(#[from] StateError),
    /// A value could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(String),
}

impl ErrorCode for OracleError {
    fn code(&self) -> &'static str {
        match self {
            Self::BadValue(_) => "ORACLE_BAD_VALUE",
            Self::NotFound(_) => "ORACLE_NOT_FOUND",
            Self::Duplicate(_) => "ORACLE_DUPLICATE",
            Self::InvalidState(_) => "ORACLE_INVALID_STATE",
            Self::Unauthorized(_) => "ORACLE_UNAUTHORIZED",
            Self::InvalidMessage(_) => "ORACLE_INVALID_MESSAGE",
            Self::SandboxTrap(_) => "ORACLE_SANDBOX_TRAP",
            Self::OutOfGas(_) => "ORACLE_OUT_OF_GAS",
            Self::State(_) => "ORACLE_STATE_ERROR",
            Self::Codec(_) => "ORACLE_CODEC_ERROR",
        }
    }
}

impl From<VmError> for OracleError {
    fn from(e: VmError) -> Self {
        OracleError::SandboxTrap(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(OracleError::BadValue("x".into()).code(), "ORACLE_BAD_VALUE");
        assert_eq!(
            OracleError::from(StateError::KeyNotFound).code(),
            "ORACLE_STATE_ERROR"
        );
        assert_eq!(
            OracleError::from(VmError::FunctionNotFound("prepare".into())).code(),
            "ORACLE_SANDBOX_TRAP"
        );
    }
}
