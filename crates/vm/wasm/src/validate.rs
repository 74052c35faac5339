// Path: crates/vm/wasm/src/validate.rs
//! Static checks applied before a module is compiled.

use wasmparser::{Validator, WasmFeatures};
use zoracle_types::error::VmError;

/// Rejects modules that contain any floating-point type or instruction.
pub(crate) fn ensure_float_free(code: &[u8]) -> Result<(), VmError> {
    let features = WasmFeatures {
        floats: false,
        simd: false,
        relaxed_simd: false,
        threads: false,
        ..WasmFeatures::default()
    };
    Validator::new_with_features(features)
        .validate_all(code)
        .map(|_| ())
        .map_err(|e| VmError::FloatingPointDisabled(e.to_string()))
}
