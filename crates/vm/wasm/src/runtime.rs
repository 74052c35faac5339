// Path: crates/vm/wasm/src/runtime.rs
use crate::host::{self, HostState};
use crate::validate::ensure_float_free;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use wasmtime::{Config, Engine, ExternType, Linker, Module, Store, StoreLimitsBuilder, Trap};
use zoracle_api::vm::{
    EntryPoint, ExecutionEnvironment, ExecutionOutput, ExecutionStatus, ScriptRuntime,
};
use zoracle_types::config::SandboxConfig;
use zoracle_types::error::VmError;

const WASM_PAGE_SIZE: usize = 64 * 1024;

/// wasmtime-backed [`ScriptRuntime`].
///
/// One gas unit is one unit of wasmtime fuel. Compiled modules are cached by
/// the SHA-256 of their bytecode.
pub struct OwasmRuntime {
    engine: Engine,
    config: SandboxConfig,
    linker: Linker<HostState>,
    module_cache: RwLock<HashMap<[u8; 32], Module>>,
}

impl OwasmRuntime {
    pub fn new(config: SandboxConfig) -> Result<Self, VmError> {
        let mut wasm_config = Config::new();
        wasm_config.consume_fuel(true);
        wasm_config.cranelift_nan_canonicalization(true);
        wasm_config.wasm_relaxed_simd(false);
        wasm_config.wasm_simd(false);
        wasm_config.wasm_threads(false);
        wasm_config.max_wasm_stack(config.max_wasm_stack_bytes);

        let engine =
            Engine::new(&wasm_config).map_err(|e| VmError::Initialization(e.to_string()))?;

        let mut linker = Linker::new(&engine);
        host::link(&mut linker).map_err(|e| VmError::Initialization(e.to_string()))?;

        Ok(Self {
            engine,
            config,
            linker,
            module_cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Validates and compiles `code`, or returns the cached module.
    fn load_module(&self, code: &[u8]) -> Result<Module, VmError> {
        let hash: [u8; 32] = Sha256::digest(code).into();

        if let Ok(cache) = self.module_cache.read() {
            if let Some(module) = cache.get(&hash) {
                return Ok(module.clone());
            }
        }

        if !self.config.allow_floating_point {
            ensure_float_free(code)?;
        }
        let module = Module::new(&self.engine, code)
            .map_err(|e| VmError::InvalidBytecode(e.to_string()))?;
        log::debug!("compiled oracle script {}", hex_prefix(&hash));

        if let Ok(mut cache) = self.module_cache.write() {
            cache.insert(hash, module.clone());
        }
        Ok(module)
    }

    fn limits(&self) -> StoreLimitsBuilder {
        let pages = usize::try_from(self.config.max_memory_pages).unwrap_or(usize::MAX);
        StoreLimitsBuilder::new()
            .memory_size(pages.saturating_mul(WASM_PAGE_SIZE))
            .table_elements(self.config.max_table_elements)
            .instances(self.config.max_instances)
            .memories(1)
            .tables(1)
    }

    fn invoke(
        &self,
        store: &mut Store<HostState>,
        module: &Module,
        entry: EntryPoint,
    ) -> anyhow::Result<()> {
        let instance = self.linker.instantiate(&mut *store, module)?;
        let func = instance.get_typed_func::<(), ()>(&mut *store, entry.as_str())?;
        func.call(&mut *store, ())
    }
}

/// The entry point must be exported as a `() -> ()` function.
fn check_entry(module: &Module, entry: EntryPoint) -> Result<(), VmError> {
    match module.get_export(entry.as_str()) {
        Some(ExternType::Func(ty)) if ty.params().len() == 0 && ty.results().len() == 0 => Ok(()),
        Some(_) => Err(VmError::FunctionNotFound(format!(
            "{} is not a () -> () function",
            entry
        ))),
        None => Err(VmError::FunctionNotFound(entry.to_string())),
    }
}

fn classify(err: anyhow::Error) -> ExecutionStatus {
    if err.downcast_ref::<Trap>() == Some(&Trap::OutOfFuel) {
        ExecutionStatus::OutOfGas
    } else {
        ExecutionStatus::Trapped(err.root_cause().to_string())
    }
}

fn hex_prefix(hash: &[u8; 32]) -> String {
    hash.iter().take(4).map(|b| format!("{:02x}", b)).collect()
}

impl ScriptRuntime for OwasmRuntime {
    fn run(
        &self,
        code: &[u8],
        entry: EntryPoint,
        gas_limit: u64,
        env: Arc<dyn ExecutionEnvironment>,
    ) -> Result<ExecutionOutput, VmError> {
        let module = self.load_module(code)?;
        check_entry(&module, entry)?;

        let state = HostState::new(
            entry,
            env,
            self.config.host_call_costs,
            self.limits().build(),
        );
        let mut store = Store::new(&self.engine, state);
        store.limiter(|s| &mut s.limits);
        store
            .set_fuel(gas_limit)
            .map_err(|e| VmError::Initialization(e.to_string()))?;

        let status = match self.invoke(&mut store, &module, entry) {
            Ok(()) => ExecutionStatus::Completed,
            Err(e) => classify(e),
        };
        let remaining = store.get_fuel().unwrap_or(0);
        let gas_used = gas_limit.saturating_sub(remaining);

        let state = store.into_data();
        if entry == EntryPoint::Execute && status.is_completed() && !state.result.is_set() {
            log::debug!("execute completed without calling save_result");
        }
        log::debug!(
            "{} finished: status={:?} gas_used={} raw_requests={} result_saves={}",
            entry,
            status,
            gas_used,
            state.raw_requests.len(),
            state.result.writes()
        );
        let result = if status.is_completed() {
            state.result.into_inner()
        } else {
            Vec::new()
        };

        Ok(ExecutionOutput {
            status,
            gas_used,
            result,
            raw_requests: state.raw_requests,
        })
    }
}
