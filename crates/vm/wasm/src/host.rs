// Path: crates/vm/wasm/src/host.rs
//! Host functions exposed to oracle scripts under the `env` import module.
//!
//! | name | signature | mode |
//! |---|---|---|
//! | `get_calldata_size` | `() -> i32` | both |
//! | `read_calldata` | `(ptr: i32, offset: i32, len: i32)` | both |
//! | `request_raw_data` | `(data_source_id: i64, ptr: i32, len: i32) -> i64` | prepare |
//! | `get_external_data_count` | `() -> i64` | execute |
//! | `get_received_validator_count` | `() -> i32` | execute |
//! | `get_raw_report_size` | `(external_id: i64, validator_index: i32) -> i32` | execute |
//! | `get_raw_report_exit_code` | `(external_id: i64, validator_index: i32) -> i32` | execute |
//! | `read_raw_report` | `(external_id: i64, validator_index: i32, ptr: i32)` | execute |
//! | `save_result` | `(ptr: i32, len: i32)` | execute |
//!
//! Every call is charged `base + per_byte * bytes` fuel before it does any
//! work. Calling a function outside its mode, passing a negative or
//! out-of-range pointer, or naming an unknown data source traps.

use crate::result_cell::ResultCell;
use anyhow::{anyhow, bail, Result};
use std::sync::Arc;
use wasmtime::{Caller, Extern, Linker, Memory, StoreLimits, Trap};
use zoracle_api::vm::{EntryPoint, ExecutionEnvironment};
use zoracle_types::app::{DataSourceId, ExternalId, RawDataReport, RawDataRequest};
use zoracle_types::config::HostCallCosts;

/// Import module name for all host functions.
pub const HOST_MODULE: &str = "env";

/// Per-invocation store data.
pub(crate) struct HostState {
    pub(crate) entry: EntryPoint,
    pub(crate) env: Arc<dyn ExecutionEnvironment>,
    pub(crate) costs: HostCallCosts,
    pub(crate) raw_requests: Vec<RawDataRequest>,
    pub(crate) result: ResultCell,
    pub(crate) limits: StoreLimits,
}

impl HostState {
    pub(crate) fn new(
        entry: EntryPoint,
        env: Arc<dyn ExecutionEnvironment>,
        costs: HostCallCosts,
        limits: StoreLimits,
    ) -> Self {
        Self {
            entry,
            env,
            costs,
            raw_requests: Vec::new(),
            result: ResultCell::default(),
            limits,
        }
    }
}

fn require_mode(caller: &Caller<'_, HostState>, mode: EntryPoint, name: &str) -> Result<()> {
    if caller.data().entry != mode {
        bail!("{} is only callable from {}", name, mode);
    }
    Ok(())
}

/// Deducts the cost of a host call from the store's fuel. Running dry zeroes
/// the fuel and ends execution with an out-of-fuel trap.
fn charge(caller: &mut Caller<'_, HostState>, bytes: usize) -> Result<()> {
    let cost = caller.data().costs.cost(bytes);
    let fuel = caller.get_fuel()?;
    if fuel < cost {
        caller.set_fuel(0)?;
        return Err(Trap::OutOfFuel.into());
    }
    caller.set_fuel(fuel - cost)?;
    Ok(())
}

fn memory(caller: &mut Caller<'_, HostState>) -> Result<Memory> {
    caller
        .get_export("memory")
        .and_then(Extern::into_memory)
        .ok_or_else(|| anyhow!("script does not export memory"))
}

fn to_len(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| anyhow!("negative {}: {}", what, value))
}

fn check_range(caller: &Caller<'_, HostState>, mem: &Memory, ptr: usize, len: usize) -> Result<()> {
    let end = ptr
        .checked_add(len)
        .ok_or_else(|| anyhow!("memory range overflows"))?;
    if end > mem.data_size(caller) {
        bail!("memory access out of bounds: {}..{}", ptr, end);
    }
    Ok(())
}

fn read_memory(caller: &mut Caller<'_, HostState>, ptr: i32, len: i32) -> Result<Vec<u8>> {
    let ptr = to_len(ptr, "pointer")?;
    let len = to_len(len, "length")?;
    let mem = memory(caller)?;
    check_range(caller, &mem, ptr, len)?;
    let mut buf = vec![0u8; len];
    mem.read(&*caller, ptr, &mut buf)?;
    Ok(buf)
}

fn write_memory(caller: &mut Caller<'_, HostState>, ptr: i32, bytes: &[u8]) -> Result<()> {
    let ptr = to_len(ptr, "pointer")?;
    let mem = memory(caller)?;
    check_range(caller, &mem, ptr, bytes.len())?;
    mem.write(&mut *caller, ptr, bytes)?;
    Ok(())
}

fn lookup_report(
    env: &Arc<dyn ExecutionEnvironment>,
    external_id: i64,
    validator_index: i32,
) -> Option<RawDataReport> {
    let external_id = ExternalId(u64::try_from(external_id).ok()?);
    let validator_index = u32::try_from(validator_index).ok()?;
    env.raw_report(external_id, validator_index).cloned()
}

/// Registers every host function on `linker`.
pub(crate) fn link(linker: &mut Linker<HostState>) -> Result<()> {
    linker.func_wrap(
        HOST_MODULE,
        "get_calldata_size",
        |mut caller: Caller<'_, HostState>| -> Result<i32> {
            charge(&mut caller, 0)?;
            let len = caller.data().env.calldata().len();
            i32::try_from(len).map_err(|_| anyhow!("calldata too large"))
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "read_calldata",
        |mut caller: Caller<'_, HostState>, ptr: i32, offset: i32, len: i32| -> Result<()> {
            let offset = to_len(offset, "offset")?;
            let len = to_len(len, "length")?;
            charge(&mut caller, len)?;
            let env = caller.data().env.clone();
            let end = offset
                .checked_add(len)
                .ok_or_else(|| anyhow!("calldata range overflows"))?;
            let slice = env
                .calldata()
                .get(offset..end)
                .ok_or_else(|| anyhow!("calldata read out of bounds: {}..{}", offset, end))?;
            write_memory(&mut caller, ptr, slice)
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "request_raw_data",
        |mut caller: Caller<'_, HostState>, data_source_id: i64, ptr: i32, len: i32| -> Result<i64> {
            require_mode(&caller, EntryPoint::Prepare, "request_raw_data")?;
            charge(&mut caller, to_len(len, "length")?)?;
            let id = u64::try_from(data_source_id)
                .ok()
                .filter(|id| *id > 0)
                .map(DataSourceId)
                .ok_or_else(|| anyhow!("invalid data source id {}", data_source_id))?;
            if !caller.data().env.data_source_exists(id) {
                bail!("data source {} does not exist", id);
            }
            let calldata = read_memory(&mut caller, ptr, len)?;
            let state = caller.data_mut();
            state.raw_requests.push(RawDataRequest {
                data_source_id: id,
                calldata,
            });
            Ok(state.raw_requests.len() as i64)
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "get_external_data_count",
        |mut caller: Caller<'_, HostState>| -> Result<i64> {
            require_mode(&caller, EntryPoint::Execute, "get_external_data_count")?;
            charge(&mut caller, 0)?;
            i64::try_from(caller.data().env.external_data_count())
                .map_err(|_| anyhow!("external data count overflows"))
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "get_received_validator_count",
        |mut caller: Caller<'_, HostState>| -> Result<i32> {
            require_mode(&caller, EntryPoint::Execute, "get_received_validator_count")?;
            charge(&mut caller, 0)?;
            i32::try_from(caller.data().env.received_validator_count())
                .map_err(|_| anyhow!("validator count overflows"))
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "get_raw_report_size",
        |mut caller: Caller<'_, HostState>, external_id: i64, validator_index: i32| -> Result<i32> {
            require_mode(&caller, EntryPoint::Execute, "get_raw_report_size")?;
            charge(&mut caller, 0)?;
            match lookup_report(&caller.data().env, external_id, validator_index) {
                Some(report) => i32::try_from(report.data.len())
                    .map_err(|_| anyhow!("raw report too large")),
                None => Ok(-1),
            }
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "get_raw_report_exit_code",
        |mut caller: Caller<'_, HostState>, external_id: i64, validator_index: i32| -> Result<i32> {
            require_mode(&caller, EntryPoint::Execute, "get_raw_report_exit_code")?;
            charge(&mut caller, 0)?;
            lookup_report(&caller.data().env, external_id, validator_index)
                .map(|report| i32::from(report.exit_code))
                .ok_or_else(|| {
                    anyhow!("no report for external id {} from validator {}", external_id, validator_index)
                })
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "read_raw_report",
        |mut caller: Caller<'_, HostState>, external_id: i64, validator_index: i32, ptr: i32| -> Result<()> {
            require_mode(&caller, EntryPoint::Execute, "read_raw_report")?;
            let report = lookup_report(&caller.data().env, external_id, validator_index)
                .ok_or_else(|| {
                    anyhow!("no report for external id {} from validator {}", external_id, validator_index)
                })?;
            charge(&mut caller, report.data.len())?;
            write_memory(&mut caller, ptr, &report.data)
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "save_result",
        |mut caller: Caller<'_, HostState>, ptr: i32, len: i32| -> Result<()> {
            require_mode(&caller, EntryPoint::Execute, "save_result")?;
            charge(&mut caller, to_len(len, "length")?)?;
            let bytes = read_memory(&mut caller, ptr, len)?;
            caller.data_mut().result.set(bytes);
            Ok(())
        },
    )?;

    Ok(())
}
