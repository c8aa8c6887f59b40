//! Scaffolding for exercising guest programs: a recording host double and
//! an assemble-and-run harness.

use crate::error::VmError;
use crate::host::Host;
use crate::interpreter::Interpreter;
use crate::memory::Vmem;
use crate::state::ProgramState;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One syscall observed by [`RecordingHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyscallRecord {
    /// Host syscall number after bridging.
    pub no: i64,
    /// Marshalled arguments as handed to the host.
    pub args: [u64; 4],
}

/// Host double that records every syscall and replays scripted return
/// values (0 once the script runs dry). Clones share the record and the
/// script, so forked guest threads report into the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Arc<Mutex<Vec<SyscallRecord>>>,
    returns: Arc<Mutex<VecDeque<i64>>>,
}

impl RecordingHost {
    /// Fresh host with an empty log and script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a return value for an upcoming syscall.
    pub fn script_return(&self, value: i64) {
        self.returns.lock().expect("script lock").push_back(value);
    }

    /// Syscalls observed so far.
    pub fn calls(&self) -> Vec<SyscallRecord> {
        self.calls.lock().expect("call lock").clone()
    }
}

impl Host for RecordingHost {
    fn syscall(&self, no: i64, args: [u64; 4]) -> i64 {
        self.calls
            .lock()
            .expect("call lock")
            .push(SyscallRecord { no, args });
        self.returns
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or(0)
    }
}

/// An interpreter over an assembled program, with its recording host kept
/// at hand.
#[derive(Debug)]
pub struct TestVm {
    /// The interpreter under test.
    pub vm: Interpreter<RecordingHost>,
    /// The host double wired into it.
    pub host: RecordingHost,
}

impl TestVm {
    /// VM over `program` with a fresh memory region.
    pub fn new(program: Vec<u8>) -> Self {
        let host = RecordingHost::new();
        let vm = Interpreter::new(Arc::new(Vmem::new()), program.into(), host.clone());
        Self { vm, host }
    }

    /// Run from VIP 0.
    pub fn run(&mut self) -> Result<ProgramState, VmError> {
        self.vm.run(0)
    }
}
