// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Child processes with combined output, a deadline and cancellation.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::command::CommandLine;
use crate::error::RunError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// How long to keep reading output once the command's process group is gone.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Shared flag that stops the current and all following commands.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Exit status and interleaved stdout/stderr of a finished command.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub output: String,
}

type Buffer = Arc<Mutex<Vec<u8>>>;

/// Run `cmd` in `cwd` and wait for it, killing it on timeout or cancellation.
///
/// On Unix the command gets its own process group. Everything left in that
/// group is killed once the command ends, so processes it spawned cannot
/// hold the call past its deadline. A timeout too large to represent means
/// no deadline.
pub fn run_command(cmd: &CommandLine, cwd: &Path, timeout: Duration, cancel: &CancelToken) -> Result<CommandOutput, RunError> {
    let command = cmd.to_string();
    debug!("{}$ {}", cwd.display(), command);

    let mut builder = Command::new(cmd.program_path(cwd));
    builder
        .args(&cmd.args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    own_process_group(&mut builder);
    let mut child = builder
        .spawn()
        .map_err(|source| RunError::Spawn { command: command.clone(), source })?;

    let buffer: Buffer = Arc::new(Mutex::new(Vec::new()));
    let (done_tx, done_rx) = mpsc::channel::<()>();
    if let Some(stdout) = child.stdout.take() {
        drain(stdout, Arc::clone(&buffer), done_tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        drain(stderr, Arc::clone(&buffer), done_tx.clone());
    }
    drop(done_tx);

    let deadline = Instant::now().checked_add(timeout);
    let waited = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Ok(status),
            Ok(None) => {}
            Err(e) => break Err(RunError::io(cwd, e)),
        }
        if cancel.is_cancelled() {
            kill(&mut child, &command);
            break Err(RunError::Cancelled { command: command.clone(), output: String::new() });
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            kill(&mut child, &command);
            break Err(RunError::TimedOut { command: command.clone(), after: timeout, output: String::new() });
        }
        thread::sleep(POLL_INTERVAL);
    };
    kill_process_group(&child);

    // Readers finish once every holder of the pipes is gone. Anything that
    // escaped the process group is not waited for.
    let drain_until = Instant::now() + DRAIN_GRACE;
    loop {
        let left = drain_until.saturating_duration_since(Instant::now());
        match done_rx.recv_timeout(left) {
            Ok(()) => {}
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                warn!("`{}` left processes holding its output open, not waiting for them", command);
                break;
            }
        }
    }
    let output = {
        let bytes = buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    };

    match waited {
        Ok(status) => Ok(CommandOutput { status, output }),
        Err(RunError::Cancelled { command, .. }) => Err(RunError::Cancelled { command, output }),
        Err(RunError::TimedOut { command, after, .. }) => Err(RunError::TimedOut { command, after, output }),
        Err(e) => Err(e),
    }
}

/// Copy `source` into `buffer` until EOF. `done` is dropped when the thread ends.
fn drain(mut source: impl Read + Send + 'static, buffer: Buffer, done: Sender<()>) {
    thread::spawn(move || {
        let _done = done;
        let mut chunk = [0u8; 4096];
        loop {
            match source.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(n) => buffer
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend_from_slice(&chunk[..n]),
            }
        }
    });
}

fn kill(child: &mut Child, command: &str) {
    kill_process_group(child);
    if let Err(e) = child.kill() {
        warn!("failed to kill `{}`: {}", command, e);
    }
    let _ = child.wait();
}

#[cfg(unix)]
fn own_process_group(builder: &mut Command) {
    use std::os::unix::process::CommandExt;
    builder.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_builder: &mut Command) {}

/// SIGKILL every process left in the child's group. The group id is the
/// child's pid and stays reserved while any member is alive.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    let Ok(pgid) = libc::pid_t::try_from(child.id()) else {
        return;
    };
    // ESRCH just means the group is already empty.
    unsafe {
        libc::kill(-pgid, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}
