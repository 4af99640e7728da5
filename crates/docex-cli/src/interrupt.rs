// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Ctrl-C cancels the sweep.
//!
//! Commands run in their own process groups, so the terminal's SIGINT only
//! reaches docex. The runner then kills the running command's group and
//! the sweep stops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use docex_runner::CancelToken;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_interrupt(_signal: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Cancel `token` when SIGINT arrives.
pub fn cancel_on_interrupt(token: CancelToken) {
    let handler = on_interrupt as extern "C" fn(libc::c_int);
    unsafe {
        libc::signal(libc::SIGINT, handler as libc::sighandler_t);
    }
    thread::spawn(move || {
        while !INTERRUPTED.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(50));
        }
        token.cancel();
    });
}
