// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `--list`: print the extracted examples without building anything.

use super::Session;

pub fn cmd_list(session: &Session) {
    for example in &session.examples {
        println!("{}", example.key());
    }
}
