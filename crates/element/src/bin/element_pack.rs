//! `element-pack`: encode JSON text (stdin) as a binary document (stdout).
//!
//! Usage:
//!   element-pack

use std::io::{self, Read, Write};

use doc_element::cli::pack;

fn main() {
    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match pack(&buf) {
        Ok(bytes) => {
            if let Err(e) = io::stdout().write_all(&bytes) {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
