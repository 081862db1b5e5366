//! `element-unpack`: decode a binary document or JSON text (stdin) and print
//! it as JSON text (stdout).
//!
//! Usage:
//!   element-unpack [--pretty] [--fingerprint]

use std::io::{self, Read, Write};

use doc_element::cli::{unpack, unpack_output};

fn main() {
    let output = match unpack_output(std::env::args().skip(1)) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let mut buf = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match unpack(&buf, output) {
        Ok(text) => {
            if let Err(e) = writeln!(io::stdout(), "{text}") {
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
