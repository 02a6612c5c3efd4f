//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`
//! and serves `static/` locally.

use std::env;
use std::process::{Command, ExitCode, Stdio};

const DEFAULT_PORT: u16 = 8000;

fn main() -> ExitCode {
    let port = match env::var("SKETCH_PORT") {
        Ok(raw) => match raw.parse::<u16>() {
            Ok(p) => p,
            Err(_) => {
                eprintln!("SKETCH_PORT must be a port number, got `{raw}`");
                return ExitCode::FAILURE;
            }
        },
        Err(_) => DEFAULT_PORT,
    };

    // 1. Compile the sketch via wasm-pack into static/pkg
    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack build failed");
            return ExitCode::FAILURE;
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH; serving existing artifacts");
        }
    }

    // 2. Serve `static/` until interrupted
    println!("Serving sketch at http://127.0.0.1:{port} …");
    let port_arg = port.to_string();
    let server = Command::new("python3")
        .args(["-m", "http.server", &port_arg, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status();

    match server {
        Ok(st) if st.success() => ExitCode::SUCCESS,
        Ok(st) => {
            eprintln!("http server exited with {st}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("failed to start http server: {err}");
            ExitCode::FAILURE
        }
    }
}
