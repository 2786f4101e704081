/*
 * This file is part of switchhal.
 *
 * Copyright (C) 2025 switchhal contributors
 *
 * switchhal is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * switchhal is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with switchhal. If not, see <https://www.gnu.org/licenses/>.
 */

//! tracing subscriber setup for the CLI
//!
//! Logs go to stderr so snapshot JSON on stdout stays machine readable.

use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "info";

/// Filter directive for a `-v` count. Zero defers to `RUST_LOG`.
pub fn level_for(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

fn build_filter(verbose: u8) -> EnvFilter {
    match level_for(verbose) {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)),
    }
}

pub fn init_logging(verbose: u8) {
    let result = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(build_filter(verbose))
        .try_init();
    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}
