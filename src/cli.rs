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

//! Command line interface

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use hal_core::{
    capture_snapshot, snapshot_to_json, snapshot_to_json_compact, HalConfig, HalContext, Inventory,
};
use tracing::{info, warn};

use crate::layout::PlatformLayout;

#[derive(Parser)]
#[command(name = "switchhal")]
#[command(version)]
#[command(about = "Inspect and drive network switch platform hardware through sysfs")]
#[command(long_about = "Inspect and drive network switch platform hardware through sysfs

EXAMPLES:
    switchhal snapshot --layout /etc/switchhal/layout.json
    switchhal --simulate snapshot --layout layout.json --compact
    switchhal fan-speed --layout layout.json --fan 2 --percent 60
    switchhal refresh-thresholds --layout layout.json

ENVIRONMENT VARIABLES:
    RUST_LOG=debug         Enable debug logging
    SWITCHHAL_CONFIG=FILE  Configuration file (default /etc/switchhal/config.json)")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file, overriding SWITCHHAL_CONFIG
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Simulate all hardware access
    #[arg(long, global = true)]
    pub simulate: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every reading of the platform as JSON
    Snapshot {
        #[arg(long)]
        layout: PathBuf,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Set one fan's speed in percent
    FanSpeed {
        #[arg(long)]
        layout: PathBuf,
        #[arg(long)]
        fan: u32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
        percent: u32,
    },
    /// Push configured thresholds to every temperature sensor
    RefreshThresholds {
        #[arg(long)]
        layout: PathBuf,
    },
}

/// Config from `--config` or the default location, with `--simulate` applied
pub fn load_config(cli: &Cli) -> anyhow::Result<HalConfig> {
    let mut config = match &cli.config {
        Some(path) => HalConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => HalConfig::load().context("Failed to load config")?,
    };
    if cli.simulate {
        config.simulation = true;
    }
    Ok(config)
}

fn load_inventory(ctx: &Arc<HalContext>, layout: &Path) -> anyhow::Result<Inventory> {
    let layout = PlatformLayout::load(layout)
        .with_context(|| format!("Failed to load layout {}", layout.display()))?;
    Ok(layout.build(ctx)?)
}

pub fn run_cli(cli: &Cli) -> anyhow::Result<()> {
    let ctx = HalContext::new(load_config(cli)?);
    if ctx.in_simulation() {
        info!("Simulation mode: no hardware will be touched");
    }

    match &cli.command {
        Commands::Snapshot { layout, compact } => {
            let inventory = load_inventory(&ctx, layout)?;
            let snapshot = capture_snapshot(&inventory);
            let json = if *compact {
                snapshot_to_json_compact(&snapshot)?
            } else {
                snapshot_to_json(&snapshot)?
            };
            println!("{}", json);
        }
        Commands::FanSpeed {
            layout,
            fan,
            percent,
        } => {
            let inventory = load_inventory(&ctx, layout)?;
            let Some(target) = inventory.fan(*fan) else {
                bail!("No fan with id {} in layout", fan);
            };
            if !target.set_speed(*percent) {
                bail!("Failed to set {} speed", target.name());
            }
            println!("{} speed set to {}%", target.name(), percent);
        }
        Commands::RefreshThresholds { layout } => {
            let inventory = load_inventory(&ctx, layout)?;
            let mut written = 0;
            for temp in &inventory.temps {
                let count = temp.refresh_hardware_thresholds();
                if count == 0 {
                    warn!(sensor = %temp.name(), "No thresholds written");
                }
                written += count;
            }
            println!(
                "Wrote {} thresholds to {} sensors",
                written,
                inventory.temps.len()
            );
        }
    }
    Ok(())
}
