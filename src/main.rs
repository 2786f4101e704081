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

use clap::Parser;
use tracing::error;

use switchhal::cli::{run_cli, Cli};
use switchhal::logger::init_logging;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run_cli(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
