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

//! switchhal - sysfs hardware abstraction for network switch platforms
//!
//! The binary loads a JSON platform layout, builds the device inventory
//! through `hal-core`, and reports or drives it from the command line.

pub mod cli;
pub mod layout;
pub mod logger;
