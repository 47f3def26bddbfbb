//
// nrfboards: board descriptors for nRF52 based boards
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//

//! Board descriptor tool.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Target;
use log::LevelFilter;
use nrfboards::{Descriptor, Function};

/// Board descriptor tool.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Opts {
    /// Log level.
    #[arg(short, long, default_value_t = LevelFilter::Info, env = "NRFBOARDS_LOG")]
    level: LevelFilter,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Lists known boards.
    List,
    /// Prints the descriptor of a board as TOML.
    Show {
        /// Board identifier.
        board: String,
    },
    /// Prints the pin table of a board.
    Pins {
        /// Board identifier.
        board: String,
        /// Only pins carrying this marker, e.g. ADC1_IN0 or NEGATED.
        #[arg(short, long)]
        function: Option<Function>,
    },
    /// Validates boards.
    Check {
        /// Board identifiers; all boards if omitted.
        boards: Vec<String>,
    },
    /// Prints the firmware file name of a board.
    Binary {
        /// Board identifier.
        board: String,
        /// Firmware version, e.g. 2v20.
        version: String,
    },
}

fn load(board: &str) -> Result<Descriptor> {
    nrfboards::load(board).with_context(|| format!("cannot load board {board}"))
}

fn list() -> Result<()> {
    for (id, res) in nrfboards::load_all() {
        match res {
            Ok(desc) => println!("{id:<20} {}", desc.info.name),
            Err(err) => println!("{id:<20} ({err})"),
        }
    }
    Ok(())
}

fn pins(desc: &Descriptor, function: Option<Function>) {
    for pin in desc.pins.iter().filter(|p| function.map_or(true, |f| p.has(f))) {
        let markers: Vec<_> = pin.functions().map(|f| f.to_string()).collect();
        println!("{:<4} {}", pin.name(), markers.join(" "));
    }
}

fn check(boards: &[String]) -> Result<()> {
    let results: Vec<_> = if boards.is_empty() {
        nrfboards::load_all().into_iter().map(|(id, res)| (id.to_string(), res)).collect()
    } else {
        boards.iter().map(|id| (id.clone(), nrfboards::load(id))).collect()
    };

    let mut failed = 0;
    for (id, res) in &results {
        match res {
            Ok(desc) => log::info!(
                "{id}: ok, {} pins, {} devices, {} KB available",
                desc.pins.len(),
                desc.devices.len(),
                desc.chip.saved_code.flash_available
            ),
            Err(err) => {
                log::error!("{id}: {err}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} boards failed validation", results.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    env_logger::builder().target(Target::Stderr).filter_level(opts.level).init();

    match opts.cmd {
        Cmd::List => list()?,
        Cmd::Show { board } => {
            let desc = load(&board)?;
            print!("{}", toml::to_string(&desc).context("cannot serialize descriptor")?);
        }
        Cmd::Pins { board, function } => pins(&load(&board)?, function),
        Cmd::Check { boards } => check(&boards)?,
        Cmd::Binary { board, version } => println!("{}", load(&board)?.binary_name(&version)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pins_filter_parses_marker() {
        let opts = Opts::try_parse_from(["nrfboards-gen", "pins", "XENON", "--function", "ADC1_IN4"]).unwrap();
        assert!(matches!(opts.cmd, Cmd::Pins { function: Some(Function::Adc1In(4)), .. }));

        assert!(Opts::try_parse_from(["nrfboards-gen", "pins", "XENON", "-f", "ADC9"]).is_err());
    }
}
