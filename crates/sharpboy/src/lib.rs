use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use sharpboy_cpu::{BreakAction, Machine, RunStats};
use typed_builder::TypedBuilder;

pub use sharpboy_cpu;

/// Step budget used when `--steps` is not given.
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

pub const USAGE: &str = "usage: sharpboy <rom> [--steps N] [--break ADDR]... [--single-step]\n\
     \n\
     ADDR is hexadecimal, with or without a 0x or $ prefix.";

/// Options for one run of the machine.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct RunConfig {
    #[builder(default = DEFAULT_MAX_STEPS)]
    pub max_steps: u64,
    /// Addresses that pause execution when reached.
    #[builder(default)]
    pub breakpoints: Vec<u16>,
    #[builder(default = false)]
    pub single_step: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Parse a 16-bit address written in hex (`0150`, `0x0150` or `$0150`).
pub fn parse_address(text: &str) -> Result<u16> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix('$'))
        .unwrap_or(text);
    u16::from_str_radix(digits, 16).with_context(|| format!("invalid address '{text}'"))
}

/// Parse the arguments that follow the program name.
pub fn parse_args<I>(args: I) -> Result<(PathBuf, RunConfig)>
where
    I: IntoIterator<Item = String>,
{
    let mut rom_path = None;
    let mut max_steps = DEFAULT_MAX_STEPS;
    let mut breakpoints = Vec::new();
    let mut single_step = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--steps" => {
                let value = args.next().context("--steps needs a value")?;
                max_steps = value
                    .parse()
                    .with_context(|| format!("invalid step count '{value}'"))?;
            }
            "--break" => {
                let value = args.next().context("--break needs an address")?;
                breakpoints.push(parse_address(&value)?);
            }
            "--single-step" => single_step = true,
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'"),
            other if rom_path.is_some() => bail!("unexpected argument '{other}'"),
            other => rom_path = Some(PathBuf::from(other)),
        }
    }

    let rom_path = rom_path.context("no ROM path provided")?;
    let config = RunConfig::builder()
        .max_steps(max_steps)
        .breakpoints(breakpoints)
        .single_step(single_step)
        .build();
    Ok((rom_path, config))
}

pub fn load_rom(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read ROM file '{}'", path.display()))
}

/// Run `rom` on a fresh machine until it stops or the step budget runs out.
///
/// Breakpoints log the CPU state and then pause on stdin.
pub fn run(rom: &[u8], config: &RunConfig) -> Result<RunStats> {
    let mut machine = Machine::new();
    machine.load_rom(rom);
    machine.cpu.set_single_step(config.single_step);

    for &addr in &config.breakpoints {
        machine.cpu.register_breakpoint(addr, move |hit| {
            log::info!(
                "breakpoint 0x{addr:04X}: opcode 0x{:02X} cycles={} {}",
                hit.opcode,
                hit.cycles,
                hit.regs
            );
            BreakAction::Pause
        });
    }

    let stats = machine.run(config.max_steps).with_context(|| {
        format!(
            "CPU error after {} cycles ({})",
            machine.cpu.cycles(),
            machine.cpu.regs
        )
    })?;

    log::info!(
        "ran {} steps, {} cycles{}",
        stats.steps,
        stats.cycles,
        if stats.stopped { ", stopped by the program" } else { "" }
    );
    Ok(stats)
}
