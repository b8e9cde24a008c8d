use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();

    let (rom_path, config) = match sharpboy::parse_args(std::env::args().skip(1)) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("{err:#}\n\n{}", sharpboy::USAGE);
            std::process::exit(2);
        }
    };

    log::info!("Running ROM path: '{}'", rom_path.display());
    let rom = sharpboy::load_rom(&rom_path)?;
    let stats = sharpboy::run(&rom, &config)?;

    println!(
        "steps={} cycles={} stopped={}",
        stats.steps, stats.cycles, stats.stopped
    );
    Ok(())
}
