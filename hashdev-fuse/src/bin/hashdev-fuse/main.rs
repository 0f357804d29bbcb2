mod cli;

use std::io;

use clap::Parser;
use cli::Cli;
use hashdev::config::DEVICE_NAME;
use hashdev::Device;
use hashdev_fuse::Driver;

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    println!(
        "device={DEVICE_NAME}\nminor={}\ncapacity={}",
        cli.minor, cli.capacity
    );

    let dev = Device::with_capacity(cli.capacity);
    let mut driver = Driver::new(&dev, cli.minor);
    if let Some(seed) = cli.seed {
        driver
            .install_seed(seed)
            .map_err(|err| io::Error::other(err.to_string()))?;
    }

    let ops = if cli.ops.is_empty() {
        hashdev_fuse::default_script()
    } else {
        cli.ops
    };
    let report = driver.run(&ops, &mut io::stdout().lock())?;
    log::info!("report={report:?}");

    if report.mismatches > 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} frames failed verification", report.mismatches),
        ));
    }

    Ok(())
}
