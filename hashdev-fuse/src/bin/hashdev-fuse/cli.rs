use clap::Parser;
use hashdev::config::BUFF_SIZE;
use hashdev_fuse::Op;

#[derive(Parser)]
pub struct Cli {
    /// Minor number of the channel
    #[arg(long, short, default_value_t = 3)]
    pub minor: u32,

    /// Buffer capacity of every channel
    #[arg(long, short, default_value_t = BUFF_SIZE)]
    pub capacity: usize,

    /// Seed installed before the script runs
    #[arg(long, short)]
    pub seed: Option<u32>,

    /// open:r|w|rw|none, close, write:<text>, read:<n>, reset, restart, seed:<n>
    pub ops: Vec<Op>,
}
