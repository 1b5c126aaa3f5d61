use clap::Parser;
use wavelet_spectrogram::{args::SpectrogramCli, binary_logic};

fn main() -> anyhow::Result<()> {
    // Handle commandline arguments.
    let opt = SpectrogramCli::parse();
    binary_logic::run(opt)
}
