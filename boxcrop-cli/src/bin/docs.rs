#![allow(clippy::all)]
use clap::Parser;
use clap_markdown;

use boxcrop_cli::crop;

#[derive(Parser)]
#[command(name = "boxcrop", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    crop: crop::CropArgs,
}

fn main() {
    clap_markdown::print_help_markdown::<Cli>();
}
