// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use boxcrop_cli::crop;
use clap::Parser;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    crop: crop::CropArgs,
}

fn main() {
    let cli = Cli::parse();
    crop::crop(&cli.crop);
}
