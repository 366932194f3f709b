// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use chrono;
use colored::*;

/// A log prefix with a standardized timestamp for tracking time
pub fn progress_timestamp(desc: &str) -> String {
    let time = chrono::Local::now();
    let ymd = time.format("%Y-%m-%d").to_string();
    let hms = time.format("%H:%M:%S").to_string();
    let time = format!("{} | {}", ymd, hms);

    format!(
        "{} {} {} {} {} {}",
        "[".bold(),
        time,
        "|".bold(),
        "boxcrop".truecolor(214, 128, 52).bold(),
        "]".bold(),
        desc,
    )
}

/// Print timestamped statements to console
pub fn progress_log(desc: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("{}", progress_timestamp(desc));
}

/// Format numbers to readable thousands format
pub fn thousands_format<T>(number: T) -> String
where
    T: std::fmt::Display,
{
    let number = number.to_string();
    if number.len() <= 4 {
        return number;
    }

    let digits: Vec<char> = number.chars().collect();
    digits
        .rchunks(3)
        .rev()
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join(",")
}
