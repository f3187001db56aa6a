extern crate colored;
use colored::*;

// hand-stacked block letters, one color per word
#[rustfmt::skip]
pub fn print_banner() {
    println!("{}{}", " _  __               ".red().bold(),   "  ___                          ".cyan().bold());
    println!("{}{}", "| |/ /__ _ _ _ __ _  ".red().bold(),   " / _ \\ _  _ ___ _  _ ___       ".cyan().bold());
    println!("{}{}", "| ' </ _` | '_/ _` | ".yellow().bold(), "| (_) | || / -_) || / -_)      ".blue().bold());
    println!("{}{}", "|_|\\_\\__,_|_| \\__,_| ".yellow().bold(), " \\__\\_\\\\_,_\\___|\\_,_\\___|      ".blue().bold());
    println!();
}
