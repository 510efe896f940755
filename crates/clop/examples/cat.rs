use std::path::PathBuf;

use clop::Clop;

#[derive(Debug, Default, Clop)]
struct Cat {
    #[clop("version=v0.1.0")]
    version: (),

    /// number nonempty output lines, overrides -n
    #[clop("-b; --number-nonblank")]
    number_nonblank: bool,

    /// number all output lines
    #[clop("-n; --number")]
    number: bool,

    /// display $ at end of each line
    #[clop("-E; --show-ends")]
    show_ends: bool,

    #[clop("args=files")]
    files: Vec<PathBuf>,
}

fn main() {
    let mut cat = Cat::default();
    let outcome = clop::Cli::from_env().bind(&mut cat).unwrap_or_else(|err| err.exit());

    // `-n -b` and `-b -n` both end with the later one winning.
    let numbered = if outcome.index("b") > outcome.index("n") {
        "nonblank"
    } else if cat.number {
        "all"
    } else {
        "none"
    };
    println!("numbering: {numbered}, show ends: {}", cat.show_ends);
    for file in &cat.files {
        println!("{}", file.display());
    }
}
