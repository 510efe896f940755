use clop::Clop;

#[derive(Debug, Default, Clop)]
pub struct Cat {
    /// number nonempty output lines, overrides -n
    #[clop("-b; --number-nonblank")]
    pub number_nonblank: bool,

    /// display $ at end of each line
    #[clop("-E; --show-ends")]
    pub show_ends: bool,

    /// number all output lines
    #[clop("-n; --number")]
    pub number: bool,

    /// suppress repeated empty output lines
    #[clop("-s; --squeeze-blank")]
    pub squeeze_blank: bool,

    /// display TAB characters as ^I
    #[clop("-T; --show-tabs")]
    pub show_tabs: bool,

    #[clop("args=files")]
    pub files: Vec<String>,
}

#[derive(Debug, Default, Clop)]
pub struct Verbosity {
    #[clop]
    pub verbose: Vec<bool>,
}

#[derive(Debug, Default, Clop)]
pub struct LineNumbers {
    #[clop("-n")]
    pub start: u32,
}
