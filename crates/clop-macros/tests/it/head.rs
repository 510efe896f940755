use std::{collections::BTreeMap, path::PathBuf, time::Duration};

use clop::Clop;

#[derive(Debug, Default, Clop)]
pub struct Head {
    /// print the first NUM lines
    #[clop("-n; --lines; once")]
    pub lines: usize,

    #[clop("-q; --quiet")]
    pub quiet: bool,

    /// extra headers, up to the next option
    #[clop("-H; --header; greedy")]
    pub headers: Vec<String>,

    #[clop("--offset; greedy")]
    pub offsets: Vec<i64>,

    #[clop("--timeout", default = "30s")]
    pub timeout: Duration,

    #[clop("--labels", default = r#"{"env": "dev"}"#)]
    pub labels: BTreeMap<String, String>,

    #[clop("--ports", default = "[8080, 8081]")]
    pub ports: Vec<u16>,

    #[clop("--token; env=HEAD_TOKEN")]
    pub token: String,

    #[clop("args=files")]
    pub files: Vec<PathBuf>,
}
