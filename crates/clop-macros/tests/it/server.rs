use clop::{Clop, Json};
use serde::Deserialize;

#[derive(Debug, Default, Clop)]
pub struct Server {
    #[clop("flatten")]
    pub log: LogArgs,

    /// Port to listen on
    #[clop("-p; --port", default = "8080")]
    pub port: u16,

    /// Connection limits as JSON
    #[clop("--limits", default = r#"{"max_conns": 100, "burst": 10}"#)]
    pub limits: Json<Limits>,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
pub struct Limits {
    pub max_conns: u32,
    pub burst: u32,
}

#[derive(Debug, Default, Clop)]
pub struct LogArgs {
    /// Minimum level to log
    #[clop("-l; --log-level; env=LOG_LEVEL", default = "info")]
    pub level: String,

    /// Comma separated target filters
    #[clop("-f; --filter; callback=filter")]
    pub filters: Vec<String>,
}

impl LogArgs {
    fn filter(&mut self, value: &str) {
        self.filters.extend(value.split(',').map(str::to_string));
    }
}
