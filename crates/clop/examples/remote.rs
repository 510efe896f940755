use clop::{Clop, SubMain};

#[derive(Debug, Default, Clop)]
struct Git {
    #[clop("-C; env=GIT_DIR")]
    dir: String,

    /// Manage set of tracked repositories
    #[clop("subcommand")]
    remote: Remote,
}

#[derive(Debug, Default, Clop)]
#[clop(sub_main)]
struct Remote {
    /// Remote name
    #[clop("args=name")]
    name: String,

    /// Branches to track, until the next option
    #[clop("-t; --track; greedy")]
    track: Vec<String>,
}

impl SubMain for Remote {
    fn sub_main(&mut self) {
        println!("remote {} tracking {:?}", self.name, self.track);
    }
}

fn main() {
    let git = Git::from_env_or_exit();
    if !git.dir.is_empty() {
        println!("in {}", git.dir);
    }
}
