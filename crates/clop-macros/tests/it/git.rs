use clop::{Clop, SubMain};

#[derive(Debug, Default, Clop)]
pub struct Git {
    #[clop("-d; --debug")]
    pub debug: bool,

    #[clop("version=v2.40.0")]
    pub version: (),

    /// Add file contents to the index
    #[clop("subcommand")]
    pub add: Add,

    /// Manage set of tracked repositories
    #[clop("subcommand")]
    pub remote: Remote,
}

#[derive(Debug, Default, Clop)]
#[clop(sub_main)]
pub struct Add {
    #[clop("-f; --force")]
    pub force: bool,

    #[clop("args=pathspec")]
    pub pathspec: Vec<String>,

    pub ran: bool,
}

impl SubMain for Add {
    fn sub_main(&mut self) {
        self.ran = true;
    }
}

#[derive(Debug, Default, Clop)]
#[clop(sub_main)]
pub struct Remote {
    #[clop("-v; --verbose")]
    pub verbose: bool,

    /// Add a remote named <name> for the repository at <url>
    #[clop("subcommand=add")]
    pub add_remote: RemoteAdd,

    pub ran: bool,
    pub saw_child: bool,
}

impl SubMain for Remote {
    fn sub_main(&mut self) {
        self.ran = true;
        self.saw_child = self.add_remote.ran;
    }
}

#[derive(Debug, Default, Clop)]
#[clop(sub_main)]
pub struct RemoteAdd {
    /// Track only the given branch
    #[clop("-t; --track; callback=track")]
    pub track: Vec<String>,

    #[clop("args=name")]
    pub name: String,

    #[clop("args=url")]
    pub url: String,

    pub ran: bool,
}

impl RemoteAdd {
    fn track(&mut self, branch: &str) {
        self.track.push(format!("refs/heads/{branch}"));
    }
}

impl SubMain for RemoteAdd {
    fn sub_main(&mut self) {
        self.ran = true;
    }
}
