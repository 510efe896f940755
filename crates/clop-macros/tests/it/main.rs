mod cat;
mod git;
mod head;
mod server;

use std::fmt;

use clop::{Cli, Clop, Error};
use expect_test::{expect, Expect};

/// Binds against a fixed, almost empty environment so the host's variables
/// don't leak in.
fn bind<T: Clop + Default>(args: Vec<String>) -> clop::Result<T> {
    let mut res = T::default();
    Cli::new(args).env("CLOP_TEST", "1").try_bind(&mut res)?;
    Ok(res)
}

fn check<F, A>(f: F, args: &str, expect: Expect)
where
    F: FnOnce(Vec<String>) -> clop::Result<A>,
    A: fmt::Debug,
{
    let args = args.split_ascii_whitespace().map(String::from).collect::<Vec<_>>();
    let res = f(args);
    match res {
        Ok(args) => {
            expect.assert_debug_eq(&args);
        }
        Err(err) => {
            expect.assert_eq(&err.to_string());
        }
    }
}

fn err_text<A: fmt::Debug>(res: clop::Result<A>) -> String {
    res.unwrap_err().to_string()
}

#[test]
fn cat_bundles() {
    check(
        bind::<cat::Cat>,
        "-bEn a.txt b.txt",
        expect![[r#"
            Cat {
                number_nonblank: true,
                show_ends: true,
                number: true,
                squeeze_blank: false,
                show_tabs: false,
                files: [
                    "a.txt",
                    "b.txt",
                ],
            }
        "#]],
    );
    check(
        bind::<cat::Cat>,
        "--show-tabs -- -n",
        expect![[r#"
            Cat {
                number_nonblank: false,
                show_ends: false,
                number: false,
                squeeze_blank: false,
                show_tabs: true,
                files: [
                    "-n",
                ],
            }
        "#]],
    );
    check(
        bind::<cat::Cat>,
        "-bx",
        expect!["error: Found argument '-x' which wasn't expected, or isn't valid in this context"],
    );
}

#[test]
fn cat_suggestions() {
    assert_eq!(
        err_text(bind::<cat::Cat>(vec!["--num-nonblank".into()])),
        "error: Found argument '--num-nonblank' which wasn't expected, \
         or isn't valid in this context\n\tDid you mean --number-nonblank?"
    );
    assert_eq!(
        err_text(bind::<cat::Cat>(vec!["-number".into()])),
        "error: Found argument '-u' which wasn't expected, \
         or isn't valid in this context\n\tDid you mean --number?"
    );
}

#[test]
fn cat_priority() {
    let mut cat = cat::Cat::default();
    let outcome = Cli::new(["a.txt", "-Eb"]).try_bind(&mut cat).unwrap();
    assert!(outcome.index("E") < outcome.index("b"));
    assert_eq!(outcome.index("b"), outcome.index("--number-nonblank"));
    assert_eq!(outcome.index("n"), 0);
    assert!(outcome.index("files") < outcome.index("E"));
}

#[test]
fn merged_structs() {
    let (mut cat, mut verbosity) = (cat::Cat::default(), cat::Verbosity::default());
    Cli::new(["-vv", "-n", "a.txt", "--verbose"])
        .try_bind_all(&mut [&mut cat as &mut dyn Clop, &mut verbosity])
        .unwrap();
    assert!(cat.number);
    assert_eq!(cat.files, ["a.txt"]);
    assert_eq!(verbosity.verbose, [true, true, true]);

    let (mut cat, mut numbers) = (cat::Cat::default(), cat::LineNumbers::default());
    let res = Cli::new(["-n"]).try_bind_all(&mut [&mut cat as &mut dyn Clop, &mut numbers]);
    expect!["error: `-n` is already in use by `-n, --number`"].assert_eq(&err_text(res));
}

#[test]
fn head_values() {
    check(
        bind::<head::Head>,
        "",
        expect![[r#"
            Head {
                lines: 0,
                quiet: false,
                headers: [],
                offsets: [],
                timeout: 30s,
                labels: {
                    "env": "dev",
                },
                ports: [
                    8080,
                    8081,
                ],
                token: "",
                files: [],
            }
        "#]],
    );
    check(
        bind::<head::Head>,
        r#"-n 5 -H a b c -q --ports 1 --ports 2 --labels={"team":"core"} x.txt"#,
        expect![[r#"
            Head {
                lines: 5,
                quiet: true,
                headers: [
                    "a",
                    "b",
                    "c",
                ],
                offsets: [],
                timeout: 30s,
                labels: {
                    "team": "core",
                },
                ports: [
                    1,
                    2,
                ],
                token: "",
                files: [
                    "x.txt",
                ],
            }
        "#]],
    );
    check(
        bind::<head::Head>,
        "--offset -1 -2 3 --timeout 1m30s",
        expect![[r#"
            Head {
                lines: 0,
                quiet: false,
                headers: [],
                offsets: [
                    -1,
                    -2,
                    3,
                ],
                timeout: 90s,
                labels: {
                    "env": "dev",
                },
                ports: [
                    8080,
                    8081,
                ],
                token: "",
                files: [],
            }
        "#]],
    );
}

#[test]
fn head_failures() {
    check(
        bind::<head::Head>,
        "-n 5 --lines 6",
        expect!["error: The argument '--lines' was provided more than once, but cannot be used multiple times"],
    );
    check(
        bind::<head::Head>,
        "-n 5 --timeout",
        expect!["error: The argument '--timeout' requires a value but none was supplied"],
    );
    check(
        bind::<head::Head>,
        "--lines many",
        expect!["error: Invalid value 'many' for '--lines': invalid digit found in string"],
    );
    let res = bind::<head::Head>(vec!["--timeout".into(), "soon".into()]);
    assert!(matches!(res, Err(Error::InvalidValue { .. })));
}

#[test]
fn head_environment() {
    let mut head = head::Head::default();
    Cli::new(["a.txt"]).env("HEAD_TOKEN", "s3cr3t").try_bind(&mut head).unwrap();
    assert_eq!(head.token, "s3cr3t");

    let mut head = head::Head::default();
    Cli::new(["--token", "t"]).env("HEAD_TOKEN", "s3cr3t").try_bind(&mut head).unwrap();
    assert_eq!(head.token, "t");
}

#[test]
fn git_subcommands() {
    check(
        bind::<git::Git>,
        "add -f a.txt b.txt",
        expect![[r#"
            Git {
                debug: false,
                version: (),
                add: Add {
                    force: true,
                    pathspec: [
                        "a.txt",
                        "b.txt",
                    ],
                    ran: true,
                },
                remote: Remote {
                    verbose: false,
                    add_remote: RemoteAdd {
                        track: [],
                        name: "",
                        url: "",
                        ran: false,
                    },
                    ran: false,
                    saw_child: false,
                },
            }
        "#]],
    );
    check(
        bind::<git::Git>,
        "-d remote -v add -t main -t dev origin https://example.com/repo.git",
        expect![[r#"
            Git {
                debug: true,
                version: (),
                add: Add {
                    force: false,
                    pathspec: [],
                    ran: false,
                },
                remote: Remote {
                    verbose: true,
                    add_remote: RemoteAdd {
                        track: [
                            "refs/heads/main",
                            "refs/heads/dev",
                        ],
                        name: "origin",
                        url: "https://example.com/repo.git",
                        ran: true,
                    },
                    ran: true,
                    saw_child: true,
                },
            }
        "#]],
    );
}

#[test]
fn git_outcome() {
    let mut git = git::Git::default();
    let outcome = Cli::new(["remote", "add", "origin"]).try_bind(&mut git).unwrap();
    assert_eq!(outcome.subcommands(), ["remote", "add"]);
    assert!(outcome.is_set_subcommand("add"));
    assert_eq!(outcome.active_subcommand_field(), Some("remote"));

    let outcome = Cli::new(["-d"]).try_bind(&mut git::Git::default()).unwrap();
    assert!(outcome.subcommands().is_empty());
    assert_eq!(outcome.active_subcommand_field(), None);
}

#[test]
fn git_mistakes() {
    assert_eq!(
        err_text(bind::<git::Git>(vec!["ad".into()])),
        "error: Unknown subcommand 'ad'\n\tDid you mean add?"
    );
    assert_eq!(
        err_text(bind::<git::Git>(vec!["--add".into()])),
        "error: Found argument '--add' which wasn't expected, \
         or isn't valid in this context\n\tDid you mean 'add' subcommand?"
    );
}

#[derive(Debug, Default, Clop)]
struct Queue {
    #[clop("args=depth")]
    depth: u32,

    #[clop("subcommand=run")]
    run: git::Add,
}

#[test]
fn hooks_wait_for_the_whole_pass() {
    let mut queue = Queue::default();
    Cli::new(["3", "run", "a.txt"]).try_bind(&mut queue).unwrap();
    assert_eq!(queue.depth, 3);
    assert!(queue.run.ran);

    // `run` binds fine, then the root positional fails.
    let mut queue = Queue::default();
    let res = Cli::new(["x", "run", "a.txt"]).try_bind(&mut queue);
    expect!["error: Invalid value 'x' for '<depth>': invalid digit found in string"]
        .assert_eq(&err_text(res));
    assert_eq!(queue.run.pathspec, ["a.txt"]);
    assert!(!queue.run.ran);
}

#[test]
fn git_help_and_version() {
    check(bind::<git::Git>, "-V", expect!["v2.40.0"]);
    check(
        bind::<git::Git>,
        "remote -h",
        expect![[r#"
            Manage set of tracked repositories

            Usage:
                remote [Flags] <Subcommand>

            Flags:
                -v, --verbose

            Subcommand:
                add              Add a remote named <name> for the repository at <url>"#]],
    );

    let res = Cli::new(["--version"]).proc_name("git").try_bind(&mut git::Git::default());
    expect!["git v2.40.0"].assert_eq(&err_text(res));
}

#[test]
fn flattened_fields() {
    check(
        bind::<server::Server>,
        "",
        expect![[r#"
            Server {
                log: LogArgs {
                    level: "info",
                    filters: [],
                },
                port: 8080,
                limits: Json(
                    Limits {
                        max_conns: 100,
                        burst: 10,
                    },
                ),
            }
        "#]],
    );
    check(
        bind::<server::Server>,
        r#"-f a,b --filter c -p 9000 -l warn --limits={"burst":5,"max_conns":1}"#,
        expect![[r#"
            Server {
                log: LogArgs {
                    level: "warn",
                    filters: [
                        "a",
                        "b",
                        "c",
                    ],
                },
                port: 9000,
                limits: Json(
                    Limits {
                        max_conns: 1,
                        burst: 5,
                    },
                ),
            }
        "#]],
    );

    let mut server = server::Server::default();
    Cli::new(Vec::<String>::new()).env("LOG_LEVEL", "debug").try_bind(&mut server).unwrap();
    assert_eq!(server.log.level, "debug");
}

#[test]
fn server_help() {
    let res = Cli::new(["--help"])
        .proc_name("server")
        .version("v1.0.0")
        .try_bind(&mut server::Server::default());
    expect![[r#"
        v1.0.0

        Usage:
            server [Options]

        Options:
            --limits           Connection limits as JSON [default: {"max_conns": 100, "burst": 10}]
            -f, --filter       Comma separated target filters
            -l, --log-level    Minimum level to log [env: LOG_LEVEL] [default: info]
            -p, --port         Port to listen on [default: 8080]"#]]
    .assert_eq(&err_text(res));
}
