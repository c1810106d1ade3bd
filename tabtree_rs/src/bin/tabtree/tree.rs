//! Frame definitions for the demo binary.

use std::fs;

use anyhow::{Context, bail};
use tabtree::inspect;
use tabtree::script::{self, Shell};
use tabtree::{Action, Frame, Registration, Registry};

pub const PROGRAM: &str = "tabtree";

pub const ROOT: Frame = Frame::new("root", root);
const ADD: Frame = Frame::new("add", add);
const CHECKOUT: Frame = Frame::new("checkout", checkout);
const COMMIT: Frame = Frame::new("commit", commit);
const COMPLETIONS: Frame = Frame::new("completions", completions);
const DEBUG: Frame = Frame::new("debug", debug);
const DESCRIBE: Frame = Frame::new("describe", describe);
const HELP: Frame = Frame::new("help", help);
const STASH: Frame = Frame::new("stash", stash);
const STATUS: Frame = Frame::new("status", status);

const BRANCHES: &[&str] = &[
    "main",
    "develop",
    "feature/login",
    "feature/search",
    "release/1.0",
];

const USAGE: &str = "tabtree - command tree dispatch and completion demo\n\n\
Commands:\n  \
  add <file>...          Stage files from the current directory\n  \
  checkout <branch>      Switch branches\n  \
  commit [-m msg]        Record changes\n  \
  stash [push|pop|list]  Shelve changes\n  \
  status [--short]       Show the working tree status\n  \
  describe [command]     Print a command's registry as JSON\n  \
  completions <shell>    Print the bash/zsh registration snippet\n  \
  help                   Show this message\n\n\
Enable completion:\n  \
  eval \"$(tabtree completions bash)\"\n";

fn root(reg: &mut Registry, _path: &[String]) {
    reg.register("add", Registration::new().next(ADD))
        .register("checkout", Registration::new().next(CHECKOUT))
        .register("commit", Registration::new().next(COMMIT))
        .register("completions", Registration::new().next(COMPLETIONS))
        .register("describe", Registration::new().next(DESCRIBE))
        .register("help", Registration::new().next(HELP))
        .register("stash", Registration::new().next(STASH))
        .register("status", Registration::new().next(STATUS))
        .register("debug", Registration::new().hidden().next(DEBUG));
}

// ============================================================================
// add: repeat mode over files in the working directory
// ============================================================================

fn add(reg: &mut Registry, path: &[String]) {
    for file in working_files() {
        // already named earlier on the line
        if path.iter().skip(1).any(|p| p == &file.to_lowercase()) {
            continue;
        }
        reg.register(&file, Registration::value(file.clone()).repeat().next(ADD));
    }
    reg.set_action(Action::new("add", run_add));
}

fn working_files() -> Vec<String> {
    let entries = match fs::read_dir(".") {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(error = %err, "cannot list working directory");
            return Vec::new();
        }
    };
    let mut files: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    files.sort();
    files
}

fn run_add(args: &[String]) -> anyhow::Result<()> {
    if args.is_empty() {
        bail!("nothing specified, nothing added");
    }
    for file in args {
        let meta = fs::metadata(file)
            .with_context(|| format!("pathspec '{file}' did not match any files"))?;
        println!("add '{file}' ({} bytes)", meta.len());
    }
    Ok(())
}

// ============================================================================
// checkout: value-like branch names
// ============================================================================

fn checkout(reg: &mut Registry, _path: &[String]) {
    for branch in BRANCHES {
        reg.register(branch, Registration::value(*branch));
    }
    reg.register("-b", Registration::new());
    reg.set_action(Action::new("checkout", run_checkout));
}

fn run_checkout(args: &[String]) -> anyhow::Result<()> {
    match args {
        [flag, name, ..] if flag == "-b" => println!("Switched to a new branch '{name}'"),
        [name, ..] if BRANCHES.contains(&name.as_str()) => {
            println!("Switched to branch '{name}'")
        }
        [name, ..] => bail!("pathspec '{name}' did not match any known branch"),
        [] => bail!("you must specify a branch to checkout"),
    }
    Ok(())
}

// ============================================================================
// commit / stash / status: keyword frames with terminal actions
// ============================================================================

fn commit(reg: &mut Registry, _path: &[String]) {
    reg.keyword("-m").keyword("--amend").keyword("--all");
    reg.set_action(Action::new("commit", run_commit));
}

fn run_commit(args: &[String]) -> anyhow::Result<()> {
    let message = args
        .iter()
        .position(|a| a == "-m")
        .and_then(|i| args.get(i + 1..))
        .map(|rest| rest.join(" "));
    match message {
        Some(message) if !message.is_empty() => println!("[main] {message}"),
        _ if args.iter().any(|a| a == "--amend") => println!("[main] (amended)"),
        _ => bail!("aborting commit due to empty commit message"),
    }
    Ok(())
}

fn stash(reg: &mut Registry, _path: &[String]) {
    reg.keyword("push").keyword("pop").keyword("list");
    reg.set_action(Action::new("stash", |args| {
        let sub = args.first().map(String::as_str).unwrap_or("push");
        println!("stash {sub}");
        Ok(())
    }));
}

fn status(reg: &mut Registry, _path: &[String]) {
    reg.keyword("--short");
    reg.set_action(Action::new("status", |args| {
        if args.iter().any(|a| a == "--short") {
            println!("## main");
        } else {
            println!("On branch main\nnothing to commit, working tree clean");
        }
        Ok(())
    }));
}

// ============================================================================
// tooling frames
// ============================================================================

fn completions(reg: &mut Registry, _path: &[String]) {
    for shell in Shell::ALL {
        reg.keyword(shell.name());
    }
    reg.set_action(Action::new("completions", |args| {
        let shell: Shell = args.first().map(String::as_str).unwrap_or("bash").parse()?;
        print!("{}", script::registration_script(shell, PROGRAM));
        Ok(())
    }));
}

fn describe(reg: &mut Registry, _path: &[String]) {
    for branch in ROOT.build(&[]).branches().filter(|b| !b.is_hidden()) {
        reg.keyword(branch.name());
    }
    reg.set_action(Action::new("describe", run_describe));
}

fn run_describe(args: &[String]) -> anyhow::Result<()> {
    let summary = match args.first() {
        None => inspect::describe(ROOT, &[]),
        Some(name) => {
            let root = ROOT.build(&[]);
            let Some(frame) = root.get(name).and_then(|b| b.next()) else {
                bail!("unknown command '{name}'");
            };
            inspect::describe(frame, std::slice::from_ref(name))
        }
    };
    println!("{}", summary.to_json_pretty()?);
    Ok(())
}

fn debug(reg: &mut Registry, _path: &[String]) {
    reg.set_action(Action::new("debug", |args| {
        println!("{args:?}");
        Ok(())
    }));
}

fn help(reg: &mut Registry, _path: &[String]) {
    reg.set_action(Action::new("help", |_args| {
        print!("{USAGE}");
        Ok(())
    }));
}
