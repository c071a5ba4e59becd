// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

#[macro_use]
extern crate quicli;

extern crate itertools;
extern crate lexor;

use std::path::{Path, PathBuf};

use itertools::Itertools;
use lexor::{compile, Automaton, Config};
use quicli::fs;
use quicli::prelude::*;

/// Compile lexer specifications and report the size of each automaton.
#[derive(Debug, StructOpt)]
struct Cli {
    /// Specification files to compile.
    #[structopt(parse(from_os_str))]
    files: Vec<PathBuf>,

    /// Maximum number of DFA states.
    #[structopt(long = "dfa-max")]
    dfa_max: Option<usize>,

    /// Number of character codes in the transition table.
    #[structopt(long = "alphabet")]
    alphabet: Option<usize>,

    /// Maximum macro expansion depth.
    #[structopt(long = "macro-depth")]
    macro_depth: Option<usize>,

    /// Maximum number of NFA nodes, unbounded if not present.
    #[structopt(long = "nfa-max")]
    nfa_max: Option<usize>,

    /// Pass many times for more log output.
    #[structopt(long = "verbose", short = "v", parse(from_occurrences))]
    verbosity: u8,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::new();
        if let Some(dfa_max) = self.dfa_max {
            config = config.dfa_max(dfa_max);
        }
        if let Some(alphabet) = self.alphabet {
            config = config.alphabet_size(alphabet);
        }
        if let Some(macro_depth) = self.macro_depth {
            config = config.macro_depth(macro_depth);
        }
        if let Some(nfa_max) = self.nfa_max {
            config = config.nfa_max(nfa_max);
        }
        config
    }
}

main!(|args: Cli, log_level: verbosity| {
    if args.files.is_empty() {
        bail!("no specification files given");
    }

    let config = args.config();
    debug!("{:?}", config);

    let summaries = args
        .files
        .iter()
        .map(|path| compile_file(path, &config))
        .fold_results(Vec::new(), |mut acc, summary| {
            acc.push(summary);
            acc
        })?;

    info!("compiled {} specifications", summaries.len());
    println!("{}", summaries.iter().join("\n"));
});

struct Summary {
    file: String,
    automaton: Automaton,
}

impl ::std::fmt::Display for Summary {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        let accepting = self
            .automaton
            .minimized()
            .accepts()
            .iter()
            .filter(|a| a.is_some())
            .count();

        write!(
            f,
            "{}: {} rules, {} NFA nodes, {} DFA states, {} minimized ({} accepting)",
            self.file,
            self.automaton.rules(),
            self.automaton.nfa().len(),
            self.automaton.dfa().len(),
            self.automaton.minimized().len(),
            accepting
        )
    }
}

fn compile_file(path: &Path, config: &Config) -> Result<Summary> {
    let source = fs::read_file(path)?;

    match compile(&source, config) {
        Ok(automaton) => {
            let summary = Summary {
                file: path.display().to_string(),
                automaton,
            };
            info!("{}", summary);
            Ok(summary)
        }
        Err(err) => bail!("{}: {}", path.display(), err),
    }
}
