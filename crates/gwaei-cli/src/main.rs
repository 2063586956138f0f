use std::env;
use std::path::PathBuf;

use clap::Parser;
use gwaei_config::Preferences;
use gwaei_core::{DictionaryRegistry, OutputTarget, SearchError};
use gwaei_search::{Query, SearchSession};

mod console;

use self::console::ConsoleSink;

#[derive(Parser)]
#[command(name = "gwaei", version, about = "Japanese-English dictionary search")]
struct Cli {
    /// Dictionary to search (defaults to the first installed one)
    #[arg(short = 'd', long = "dictionary", value_name = "NAME")]
    dictionary: Option<String>,

    /// Only show exactly matching results
    #[arg(short = 'e', long = "exact")]
    exact: bool,

    /// Suppress informational output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// List installed dictionaries and exit
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// The search query
    #[arg(value_name = "QUERY", trailing_var_arg = true)]
    query: Vec<String>,
}

fn dictionary_directory() -> PathBuf {
    env::var("GWAEI_DICTIONARY_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".gwaei").join("dictionaries")
        })
}

fn locale_is_japanese() -> bool {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .next()
        .map(|locale| locale.starts_with("ja"))
        .unwrap_or(false)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let directory = dictionary_directory();
    let registry = DictionaryRegistry::from_directory(&directory).map_err(|e| {
        anyhow::anyhow!(
            "could not read the dictionary directory {}: {}",
            directory.display(),
            e
        )
    })?;

    if cli.list {
        for dictionary in registry.iter() {
            println!(
                "{}\t{:?}\t{} lines",
                dictionary.name(),
                dictionary.kind(),
                dictionary.total_lines()
            );
        }
        return Ok(());
    }

    let dictionary = match &cli.dictionary {
        Some(name) => registry
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("no dictionary named {:?} is installed", name))?,
        None => registry
            .first()
            .ok_or_else(|| anyhow::anyhow!("no dictionaries are installed"))?,
    };

    let raw_query = cli.query.join(" ");

    let mut prefs = Preferences::new();
    if cli.exact {
        prefs.show_less_relevant = false;
    }

    let query = match Query::build(&raw_query, dictionary.kind(), &prefs, locale_is_japanese()) {
        Ok(query) => query,
        Err(SearchError::EmptyQuery) => {
            println!("No results found!");
            return Ok(());
        }
        Err(e) => {
            tracing::debug!("Query construction failed: {}", e);
            println!("Your query could not be understood.");
            println!("Check that parentheses, braces and quoting are balanced.");
            return Ok(());
        }
    };

    let mut session = SearchSession::new(dictionary, query, OutputTarget::Console, prefs);
    let mut sink = ConsoleSink::new(cli.quiet);

    session.start(&mut sink)?;
    session.run_to_completion(&mut sink);

    if session.total_results() > 0 && !cli.quiet {
        println!(
            "\n{} results found ({} relevant)",
            session.total_results(),
            session.relevant_count()
        );
    }

    Ok(())
}
