use std::{fs, io, path::Path, path::PathBuf, time::Duration};

use bias::{Group, GroupError, GroupPair, PipelineOptions, DEFAULT_BOOTSTRAP_ROUNDS};
use serde_derive::{Deserialize, Serialize};
use text::KeywordSet;
use thiserror::Error;

use crate::utils::get_config_location;

pub const DEFAULT_CONFIG: &str = r#"# Group A is the first group, group B the second.
# Positive scores mean the sentiment in an article favors group B.

[general]
input = "news_articles_corpus.csv"
output = "news_articles_corpus_withSB.csv"
separator = "."
concurrency = 8

[columns]
url = "url"
outlet = "outlet"
body = "body"

[groups]
allow_overlap = false

[groups.a]
name = "FF"
keywords = ["cristina", "fernandez", "alberto", "kirchner"]

[groups.b]
name = "MP"
keywords = ["macri", "pichetto", "mauricio"]

[classifier]
# Receives one term on stdin and prints POS, NEG or NEU.
command = "sentiment-classify"
args = []
timeout_ms = 5000
cache = true

[corpus]
dedupe = false
bootstrap_rounds = 10000
"#;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no config directory available on this platform")]
    NoConfigDir,
    #[error("could not read config file {0:?}")]
    Read(PathBuf, #[source] io::Error),
    #[error("could not write config file {0:?}")]
    Write(PathBuf, #[source] io::Error),
    #[error("invalid config")]
    Parse(#[from] toml::de::Error),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct General {
    pub input: String,
    pub output: String,
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Columns {
    pub url: String,
    pub outlet: String,
    pub body: String,
}

impl Default for Columns {
    fn default() -> Self {
        Columns {
            url: String::from("url"),
            outlet: String::from("outlet"),
            body: String::from("body"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GroupConfig {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Groups {
    pub a: GroupConfig,
    pub b: GroupConfig,
    #[serde(default)]
    pub allow_overlap: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Classifier {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_true")]
    pub cache: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Corpus {
    #[serde(default)]
    pub dedupe: bool,
    #[serde(default = "default_bootstrap_rounds")]
    pub bootstrap_rounds: usize,
}

impl Default for Corpus {
    fn default() -> Self {
        Corpus {
            dedupe: false,
            bootstrap_rounds: DEFAULT_BOOTSTRAP_ROUNDS,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub general: General,
    #[serde(default)]
    pub columns: Columns,
    pub groups: Groups,
    pub classifier: Classifier,
    #[serde(default)]
    pub corpus: Corpus,
}

impl Config {
    /// Normalizes both keyword lists and pairs the groups, rejecting shared keywords unless
    /// `allow_overlap` is set.
    pub fn group_pair(&self) -> Result<GroupPair, GroupError> {
        let a = to_group(&self.groups.a);
        let b = to_group(&self.groups.b);
        if self.groups.allow_overlap {
            Ok(GroupPair::allowing_overlap(a, b))
        } else {
            GroupPair::new(a, b)
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        let term_timeout = if self.classifier.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.classifier.timeout_ms))
        };
        PipelineOptions {
            separator: self.general.separator.clone(),
            concurrency: self.general.concurrency,
            term_timeout,
        }
    }
}

fn to_group(group: &GroupConfig) -> Group {
    Group::new(group.name.clone(), KeywordSet::normalized(&group.keywords))
}

fn default_separator() -> String {
    String::from(".")
}

fn default_concurrency() -> usize {
    8
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_bootstrap_rounds() -> usize {
    DEFAULT_BOOTSTRAP_ROUNDS
}

pub fn parse_config(raw: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(raw)?)
}

pub fn read_config(file: &Path) -> Result<Config, ConfigError> {
    let raw = fs::read_to_string(file).map_err(|e| ConfigError::Read(file.to_owned(), e))?;
    parse_config(&raw)
}

/// Writes the default config to the platform config directory unless one exists already.
/// Returns the config file location.
pub fn write_config() -> Result<PathBuf, ConfigError> {
    let (dir, file) = get_config_location().ok_or(ConfigError::NoConfigDir)?;
    if !file.exists() {
        fs::create_dir_all(&dir).map_err(|e| ConfigError::Write(dir.clone(), e))?;
        fs::write(&file, DEFAULT_CONFIG).map_err(|e| ConfigError::Write(file.clone(), e))?;
    }
    Ok(file)
}
