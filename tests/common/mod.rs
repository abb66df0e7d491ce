//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;

use wikijs_env::{ConfigPaths, Prompter, Result, Session, Settings, VaultError};
use zeroize::Zeroizing;

/// Replays queued answers; running dry is a prompt error.
#[derive(Debug, Default)]
pub struct Script {
    pub secrets: VecDeque<String>,
    pub confirms: VecDeque<bool>,
    pub inputs: VecDeque<String>,
}

impl Script {
    pub fn new(secrets: &[&str], confirms: &[bool]) -> Self {
        Self {
            secrets: secrets.iter().map(|s| s.to_string()).collect(),
            confirms: confirms.iter().copied().collect(),
            inputs: VecDeque::new(),
        }
    }
}

impl Prompter for Script {
    fn secret(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        self.secrets
            .pop_front()
            .map(Zeroizing::new)
            .ok_or_else(|| VaultError::Prompt(format!("unexpected prompt: {prompt}")))
    }

    fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool> {
        self.confirms
            .pop_front()
            .ok_or_else(|| VaultError::Prompt(format!("unexpected prompt: {prompt}")))
    }

    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        match self.inputs.pop_front() {
            Some(v) if v.is_empty() => Ok(default.unwrap_or_default().to_string()),
            Some(v) => Ok(v),
            None => Err(VaultError::Prompt(format!("unexpected prompt: {prompt}"))),
        }
    }
}

/// A session whose prompts are answered by `secrets` then `confirms`.
pub fn session(secrets: &[&str], confirms: &[bool]) -> Session {
    Session::new(Settings::default(), Box::new(Script::new(secrets, confirms)))
}

/// Default paths for `.env` inside `dir`.
pub fn paths_in(dir: &Path) -> ConfigPaths {
    ConfigPaths::new(&dir.join(".env"), &Settings::default())
}

/// File names in `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub const SAMPLE_ENV: &str = "WIKIJS_URL=https://wiki.example.com\n\
WIKIJS_API_KEY=abc123\n\
WIKIJS_GRAPHQL_ENDPOINT=/graphql\n\
DEBUG=false\n";
