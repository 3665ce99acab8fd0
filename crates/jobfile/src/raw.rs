// SPDX-License-Identifier: MIT

//! Wire shape of a `.job` file. Deliberately permissive — validation and
//! defaulting happen in [`crate::validate`], not here, so decode errors
//! stay limited to "this isn't even shaped like a job file".

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RawTask {
    pub name: Option<String>,
    pub cmd: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub retries: i64,
    #[serde(default)]
    pub timeout: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawJobFile {
    pub title: Option<String>,
    #[serde(default)]
    pub cron: String,
    #[serde(default)]
    pub retries: i64,
    #[serde(default)]
    pub task_timeout: i64,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub order: Option<Vec<Vec<String>>>,
    #[serde(default, rename = "tasks")]
    pub tasks: Vec<RawTask>,
}

pub fn decode(bytes: &[u8]) -> Result<RawJobFile, toml::de::Error> {
    let text = String::from_utf8_lossy(bytes);
    toml::from_str(&text)
}

#[cfg(test)]
#[path = "raw_tests.rs"]
mod tests;
