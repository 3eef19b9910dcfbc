// ============================================================================
// src/envfile.rs – line-oriented KEY=VALUE editing of .env files
// ============================================================================

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

use crate::error::ForgeError;
use crate::util::atomic::atomic_replace;

/// How a new value lands in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EditMode {
    /// Insert `KEY=VALUE` after every line starting with `KEY=`; append if none.
    /// Existing lines are kept, so repeated runs accumulate entries.
    #[default]
    AppendAfterMatch,
    /// Overwrite the first `KEY=` line in place, drop later duplicates; append if none.
    Replace,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// Lines that started with `KEY=` before the edit.
    pub matched: usize,
    /// New `KEY=VALUE` lines written (including an append).
    pub inserted: usize,
    /// Stale duplicates removed (replace mode only).
    pub removed: usize,
    pub appended: bool,
}

/// Buffers that carry the secret are wiped on drop. Allocator copies made by
/// `std` while reading the file are out of reach.
#[derive(Debug)]
pub struct EditedFile {
    pub contents: Zeroizing<String>,
    pub outcome: EditOutcome,
}

pub fn validate_key(key: &str) -> Result<(), ForgeError> {
    let bad = key.is_empty() || key.chars().any(|c| c == '=' || c.is_whitespace() || c == '\0');
    if bad {
        return Err(ForgeError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Split text into lines, each keeping its own terminator.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Read the whole file; see [`split_lines`] for the line shape.
pub fn read_lines(path: &Path) -> Result<Zeroizing<Vec<String>>> {
    let text = Zeroizing::new(
        fs::read_to_string(path).with_context(|| format!("read env file {}", path.display()))?,
    );
    Ok(Zeroizing::new(
        split_lines(&text).into_iter().map(str::to_owned).collect(),
    ))
}

/// Upper bound on the rendered size, so the output buffer is allocated once
/// and never leaves a stale copy of the secret behind on growth.
pub fn capacity_hint<S: AsRef<str>>(lines: &[S], key: &str, value: &str) -> usize {
    let prefix = format!("{key}=");
    let original: usize = lines.iter().map(|l| l.as_ref().len()).sum();
    let matches = lines
        .iter()
        .filter(|l| l.as_ref().starts_with(&prefix))
        .count();
    // "\n" + KEY + "=" + VALUE + "\n"
    let entry = key.len() + value.len() + 3;
    original + entry * matches.max(1)
}

fn is_terminated(out: &str) -> bool {
    out.is_empty() || out.ends_with('\n')
}

fn push_entry(out: &mut String, key: &str, value: &str) {
    if !is_terminated(out) {
        out.push('\n');
    }
    out.push_str(key);
    out.push('=');
    out.push_str(value);
    out.push('\n');
}

fn line_terminator(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

pub fn insert_after_matches<S: AsRef<str>>(
    lines: &[S],
    key: &str,
    value: &str,
) -> (Zeroizing<String>, EditOutcome) {
    let prefix = format!("{key}=");
    let mut out = Zeroizing::new(String::with_capacity(capacity_hint(lines, key, value)));
    let mut outcome = EditOutcome::default();

    for line in lines {
        let line = line.as_ref();
        out.push_str(line);
        if line.starts_with(&prefix) {
            push_entry(&mut out, key, value);
            outcome.matched += 1;
            outcome.inserted += 1;
        }
    }

    if outcome.matched == 0 {
        push_entry(&mut out, key, value);
        outcome.inserted = 1;
        outcome.appended = true;
    }

    (out, outcome)
}

pub fn replace_or_append<S: AsRef<str>>(
    lines: &[S],
    key: &str,
    value: &str,
) -> (Zeroizing<String>, EditOutcome) {
    let prefix = format!("{key}=");
    let mut out = Zeroizing::new(String::with_capacity(capacity_hint(lines, key, value)));
    let mut outcome = EditOutcome::default();

    for line in lines {
        let line = line.as_ref();
        if !line.starts_with(&prefix) {
            out.push_str(line);
            continue;
        }
        outcome.matched += 1;
        if outcome.matched > 1 {
            outcome.removed += 1;
            continue;
        }
        out.push_str(&prefix);
        out.push_str(value);
        match line_terminator(line) {
            // Rewritten last line had no terminator; keep it that way.
            "" => {}
            term => out.push_str(term),
        }
        outcome.inserted = 1;
    }

    if outcome.matched == 0 {
        push_entry(&mut out, key, value);
        outcome.inserted = 1;
        outcome.appended = true;
    }

    (out, outcome)
}

pub fn render<S: AsRef<str>>(
    lines: &[S],
    key: &str,
    value: &str,
    mode: EditMode,
) -> (Zeroizing<String>, EditOutcome) {
    match mode {
        EditMode::AppendAfterMatch => insert_after_matches(lines, key, value),
        EditMode::Replace => replace_or_append(lines, key, value),
    }
}

/// One full read-rewrite cycle. Returns the file as read back after the write.
pub fn edit_env_file(path: &Path, key: &str, value: &str, mode: EditMode) -> Result<EditedFile> {
    validate_key(key)?;

    let lines = read_lines(path)?;
    let (rendered, outcome) = render(&lines[..], key, value, mode);
    tracing::debug!(
        path = %path.display(),
        key,
        ?mode,
        original_lines = lines.len(),
        matched = outcome.matched,
        "rendered env file"
    );

    atomic_replace(path, rendered.as_bytes())
        .with_context(|| format!("write env file {}", path.display()))?;

    let contents = Zeroizing::new(
        fs::read_to_string(path).with_context(|| format!("re-read env file {}", path.display()))?,
    );
    Ok(EditedFile { contents, outcome })
}
