//! Line-oriented loader for the dictionary text format.
//!
//! ```text
//! run
//! running ran runs
//! happy
//! happier happiest
//! $
//! happy glad joyful
//! ```
//!
//! Before the section marker, lines alternate between a stem and its
//! whitespace-separated inflections (an empty inflection line is allowed).
//! After it, each line is `stem synonym1 synonym2 ...`: the first synonym
//! opens a new group with the stem and the others join that same group.

use crate::dictionary::{DictError, Dictionary};
use crate::models::{GroupId, LoadParams};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line {line}: {source}")]
    Dictionary {
        line: usize,
        #[source]
        source: DictError,
    },
}

/// Counters for one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub lines: usize,
    pub rejected: usize, // Operations skipped in lenient mode
}

enum Section {
    Stem,
    Inflections(String),
    SkipInflections, // Stem line was rejected in lenient mode
    Synonyms,
}

/// Load a dictionary file.
pub fn load_from_path(path: &Path, params: &LoadParams) -> Result<Dictionary, LoadError> {
    load_from_path_with_stats(path, params).map(|(dict, _)| dict)
}

/// Load a dictionary file and report what the load did.
pub fn load_from_path_with_stats(
    path: &Path,
    params: &LoadParams,
) -> Result<(Dictionary, LoadStats), LoadError> {
    let file = File::open(path)?;
    let mut dict = Dictionary::new();
    let stats = load_into(&mut dict, BufReader::new(file), params)?;
    Ok((dict, stats))
}

/// Load a dictionary from any buffered reader.
pub fn load_from_reader<R: BufRead>(reader: R, params: &LoadParams) -> Result<Dictionary, LoadError> {
    let mut dict = Dictionary::new();
    load_into(&mut dict, reader, params)?;
    Ok(dict)
}

/// Feed every line of `reader` into `dict`.
///
/// In strict mode the first rejected operation aborts the load; otherwise it
/// is logged, counted and skipped. A rejected stem line also drops the
/// inflection line that follows it.
pub fn load_into<R: BufRead>(
    dict: &mut Dictionary,
    reader: R,
    params: &LoadParams,
) -> Result<LoadStats, LoadError> {
    let progress = if params.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} lines ({per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Some(pb)
    } else {
        None
    };

    let mut stats = LoadStats::default();
    let mut section = Section::Stem;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let text = line.trim();
        stats.lines += 1;

        if let Some(ref pb) = progress {
            pb.inc(1);
        }

        if text == params.section_marker {
            section = Section::Synonyms;
            continue;
        }

        section = match section {
            Section::Stem if text.is_empty() => Section::Stem,
            Section::Stem => match dict.add_stem(text) {
                Ok(()) => Section::Inflections(text.to_string()),
                Err(err) => {
                    check(Err(err), line_no, params, &mut stats)?;
                    Section::SkipInflections
                }
            },
            Section::Inflections(stem) => {
                for word in text.split_whitespace() {
                    check(dict.add_inflection(&stem, word), line_no, params, &mut stats)?;
                }
                Section::Stem
            }
            Section::SkipInflections => {
                debug!(line = line_no, "dropping inflections of rejected stem");
                Section::Stem
            }
            Section::Synonyms => {
                load_synonym_line(dict, text, line_no, params, &mut stats)?;
                Section::Synonyms
            }
        };
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    info!(
        stems = dict.stem_count(),
        groups = dict.group_count(),
        lines = stats.lines,
        rejected = stats.rejected,
        "loaded dictionary"
    );
    Ok(stats)
}

fn load_synonym_line(
    dict: &mut Dictionary,
    text: &str,
    line: usize,
    params: &LoadParams,
    stats: &mut LoadStats,
) -> Result<(), LoadError> {
    let mut words = text.split_whitespace();
    let Some(stem) = words.next() else {
        return Ok(());
    };

    // The first accepted synonym opens the group, the rest join it
    let mut group: Option<GroupId> = None;
    let mut linked = 0usize;
    for synonym in words {
        match dict.add_synonym(stem, synonym, group) {
            Ok(used) => {
                group = Some(used);
                linked += 1;
            }
            Err(err) => check(Err(err), line, params, stats)?,
        }
    }

    if linked == 0 {
        warn!(line, stem, "synonym line links nothing");
    }
    Ok(())
}

fn check(
    result: Result<(), DictError>,
    line: usize,
    params: &LoadParams,
    stats: &mut LoadStats,
) -> Result<(), LoadError> {
    match result {
        Ok(()) => Ok(()),
        Err(source) if params.strict => Err(LoadError::Dictionary { line, source }),
        Err(source) => {
            warn!(line, error = %source, "skipping rejected entry");
            stats.rejected += 1;
            Ok(())
        }
    }
}
