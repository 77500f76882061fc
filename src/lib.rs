//! Synodict Synonym Dictionary Library
//!
//! Stores word stems in a height-balanced binary search tree, each stem with
//! its inflected forms and its memberships in synonym groups (one group per
//! sense). An inflected word can be traced back to its stem through
//! edit-distance similarity.
//!
//! # Example
//!
//! ```
//! use synodict::prelude::*;
//!
//! let mut dict = Dictionary::new();
//! dict.add_stem("run").unwrap();
//! dict.add_inflection("run", "running").unwrap();
//! assert_eq!(dict.resolve_stem("running").unwrap(), "run");
//!
//! dict.add_stem("happy").unwrap();
//! let group = dict.add_synonym("happy", "glad", None).unwrap();
//! assert_eq!(group, GroupId(0));
//! assert_eq!(dict.synonyms_of("glad", 0).unwrap(), vec!["happy"]);
//! ```
//!
//! # Loading Example
//!
//! ```no_run
//! use synodict::prelude::*;
//! use std::path::Path;
//!
//! let dict = Dictionary::from_path(Path::new("dico.txt"), &LoadParams::default()).unwrap();
//! for position in 0..dict.sense_count("happy").unwrap() {
//!     println!("{}", dict.sense("happy", position).unwrap());
//! }
//! ```

pub mod dictionary;
pub mod groups;
pub mod loader;
pub mod models;
pub mod output;
pub mod similarity;
pub mod tree;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::dictionary::{DictError, Dictionary};
    pub use crate::groups::{GroupError, SynonymGroupTable};
    pub use crate::loader::{
        load_from_path, load_from_path_with_stats, load_from_reader, load_into, LoadError,
        LoadStats,
    };
    pub use crate::models::{
        DictionarySummary, GroupId, LoadParams, NodeId, SenseReport, StemNode, StemReport,
    };
    pub use crate::output::{format_report, print_report, print_summary, write_json, OutputError};
    pub use crate::similarity::{
        best_match, levenshtein, resolve_stem_from_inflection, similarity, ResolveError,
    };
    pub use crate::tree::{StemTree, TreeError};
}

// Re-export commonly used types at the crate root
pub use dictionary::{DictError, Dictionary};
pub use models::{GroupId, LoadParams, StemReport};
