//! `rollscope-engine` — household derivation engine for electoral-roll data.
//!
//! Pure engine crate: receives pre-loaded member records, returns grouped
//! households with relation links, anomaly reports, and on-demand family
//! tree layouts. No CLI or IO dependencies.

pub mod anomaly;
pub mod cache;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod grouper;
pub mod linker;
pub mod model;
pub mod similarity;
pub mod summary;
pub mod tree;

pub use anomaly::score_household;
pub use cache::AnalysisCache;
pub use config::EngineConfig;
pub use engine::{compute_households, run};
pub use error::EngineError;
pub use model::{
    Household, MemberIdentity, RelationLink, RollInput, RollResult, TreeOutcome,
};
pub use tree::build_family_tree;
