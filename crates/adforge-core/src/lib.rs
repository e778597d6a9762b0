//! Domain types, lifecycle rules and configuration shared by every AdForge crate.

pub mod app_config;
pub mod campaigns;
pub mod config;
pub mod content;
pub mod lifecycle;
pub mod roles;
pub mod seed;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use campaigns::{Avatar, Campaign, ChannelCategory, Product, TrackedLink};
pub use config::{load_app_config, load_app_config_from_env};
pub use content::{ContentFormat, ContentPiece, ContentStatus, EngagementCounts, Rating, UnknownVariant};
pub use lifecycle::{
    ensure_can_edit, partition_bulk, plan_transition, BulkPlan, LifecycleError, PieceState,
    RejectReason, TransitionKind, TransitionPlan, TransitionRequest,
};
pub use roles::ActingRole;
pub use seed::{load_seed, parse_seed, SeedFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seed file {path}: {source}")]
    SeedFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file: {0}")]
    SeedFileParse(#[from] serde_yaml::Error),

    #[error("seed validation failed: {0}")]
    Validation(String),
}
