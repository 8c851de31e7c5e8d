#![doc = include_str!("../README.md")]
//!
//! # 처리 흐름
//!
//! ```text
//! package_dirs ──▶ LockfileLoader ──▶ RawLockEntry*
//!                                         │
//!                                     classify (classifier 술어)
//!                                         │
//!                                  YarnClassicPackage*
//!                                    │           │
//!                              to_component   fetch_dependencies
//!                                    │           │
//!                               Component*   오프라인 미러
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod lockfile;
pub mod prefetch;
pub mod resolver;

// --- 주요 타입 re-export ---

pub use config::{YarnClassicConfig, YarnClassicConfigBuilder};
pub use error::YarnClassicError;
pub use lockfile::{LockfileLoader, RawLockEntry, YarnLockLoader};
pub use prefetch::{Prefetcher, PrefetcherBuilder};
pub use resolver::{YarnClassicPackage, classify, resolve_packages};
