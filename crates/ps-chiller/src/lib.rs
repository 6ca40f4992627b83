//! ps-chiller: chiller plant configuration search.
//!
//! Enumerates (unit model, operating count) pairs that cover a building
//! cooling load, adds spares per a redundancy policy, drops anything over the
//! unit cap, and ranks the survivors with a pluggable scoring strategy.
//!
//! # Example
//!
//! ```
//! use ps_chiller::{ChillerCatalog, ChillerSelector, Redundancy, SelectionCriteria, Strategy};
//! use ps_core::imperial::megawatts;
//!
//! let selector = ChillerSelector::new(ChillerCatalog::standard());
//! let criteria =
//!     SelectionCriteria::new(megawatts(10.0), Redundancy::NPlusOne, Strategy::Balanced, 20);
//! let top = selector.select(&criteria).unwrap();
//! assert!(!top.is_empty() && top.len() <= 3);
//! assert!(top.iter().all(|c| c.total_count <= 20));
//! ```

pub mod catalog;
pub mod cost;
pub mod error;
pub mod policy;
pub mod selector;

pub use catalog::{ChillerCatalog, ChillerModel, mw_to_tons, tons_to_mw};
pub use cost::{CostAnalysis, Economics};
pub use error::{ChillerError, ChillerResult};
pub use policy::{LoadingBand, Redundancy, Strategy};
pub use selector::{ChillerCandidate, ChillerSelector, SelectionCriteria, TOP_N};
