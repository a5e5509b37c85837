pub mod checks;
pub mod cli;
pub mod config;
pub mod locate;
pub mod report;

pub use checks::{CheckOutcome, run_all, yaml_parser_available};
pub use locate::{LocatedAction, locate_action};
pub use report::{CheckReport, Report, Summary};
