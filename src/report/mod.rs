//! Report generation for rendered results.

mod generator;

pub use generator::{
    generate_report, generate_terminal_report, write_report, ReportMetadata,
};
