//! Per-language scanners.
//!
//! Each module exposes `generate_tags(lines) -> Document`. Scanners are pure functions over the
//! given lines: they keep no state between calls and never fail, they only under-report
//! structure on input they cannot make sense of.

mod delimited;

pub mod batch;
pub mod c;
pub mod css;
pub mod ess;
pub mod ini;
pub mod latex;
pub mod lua;
pub mod nsis;
pub mod perl;
pub mod php;
pub mod python;
pub mod shell;
pub mod tcl;
pub mod verilog;
