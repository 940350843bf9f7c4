//! Pipeline stages for report-text-to-table extraction.
//!
//! Each submodule implements exactly one transformation step, and every step
//! only consumes what the previous one produced.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ segment ──────────▶ group ──────▶ normalize
//! (lines)   (per jurisdiction)    (per district)  (CandidateRecord rows)
//! ```
//!
//! 1. [`input`]: read the report (file or stdin) and split it into lines
//! 2. [`segment`]: locate each jurisdiction's office section and drop page
//!    furniture
//! 3. [`group`]: split a section into districts, rejoining wrapped
//!    candidate entries
//! 4. [`normalize`]: parse each raw record into name, party and vote count

pub mod group;
pub mod input;
pub mod normalize;
pub mod segment;
