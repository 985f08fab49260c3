//! Zonelift Core
//!
//! Record normalization and Terraform text rendering for adopting existing
//! Route53 hosted zones into an infrastructure-as-code project.
//!
//! The pipeline is: a [`source::RecordSource`] yields raw record sets, the
//! normalizer maps them into the canonical record model, the key assigner
//! derives stable per-record keys, the attribute projector turns each record
//! into an ordered attribute body, and the renderer serializes those bodies
//! into Terraform locals. All of it is pure; file I/O lives in the CLI shell.

pub mod attributes;
pub mod hcl;
pub mod imports;
pub mod keys;
pub mod markers;
pub mod names;
pub mod normalize;
pub mod record;
pub mod source;
pub mod zone;
