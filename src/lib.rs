//! Budget-constrained PC build recommender.
//!
//! Turns a catalog of priced parts, a budget and a usage goal into one
//! utility-maximising bundle:
//!
//! - **Catalog** ([`catalog`]): per-category JSON documents parsed into
//!   [`Part`](catalog::Part)s with a category-specific attribute payload.
//! - **Profiles** ([`profile`]): static per-goal importance and
//!   budget-share weights.
//! - **Scoring** ([`scoring`]): intrinsic base utility adjusted by goal
//!   weight and a budget-tiered price-fit factor.
//! - **Filtering** ([`filter`]): bounded, price-stratified candidate sets.
//! - **Allocation** ([`engine`]): two-phase multiple-choice knapsack solved
//!   through the [`cp`] capability interface.
//! - **Reporting** ([`report`]): labelled, priced presentation bundles.
//!
//! [`service::AssemblerService`] ties these together behind an async
//! `generate_build(budget, goal)` entry point; [`settings`] reads layered
//! configuration for the binary.
//!
//! # Architecture
//!
//! Loader → Filter → Scorer → Allocation Engine → Assembler. Only the
//! catalog is shared between requests, read-only; everything after it is
//! recomputed per request.

pub mod catalog;
pub mod cp;
pub mod engine;
pub mod filter;
pub mod pipeline;
pub mod profile;
pub mod report;
pub mod scoring;
pub mod service;
pub mod settings;
