//! Main crate for the `sacloud-dns-sync` application.
//!
//! The crate takes a set of planned endpoint changes and reconciles them against the DNS zones
//! hosted by a cloud provider.
//!
//! The following modules might be of interest if you want to add new functionality:
//! - [`endpoint`] describes the desired DNS state as produced by a planner, along with the [`endpoint::DomainFilter`]
//! - [`plan`] contains the [`plan::Changes`] that drive one reconciliation cycle
//! - [`provider`]s such as Sakura Cloud translate endpoints into their own records and persist them

#![allow(clippy::uninlined_format_args)]

pub mod endpoint;
pub mod plan;
pub mod provider;
