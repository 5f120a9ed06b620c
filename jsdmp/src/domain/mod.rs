// JSD-MP: Joint Service Deployment and Manager Placement
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Domain model
//!
//! Read-only inputs of every solver: the traffic [`Direction`] of nodes and functions, the
//! function template [`Type`], the service [`Chain`], the manager template [`Vnfm`], and the
//! complete problem instance [`Config`].

mod config;
mod direction;
mod nfv;
mod vnfm;

pub use config::Config;
pub use direction::Direction;
pub use nfv::{Chain, Type};
pub use vnfm::Vnfm;

use thiserror::Error;

/// Errors raised while building the domain model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A chain link references a function index which does not exist
    #[error("Chain {0} has no function at index {1}")]
    InvalidFunctionIndex(String, usize),
    /// A chain references a function type which is not defined
    #[error("Unknown function type: {0}")]
    UnknownType(String),
    /// A manager which cannot manage anything
    #[error("The VNFM capacity must be at least 1")]
    ZeroCapacity,
}
