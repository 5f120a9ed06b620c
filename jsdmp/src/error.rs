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

//! Module containing all error types

use crate::domain::DomainError;
use crate::placement::PlacementError;
use crate::topology::TopologyError;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Error propagated from the topology
    #[error("Topology Error: {0}")]
    TopologyError(#[from] TopologyError),
    /// Error propagated from the domain model
    #[error("Domain Error: {0}")]
    DomainError(#[from] DomainError),
    /// A malformed placement was built
    #[error("Placement Error: {0}")]
    PlacementError(#[from] PlacementError),
    /// The name of the solver is not known
    #[error("Unknown solver: {0}")]
    UnknownSolver(String),
}
