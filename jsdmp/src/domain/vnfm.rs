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

//! Manager template

use super::DomainError;

/// # VNF Manager
///
/// Resource and licensing template of a manager. A manager node hosts one license block for every
/// `capacity` functions it manages (or fraction thereof). Every block costs `license_cost` and
/// occupies `cores` and `memory` on the manager node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vnfm {
    /// Cores of one license block
    pub cores: i64,
    /// Memory of one license block
    pub memory: i64,
    /// Number of functions managed by one license block
    pub capacity: usize,
    /// Maximal hop distance between the manager and a managed node
    pub radius: usize,
    /// Bandwidth reserved on every management path
    pub bandwidth: i64,
    /// Cost of a single license block
    pub license_cost: i64,
}

impl Vnfm {
    /// Create a new manager template. Fails if `capacity` is zero.
    pub fn new(
        cores: i64,
        memory: i64,
        capacity: usize,
        radius: usize,
        bandwidth: i64,
        license_cost: i64,
    ) -> Result<Self, DomainError> {
        if capacity == 0 {
            return Err(DomainError::ZeroCapacity);
        }
        Ok(Self { cores, memory, capacity, radius, bandwidth, license_cost })
    }

    /// Number of license blocks needed to manage `load` functions
    pub fn blocks(&self, load: usize) -> usize {
        let capacity = self.capacity.max(1);
        (load + capacity - 1) / capacity
    }
}
