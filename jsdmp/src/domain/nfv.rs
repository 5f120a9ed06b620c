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

//! Network functions and service chains

use super::{Direction, DomainError};
use crate::topology::Link;

use std::collections::BTreeMap;

/// # Function Type
///
/// Resource and role template of a network function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    /// Name of the type
    pub name: String,
    /// Required cores
    pub cores: i64,
    /// Required memory
    pub memory: i64,
    /// Role the hosting node must support
    pub direction: Direction,
    /// Whether a manager must reach the function
    pub manageable: bool,
}

impl Type {
    /// Create a manageable function type without a traffic role
    pub fn new(name: impl Into<String>, cores: i64, memory: i64) -> Self {
        Self { name: name.into(), cores, memory, direction: Direction::None, manageable: true }
    }

    /// Set the required role
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set whether the function requires a manager
    pub fn with_manageable(mut self, manageable: bool) -> Self {
        self.manageable = manageable;
        self
    }
}

/// # Service Chain
///
/// Ordered sequence of functions, with bandwidth demands between pairs of functions, and a fee
/// which is earned when the chain is placed and managed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    /// Name of the chain
    pub name: String,
    /// Revenue of the chain
    pub fee: i64,
    functions: Vec<Type>,
    links: BTreeMap<(usize, usize), Link>,
}

impl Chain {
    /// Create an empty chain
    pub fn new(name: impl Into<String>, fee: i64) -> Self {
        Self { name: name.into(), fee, functions: Vec::new(), links: BTreeMap::new() }
    }

    /// Append a function and return its index
    pub fn add_function(&mut self, function: Type) -> usize {
        self.functions.push(function);
        self.functions.len() - 1
    }

    /// Add a bandwidth demand between the functions at index `source` and `destination`.
    pub fn add_link(
        &mut self,
        source: usize,
        destination: usize,
        link: Link,
    ) -> Result<(), DomainError> {
        for idx in [source, destination].iter() {
            if *idx >= self.functions.len() {
                return Err(DomainError::InvalidFunctionIndex(self.name.clone(), *idx));
            }
        }
        self.links.insert((source, destination), link);
        Ok(())
    }

    /// Builder variant of [`Chain::add_function`]
    pub fn with_function(mut self, function: Type) -> Self {
        self.add_function(function);
        self
    }

    /// Builder variant of [`Chain::add_link`]
    pub fn with_link(
        mut self,
        source: usize,
        destination: usize,
        link: Link,
    ) -> Result<Self, DomainError> {
        self.add_link(source, destination, link)?;
        Ok(self)
    }

    /// All functions in chain order
    pub fn functions(&self) -> &[Type] {
        &self.functions
    }

    /// All bandwidth demands, ordered by function indices
    pub fn links(&self) -> &BTreeMap<(usize, usize), Link> {
        &self.links
    }

    /// Returns the bandwidth demand between the two functions, if there is one
    pub fn link(&self, source: usize, destination: usize) -> Option<&Link> {
        self.links.get(&(source, destination))
    }

    /// Number of functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if the chain has no function
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Indices of all manageable functions, in chain order
    pub fn manageable_functions(&self) -> impl Iterator<Item = usize> + '_ {
        self.functions.iter().enumerate().filter(|(_, f)| f.manageable).map(|(i, _)| i)
    }

    /// Number of manageable functions
    pub fn num_manageable(&self) -> usize {
        self.functions.iter().filter(|f| f.manageable).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_indices_are_checked() {
        let mut chain = Chain::new("ch-0", 100)
            .with_function(Type::new("fw", 1, 1))
            .with_function(Type::new("nat", 1, 1));
        assert_eq!(chain.add_link(0, 1, Link::new(5)), Ok(()));
        assert_eq!(
            chain.add_link(1, 2, Link::new(5)),
            Err(DomainError::InvalidFunctionIndex("ch-0".to_string(), 2))
        );
        assert_eq!(chain.links().len(), 1);
        assert_eq!(chain.link(0, 1), Some(&Link::new(5)));
        assert_eq!(chain.link(1, 0), None);
    }

    #[test]
    fn manageable_functions() {
        let chain = Chain::new("ch-0", 100)
            .with_function(Type::new("in", 0, 0).with_manageable(false))
            .with_function(Type::new("fw", 1, 1))
            .with_function(Type::new("out", 0, 0).with_manageable(false))
            .with_function(Type::new("dpi", 1, 1));
        assert_eq!(chain.manageable_functions().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(chain.num_manageable(), 2);
        assert_eq!(chain.len(), 4);
    }
}
