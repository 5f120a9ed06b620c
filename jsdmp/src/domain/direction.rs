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

//! Traffic roles of nodes and functions

use std::fmt;

/// Traffic role. For a node, it describes which kind of traffic it can terminate. For a function,
/// it describes the role it requires from the hosting node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// No role
    None,
    /// Traffic enters the network here
    Ingress,
    /// Traffic leaves the network here
    Egress,
    /// Both ingress and egress
    Both,
}

impl Default for Direction {
    fn default() -> Self {
        Self::None
    }
}

impl Direction {
    /// Build the direction from the two flags used in configuration files.
    pub fn from_flags(ingress: bool, egress: bool) -> Self {
        match (ingress, egress) {
            (false, false) => Self::None,
            (true, false) => Self::Ingress,
            (false, true) => Self::Egress,
            (true, true) => Self::Both,
        }
    }

    /// Returns true if a node with this role can host a function requiring `required`. A function
    /// without requirement fits on every node, while a node with role `None` only hosts functions
    /// without requirement.
    pub fn supports(&self, required: Direction) -> bool {
        match required {
            Self::None => true,
            Self::Ingress => matches!(self, Self::Ingress | Self::Both),
            Self::Egress => matches!(self, Self::Egress | Self::Both),
            Self::Both => *self == Self::Both,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Ingress => write!(f, "ingress"),
            Self::Egress => write!(f, "egress"),
            Self::Both => write!(f, "both"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Direction::{self, *};

    #[test]
    fn role_compatibility() {
        let all = [None, Ingress, Egress, Both];
        for node in all.iter() {
            assert!(node.supports(None));
        }
        assert!(!None.supports(Ingress));
        assert!(!None.supports(Egress));
        assert!(Ingress.supports(Ingress));
        assert!(!Ingress.supports(Egress));
        assert!(Egress.supports(Egress));
        assert!(!Egress.supports(Ingress));
        assert!(Both.supports(Ingress));
        assert!(Both.supports(Egress));
        assert!(Both.supports(Both));
        assert!(!Ingress.supports(Both));
    }

    #[test]
    fn flags() {
        assert_eq!(Direction::from_flags(false, false), None);
        assert_eq!(Direction::from_flags(true, false), Ingress);
        assert_eq!(Direction::from_flags(false, true), Egress);
        assert_eq!(Direction::from_flags(true, true), Both);
    }
}
