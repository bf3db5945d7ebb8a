//! Hierarchical addresses.
use crate::types::{NodeName, SwitchId};

use itertools::Itertools;
use serde::Serialize;

/// A hierarchical address: the path of node names from the root to the addressed node.
///
/// Every address owns its path. Extending an address copies the parent path, so two addresses
/// built from the same parent never share storage.
#[derive(Serialize, Clone, Debug)]
pub struct Hlmac {
    path: Vec<NodeName>,
    /// True once this address was broadcast to the neighbors of its node.
    pub used: bool,
    /// True if this is the selected address of its node.
    pub active: bool,
    /// Switch that must be closed for the last hop of this address, if any.
    pub depends_on: Option<SwitchId>,
}

impl Hlmac {
    /// Build the address of `name` from the address of its parent.
    /// Without a parent, the address of the root is built.
    pub fn new(parent: Option<&Hlmac>, name: &str, depends_on: Option<SwitchId>) -> Hlmac {
        let mut path = match parent {
            Some(parent) => {
                let mut path = Vec::with_capacity(parent.path.len() + 1);
                path.extend(parent.path.iter().cloned());
                path
            }
            None => Vec::with_capacity(1),
        };
        path.push(name.to_string());
        Hlmac {
            path,
            used: false,
            active: false,
            depends_on,
        }
    }

    /// Name of the node this address identifies.
    pub fn origin(&self) -> &str {
        // An address always has at least one element.
        &self.path[self.path.len() - 1]
    }

    /// Name of the parent node toward the root. `None` for the address of the root.
    pub fn next_hop(&self) -> Option<&str> {
        if self.path.len() < 2 {
            None
        } else {
            Some(&self.path[self.path.len() - 2])
        }
    }

    /// Returns true if the given node is already on this path.
    pub fn check_loop(&self, name: &str) -> bool {
        self.path.iter().any(|n| n == name)
    }

    /// Number of nodes in the address, root included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn path(&self) -> &[NodeName] {
        &self.path
    }
}

impl PartialEq for Hlmac {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Hlmac {}

impl std::fmt::Display for Hlmac {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.path.iter().join("."))
    }
}
