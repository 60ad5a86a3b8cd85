//! Resource kinds, stored pools and partial cost bundles.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Money,
    Science,
    Materials,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Money, Resource::Science, Resource::Materials];

    pub const fn as_str(self) -> &'static str {
        match self {
            Resource::Money => "money",
            Resource::Science => "science",
            Resource::Materials => "materials",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three independent stored counters. Never negative in a valid economy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    pub money: i32,
    pub science: i32,
    pub materials: i32,
}

impl ResourcePool {
    pub const fn new(money: i32, science: i32, materials: i32) -> Self {
        Self {
            money,
            science,
            materials,
        }
    }

    pub const fn get(&self, resource: Resource) -> i32 {
        match resource {
            Resource::Money => self.money,
            Resource::Science => self.science,
            Resource::Materials => self.materials,
        }
    }

    pub fn get_mut(&mut self, resource: Resource) -> &mut i32 {
        match resource {
            Resource::Money => &mut self.money,
            Resource::Science => &mut self.science,
            Resource::Materials => &mut self.materials,
        }
    }

    pub fn with(mut self, resource: Resource, amount: i32) -> Self {
        *self.get_mut(resource) = amount;
        self
    }
}

/// Partial resource → amount map; omitted resources count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceCost(BTreeMap<Resource, i32>);

impl ResourceCost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resource: Resource, amount: i32) -> Self {
        self.0.insert(resource, amount);
        self
    }

    pub fn amount(&self, resource: Resource) -> i32 {
        self.0.get(&resource).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resource, i32)> + '_ {
        self.0.iter().map(|(r, a)| (*r, *a))
    }
}

impl<const N: usize> From<[(Resource, i32); N]> for ResourceCost {
    fn from(entries: [(Resource, i32); N]) -> Self {
        Self(entries.into_iter().collect())
    }
}
