//! Arena templates and the catalog they live in.

use std::collections::HashMap;

use arenaloop_protocol::Vec3;
use serde::{Deserialize, Serialize};

use crate::ArenaError;

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// An axis-aligned box in world space.
///
/// Templates describe their geometry as a list of regions (floors, walls,
/// platforms). The playable region of a live arena is the box enclosing
/// all of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min: Vec3,
    pub max: Vec3,
}

impl Region {
    /// Builds a region from two opposite corners in any order.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Returns `true` if `point` lies inside or on the boundary.
    pub fn contains(&self, point: Vec3) -> bool {
        (self.min.x..=self.max.x).contains(&point.x)
            && (self.min.y..=self.max.y).contains(&point.y)
            && (self.min.z..=self.max.z).contains(&point.z)
    }

    /// The smallest region enclosing both `self` and `other`.
    pub fn union(&self, other: &Region) -> Region {
        Region {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The smallest region enclosing every region in `regions`, or `None`
    /// when the iterator is empty.
    pub fn enclosing<'a>(regions: impl IntoIterator<Item = &'a Region>) -> Option<Region> {
        regions
            .into_iter()
            .map(|r| Region::from_corners(r.min, r.max))
            .reduce(|acc, r| acc.union(&r))
    }
}

// ---------------------------------------------------------------------------
// ArenaTemplate
// ---------------------------------------------------------------------------

/// A named blueprint that gets cloned into the live world on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaTemplate {
    /// The name event modules refer to (`EventModule::map_name`).
    pub name: String,

    /// Geometry of the arena. May be empty for purely logical arenas, in
    /// which case no point is ever inside it.
    #[serde(default)]
    pub parts: Vec<Region>,
}

impl ArenaTemplate {
    pub fn new(name: impl Into<String>, parts: Vec<Region>) -> Self {
        Self {
            name: name.into(),
            parts,
        }
    }
}

// ---------------------------------------------------------------------------
// ArenaCatalog
// ---------------------------------------------------------------------------

/// Templates keyed by name. Later registrations replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ArenaCatalog {
    templates: HashMap<String, ArenaTemplate>,
}

impl ArenaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from a list of templates.
    ///
    /// # Errors
    /// Returns [`ArenaError::InvalidTemplate`] for a template with a blank name.
    pub fn from_templates(
        templates: impl IntoIterator<Item = ArenaTemplate>,
    ) -> Result<Self, ArenaError> {
        let mut catalog = Self::new();
        for template in templates {
            catalog.insert(template)?;
        }
        Ok(catalog)
    }

    /// Adds or replaces a template.
    ///
    /// # Errors
    /// Returns [`ArenaError::InvalidTemplate`] for a template with a blank name.
    pub fn insert(&mut self, template: ArenaTemplate) -> Result<(), ArenaError> {
        if template.name.trim().is_empty() {
            return Err(ArenaError::InvalidTemplate(
                "template name must not be blank".into(),
            ));
        }
        if let Some(previous) = self.templates.insert(template.name.clone(), template) {
            tracing::debug!(arena = %previous.name, "arena template replaced");
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ArenaTemplate> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
