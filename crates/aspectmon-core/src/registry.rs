//! Registered aspect set.
//!
//! Built once at startup, then moved into the metrics server. Names are
//! validated on insert so route collisions fail fast instead of silently
//! shadowing each other:
//! - root-placed names must be unique among root-placed aspects (they become
//!   keys of the root document)
//! - non-root names must be unique among non-root aspects and usable as a
//!   single literal path segment

use std::sync::Arc;

use crate::aspect::Aspect;
use crate::error::{AspectMonError, Result};

/// Ordered, validated collection of aspects.
#[derive(Clone, Default)]
pub struct AspectSet {
    aspects: Vec<Arc<dyn Aspect>>,
}

impl AspectSet {
    pub fn new() -> Self {
        Self { aspects: Vec::new() }
    }

    /// Build a set from a list, rejecting the first conflicting entry.
    pub fn from_aspects<I>(aspects: I) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<dyn Aspect>>,
    {
        let mut set = Self::new();
        for aspect in aspects {
            set.register(aspect)?;
        }
        Ok(set)
    }

    /// Register one aspect.
    pub fn register(&mut self, aspect: Arc<dyn Aspect>) -> Result<()> {
        let name = aspect.name();
        let in_root = aspect.in_root();

        if !in_root && !is_path_segment(name) {
            return Err(AspectMonError::InvalidAspectName(name.to_string()));
        }

        let clash = self
            .aspects
            .iter()
            .any(|a| a.in_root() == in_root && a.name() == name);
        if clash {
            let placement = if in_root { "root" } else { "path" };
            return Err(AspectMonError::DuplicateAspect(format!(
                "{name} ({placement})"
            )));
        }

        tracing::debug!(aspect = %name, in_root, "aspect registered");
        self.aspects.push(aspect);
        Ok(())
    }

    /// Builder-style `register`.
    pub fn with(mut self, aspect: Arc<dyn Aspect>) -> Result<Self> {
        self.register(aspect)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Aspect>> {
        self.aspects.iter()
    }

    /// Root-placed aspects, in registration order.
    pub fn root(&self) -> Vec<Arc<dyn Aspect>> {
        self.aspects.iter().filter(|a| a.in_root()).cloned().collect()
    }

    /// Aspects served at `/<name>`, in registration order.
    pub fn routed(&self) -> Vec<Arc<dyn Aspect>> {
        self.aspects.iter().filter(|a| !a.in_root()).cloned().collect()
    }
}

/// Unreserved URI characters only, so the name is matched literally by the
/// router (no `:param` / `*wildcard` interpretation, no percent-encoding).
fn is_path_segment(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
        && name != "."
        && name != ".."
}
