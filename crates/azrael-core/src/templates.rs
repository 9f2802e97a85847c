use crate::{Body, Shape};
use std::collections::BTreeMap;

/// Name of a built-in body template, used by `Spawn` commands.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateId(String);

impl TemplateId {
    /// Wraps an owned or borrowed template name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the template name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for TemplateId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for TemplateId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self)
    }
}

fn default_body(shape: Shape, inv_mass: f32) -> Body {
    Body {
        position: [0.0, 0.0, 0.0],
        orientation: [0.0, 0.0, 0.0, 1.0],
        v_lin: [0.0, 0.0, 0.0],
        v_ang: [0.0, 0.0, 0.0],
        inv_mass,
        restitution: 0.2,
        friction: 0.5,
        linear_damping: 0.01,
        angular_damping: 0.01,
        shape,
        scale: 1.0,
        boosters: Vec::new(),
        version: 0,
        aabb: None,
        sleeping: false,
        sleep_ticks: 0,
    }
}

/// Built-in factory mapping a template name to a freshly constructed [`Body`].
///
/// Template *authoring* — defining new named templates from client-provided
/// geometry — is out of scope; this registry only covers the handful of
/// built-ins every test scenario in the end-to-end suite needs.
pub struct TemplateRegistry {
    factories: BTreeMap<String, fn() -> Body>,
}

impl TemplateRegistry {
    /// Builds the registry with the built-in templates installed.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut factories: BTreeMap<String, fn() -> Body> = BTreeMap::new();
        factories.insert("unit_sphere".to_string(), || {
            default_body(Shape::Sphere { radius: 1.0 }, 1.0)
        });
        factories.insert("unit_box".to_string(), || {
            default_body(Shape::Box { half_extents: [0.5, 0.5, 0.5] }, 1.0)
        });
        factories.insert("ground_plane".to_string(), || {
            default_body(
                Shape::StaticPlane { normal: [0.0, 1.0, 0.0], offset: 0.0 },
                0.0,
            )
        });
        Self { factories }
    }

    /// Instantiates `template`, returning `None` if it is not registered.
    #[must_use]
    pub fn instantiate(&self, template: &TemplateId) -> Option<Body> {
        self.factories.get(template.as_str()).map(|factory| factory())
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_sphere_is_dynamic() {
        let registry = TemplateRegistry::with_builtins();
        let body = registry
            .instantiate(&TemplateId::new("unit_sphere"))
            .expect("unit_sphere is built in");
        assert!(!body.is_static());
        assert!(matches!(body.shape, Shape::Sphere { .. }));
    }

    #[test]
    fn ground_plane_is_static() {
        let registry = TemplateRegistry::with_builtins();
        let body = registry
            .instantiate(&TemplateId::new("ground_plane"))
            .expect("ground_plane is built in");
        assert!(body.is_static());
    }

    #[test]
    fn unknown_template_yields_none() {
        let registry = TemplateRegistry::with_builtins();
        assert!(registry.instantiate(&TemplateId::new("nonexistent")).is_none());
    }
}
