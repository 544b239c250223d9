//! Scheme surface registered with the host.
//!
//! The host owns the plugin machinery; this module only publishes the data
//! it needs: the handled scheme names, a human-readable label, a relative
//! priority among competing handlers, and the fact that these URLs are
//! always remote.

/// Scheme names handled by this adapter.
pub const SCHEMES: [&str; 3] = ["gs", "gs+http", "gs+https"];

/// Human-readable handler label.
pub const HANDLER_LABEL: &str = "Google Cloud Storage";

/// Relative priority among competing scheme handlers.
pub const HANDLER_PRIORITY: u32 = 2050;

/// Descriptor for one scheme handler registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeHandler {
    /// Human-readable label shown by the host.
    pub label: &'static str,
    /// Relative priority among competing handlers.
    pub priority: u32,
    /// Whether URLs under this scheme are always remote (never local paths).
    pub always_remote: bool,
}

impl Default for SchemeHandler {
    fn default() -> Self {
        Self {
            label: HANDLER_LABEL,
            priority: HANDLER_PRIORITY,
            always_remote: true,
        }
    }
}

/// Host-side registry the adapter registers its schemes with.
pub trait SchemeRegistry {
    /// Adds a handler for one scheme.
    fn add_scheme_handler(&mut self, scheme: &'static str, handler: SchemeHandler);
}

/// Registers all GCS schemes with the host registry.
pub fn register_gcs_schemes(registry: &mut impl SchemeRegistry) {
    for scheme in SCHEMES {
        registry.add_scheme_handler(scheme, SchemeHandler::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingRegistry {
        added: Vec<(&'static str, SchemeHandler)>,
    }

    impl SchemeRegistry for RecordingRegistry {
        fn add_scheme_handler(&mut self, scheme: &'static str, handler: SchemeHandler) {
            self.added.push((scheme, handler));
        }
    }

    #[test]
    fn registers_all_three_schemes_with_fixed_descriptor() {
        let mut registry = RecordingRegistry::default();
        register_gcs_schemes(&mut registry);

        let schemes: Vec<_> = registry.added.iter().map(|(s, _)| *s).collect();
        assert_eq!(schemes, vec!["gs", "gs+http", "gs+https"]);

        for (_, handler) in &registry.added {
            assert_eq!(handler.label, "Google Cloud Storage");
            assert_eq!(handler.priority, 2050);
            assert!(handler.always_remote);
        }
    }
}
