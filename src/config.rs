/// Self-checks a tree performs while it mutates.
///
/// Checks never change the outcome of a correct operation; they turn a latent contract violation
/// into an [`Error`](crate::Error) at the point it is first observable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Validate local links and order after every single rotation.
    ///
    /// Defaults to on in debug builds.
    pub verify_rotations: bool,

    /// Run the full invariant audit after every successful insert or removal.
    ///
    /// This makes mutation _O(n)_ and is meant for tests.
    pub audit_after_mutation: bool,
}

impl Config {
    /// Rotation checks in debug builds only, no audit.
    pub const fn new() -> Config {
        Config {
            verify_rotations: cfg!(debug_assertions),
            audit_after_mutation: false,
        }
    }

    /// Sets [`verify_rotations`](Self::verify_rotations).
    #[must_use]
    pub const fn with_verify_rotations(mut self, on: bool) -> Config {
        self.verify_rotations = on;
        self
    }

    /// Sets [`audit_after_mutation`](Self::audit_after_mutation).
    #[must_use]
    pub const fn with_audit_after_mutation(mut self, on: bool) -> Config {
        self.audit_after_mutation = on;
        self
    }

    /// Every check enabled.
    pub const fn strict() -> Config {
        Config {
            verify_rotations: true,
            audit_after_mutation: true,
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}
