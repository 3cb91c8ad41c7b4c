//! Configuration the pipeline consults every frame.

/// Externally owned flags that gate the effect.
///
/// Passed into each pipeline call rather than read from globals, so the
/// gating decision only depends on its arguments.
pub trait EffectSettings {
    /// User-facing "post-processing enabled" option.
    fn postprocess_enabled(&self) -> bool;

    /// Turns the option off for the rest of the session.
    ///
    /// Called when resource allocation fails; the change must be visible to
    /// every other reader of the option.
    fn disable_postprocess(&mut self);

    /// Number of local (split-screen) players in the current session.
    fn local_player_count(&self) -> u32;
}

/// Plain settings value for callers without their own config store.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct UserSettings {
    pub postprocess_enabled: bool,
    pub local_players: u32,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            postprocess_enabled: true,
            local_players: 1,
        }
    }
}

impl EffectSettings for UserSettings {
    fn postprocess_enabled(&self) -> bool {
        self.postprocess_enabled
    }

    fn disable_postprocess(&mut self) {
        self.postprocess_enabled = false;
    }

    fn local_player_count(&self) -> u32 {
        self.local_players
    }
}
