use crate::axis::Centering;

/// Engine-wide defaults, passed explicitly into operations that need them.
///
/// The engine keeps no ambient state: behavior is always a function of the
/// operation's arguments plus one of these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Centering assumed for axes whose own centering is `Unknown`.
    pub default_centering: Centering,
    /// Opt-in shortcut: report the full representable range for 8-bit
    /// integer arrays without scanning their data.
    pub blind_8bit: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_centering: Centering::Cell,
            blind_8bit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_cell_centered_and_not_blind() {
        let config = EngineConfig::default();
        assert_eq!(config.default_centering, Centering::Cell);
        assert!(!config.blind_8bit);
    }
}
