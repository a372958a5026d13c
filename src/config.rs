use serde::Deserialize;

/// Lookup behaviour shared by every tree of a router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Percent-decode captured parameter values. Static bytes are always
    /// compared as registered.
    pub decode_params: bool,
    /// Report `Lookup::TrailingSlash` when the path only misses (or has an
    /// extra) trailing slash. When off such paths are plain `NotFound`.
    pub redirect_trailing_slash: bool,
    /// Slots reserved in buffers handed out by `Router::params`.
    pub max_params: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            decode_params: false,
            redirect_trailing_slash: true,
            max_params: 20,
        }
    }
}
