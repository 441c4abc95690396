use crate::config::ThemeSetting;

/// Effective presentation scheme after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

/// Resolves the effective scheme from an explicit setting or the host
/// environment's color-scheme preference.
///
/// Explicit `Light`/`Dark` settings have no environment dependency; only
/// `System` tracks the host preference signal.
#[derive(Debug, Clone)]
pub struct ThemeResolver {
    setting: ThemeSetting,
    env_scheme: ColorScheme,
}

impl ThemeResolver {
    pub fn new(setting: ThemeSetting, env_scheme: ColorScheme) -> Self {
        Self {
            setting,
            env_scheme,
        }
    }

    pub fn effective(&self) -> ColorScheme {
        match self.setting {
            ThemeSetting::Light => ColorScheme::Light,
            ThemeSetting::Dark => ColorScheme::Dark,
            ThemeSetting::System => self.env_scheme,
        }
    }

    /// Host preference changed. Returns true when the effective scheme
    /// changed, so the embed layer knows to re-render.
    pub fn observe(&mut self, env_scheme: ColorScheme) -> bool {
        let before = self.effective();
        self.env_scheme = env_scheme;
        self.effective() != before
    }

    /// Configuration changed the requested setting.
    pub fn set_setting(&mut self, setting: ThemeSetting) -> bool {
        let before = self.effective();
        self.setting = setting;
        self.effective() != before
    }
}
