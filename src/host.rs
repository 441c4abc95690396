use uuid::Uuid;

use crate::theme::ColorScheme;

/// Injected host-environment capability: current viewport width and
/// color-scheme preference, plus explicit subscribe/unsubscribe so a
/// widget's observation ends at teardown instead of page unload.
///
/// The signal is shared read-only across all mounted widgets; each instance
/// subscribes independently under its own id. Production embedding glue
/// implements this over the real document; tests inject a fake.
pub trait HostSignals {
    fn viewport_width(&self) -> u32;
    fn color_scheme(&self) -> ColorScheme;
    fn subscribe(&self, widget_id: Uuid);
    fn unsubscribe(&self, widget_id: Uuid);
}

/// Fixed-value host with no-op subscriptions, used by the CLI where there
/// is no live environment to observe.
#[derive(Debug, Clone, Copy)]
pub struct StaticHost {
    pub width: u32,
    pub scheme: ColorScheme,
}

impl Default for StaticHost {
    fn default() -> Self {
        Self {
            width: 1280,
            scheme: ColorScheme::Dark,
        }
    }
}

impl HostSignals for StaticHost {
    fn viewport_width(&self) -> u32 {
        self.width
    }

    fn color_scheme(&self) -> ColorScheme {
        self.scheme
    }

    fn subscribe(&self, _widget_id: Uuid) {}

    fn unsubscribe(&self, _widget_id: Uuid) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_host_defaults() {
        let host = StaticHost::default();
        assert_eq!(host.viewport_width(), 1280);
        assert_eq!(host.color_scheme(), ColorScheme::Dark);
    }
}
