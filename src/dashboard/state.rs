/// Lifecycle of the dashboard widget, driven by explicit events instead of
/// inherited framework hooks.
///
/// `Uninitialized -> Loading` on start, `Loading -> Ready` on the first
/// data arrival. From `Ready`, user actions and breadcrumb-style returns
/// pass through `Refreshing`. Any fetch failure parks the widget in
/// `Errored` without tearing down the surrounding shell; a later refresh
/// leaves it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Uninitialized,
    Loading,
    Refreshing,
    Ready,
    Errored,
}

impl Phase {
    pub fn on_start(self) -> Self {
        match self {
            Phase::Uninitialized => Phase::Loading,
            other => other,
        }
    }

    pub fn on_refresh(self) -> Self {
        match self {
            Phase::Ready | Phase::Errored => Phase::Refreshing,
            other => other,
        }
    }

    /// A completed fetch overwrites whatever was on screen, so data always
    /// lands in `Ready` and failure always lands in `Errored` once the
    /// widget has started.
    pub fn on_data(self) -> Self {
        match self {
            Phase::Uninitialized => Phase::Uninitialized,
            _ => Phase::Ready,
        }
    }

    pub fn on_error(self) -> Self {
        match self {
            Phase::Uninitialized => Phase::Uninitialized,
            _ => Phase::Errored,
        }
    }

    /// A fetch cycle is underway and the UI should show progress.
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Loading | Phase::Refreshing)
    }
}
