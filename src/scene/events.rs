/// Notifications from the scene to the surrounding UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// Assets are loaded and the cat is on its way in.
    GameReady,
    /// The cat sits in the tub; the wash can be started.
    WashAvailable,
    /// The wash finished and the minigame was dismissed.
    WashComplete,
    /// The minigame was closed before the cat was clean.
    WashClosed,
}
