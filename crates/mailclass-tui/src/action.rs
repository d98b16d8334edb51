/// User intents produced by [`crate::input::map_event`] and consumed by `App::update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Tick,
    Resize(u16, u16),

    // Navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoTop,
    GoBottom,
    DrillIn,
    NavigateBack,

    // File slot
    OpenPicker,
    /// Pick the entry under the cursor without entering directories.
    Select,
    RemoveFile,
    /// Pasted text; treated as one or more dropped paths.
    DropPath(String),

    // Options and submission
    ToggleStemming,
    CycleProvider,
    Submit,
    CancelRequest,

    CopyToClipboard,
    CycleTheme,
    ToggleHelp,
}
