use bitflags::bitflags;

bitflags! {
    /// Tracked key press state; primarily modifiers.
    ///
    /// Declaration order follows the associated codepoint values and is
    /// also the iteration order for textual rendering.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u32 {
        const IMAGINARY = 1 << 0;
        const SHIFT = 1 << 1;
        const CONTROL = 1 << 2;
        const SYSTEM = 1 << 3;
        const META = 1 << 4;
        const HYPER = 1 << 5;
    }
}

impl KeyModifiers {
    /// The symbolic key identifier of a single modifier flag.
    pub fn key_identifier(flag: KeyModifiers) -> Option<KeyIdentifier> {
        let pairs = [
            (KeyModifiers::IMAGINARY, KeyIdentifier::Imaginary),
            (KeyModifiers::SHIFT, KeyIdentifier::Shift),
            (KeyModifiers::CONTROL, KeyIdentifier::Control),
            (KeyModifiers::SYSTEM, KeyIdentifier::System),
            (KeyModifiers::META, KeyIdentifier::Meta),
            (KeyModifiers::HYPER, KeyIdentifier::Hyper),
        ];

        pairs
            .into_iter()
            .find(|(modifier, _)| flag == *modifier)
            .map(|(_, identifier)| identifier)
    }

    /// Names of the set modifiers in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.iter_names().map(|(name, _)| name)
    }
}

/// The identifier of a pressed key.
///
/// Identifies events beyond ordinary typing: modifiers, navigation,
/// media controls, and cursor motion. Each identifier is the *symbolic*
/// Unicode character conventionally depicting the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum KeyIdentifier {
    CapsLock = 0x21EA,
    NumLock = 0x21ED,
    ScrollLock = 0x21F3,

    Imaginary = 0x2148,
    Shift = 0x21E7,
    Control = 0x2303,
    System = 0x2318,
    Meta = 0x2325,
    Hyper = 0x2726,

    Space = 0x2423,
    Return = 0x23CE,
    Enter = 0x2324,
    Tab = 0x21E5,

    DeleteBackwards = 0x232B,
    DeleteForwards = 0x2326,
    Clear = 0x2327,

    Escape = 0x238B,
    Eject = 0x23CF,
    Power = 0x23FB,
    Sleep = 0x23FE,
    BrightnessIncrease = 0x1F506,
    BrightnessDecrease = 0x1F505,

    PreviousPage = 0x2397,
    NextPage = 0x2398,
    Insert = 0x2380,
    Home = 0x21F1,
    End = 0x21F2,
    PageUp = 0x21DE,
    PageDown = 0x21DF,
    UpArrow = 0x2191,
    DownArrow = 0x2193,
    LeftArrow = 0x2190,
    RightArrow = 0x2192,

    PrintScreen = 0x2399,
    ClearScreen = 0x239A,
    Pause = 0x2389,
    Break = 0x238A,

    MediaVolumeDecrease = 0x1F509,
    MediaVolumeIncrease = 0x1F50A,
    MediaVolumeMute = 0x1F507,
    MediaFastForward = 0x23E9,
    MediaRewind = 0x23EA,
    MediaSkipForward = 0x23ED,
    MediaSkipBackward = 0x23EE,
    MediaPlay = 0x23F5,
    MediaPause = 0x23F8,
    MediaPlayToggle = 0x23EF,
    MediaReverse = 0x23F4,
    MediaStop = 0x23F9,
    MediaRecord = 0x23FA,
    MediaShuffle = 0x1F500,
    MediaRepeatContinuous = 0x1F501,
    MediaRepeatOnce = 0x1F502,

    ScreenCursorMotion = 0x1F5B1,
}

impl KeyIdentifier {
    /// The identifier's symbolic codepoint.
    pub const fn codepoint(&self) -> u32 {
        *self as u32
    }

    /// The unqualified key name.
    pub const fn name(&self) -> &'static str {
        match self {
            KeyIdentifier::CapsLock => "CapsLock",
            KeyIdentifier::NumLock => "NumLock",
            KeyIdentifier::ScrollLock => "ScrollLock",
            KeyIdentifier::Imaginary => "Imaginary",
            KeyIdentifier::Shift => "Shift",
            KeyIdentifier::Control => "Control",
            KeyIdentifier::System => "System",
            KeyIdentifier::Meta => "Meta",
            KeyIdentifier::Hyper => "Hyper",
            KeyIdentifier::Space => "Space",
            KeyIdentifier::Return => "Return",
            KeyIdentifier::Enter => "Enter",
            KeyIdentifier::Tab => "Tab",
            KeyIdentifier::DeleteBackwards => "DeleteBackwards",
            KeyIdentifier::DeleteForwards => "DeleteForwards",
            KeyIdentifier::Clear => "Clear",
            KeyIdentifier::Escape => "Escape",
            KeyIdentifier::Eject => "Eject",
            KeyIdentifier::Power => "Power",
            KeyIdentifier::Sleep => "Sleep",
            KeyIdentifier::BrightnessIncrease => "BrightnessIncrease",
            KeyIdentifier::BrightnessDecrease => "BrightnessDecrease",
            KeyIdentifier::PreviousPage => "PreviousPage",
            KeyIdentifier::NextPage => "NextPage",
            KeyIdentifier::Insert => "Insert",
            KeyIdentifier::Home => "Home",
            KeyIdentifier::End => "End",
            KeyIdentifier::PageUp => "PageUp",
            KeyIdentifier::PageDown => "PageDown",
            KeyIdentifier::UpArrow => "UpArrow",
            KeyIdentifier::DownArrow => "DownArrow",
            KeyIdentifier::LeftArrow => "LeftArrow",
            KeyIdentifier::RightArrow => "RightArrow",
            KeyIdentifier::PrintScreen => "PrintScreen",
            KeyIdentifier::ClearScreen => "ClearScreen",
            KeyIdentifier::Pause => "Pause",
            KeyIdentifier::Break => "Break",
            KeyIdentifier::MediaVolumeDecrease => "MediaVolumeDecrease",
            KeyIdentifier::MediaVolumeIncrease => "MediaVolumeIncrease",
            KeyIdentifier::MediaVolumeMute => "MediaVolumeMute",
            KeyIdentifier::MediaFastForward => "MediaFastForward",
            KeyIdentifier::MediaRewind => "MediaRewind",
            KeyIdentifier::MediaSkipForward => "MediaSkipForward",
            KeyIdentifier::MediaSkipBackward => "MediaSkipBackward",
            KeyIdentifier::MediaPlay => "MediaPlay",
            KeyIdentifier::MediaPause => "MediaPause",
            KeyIdentifier::MediaPlayToggle => "MediaPlayToggle",
            KeyIdentifier::MediaReverse => "MediaReverse",
            KeyIdentifier::MediaStop => "MediaStop",
            KeyIdentifier::MediaRecord => "MediaRecord",
            KeyIdentifier::MediaShuffle => "MediaShuffle",
            KeyIdentifier::MediaRepeatContinuous => "MediaRepeatContinuous",
            KeyIdentifier::MediaRepeatOnce => "MediaRepeatOnce",
            KeyIdentifier::ScreenCursorMotion => "ScreenCursorMotion",
        }
    }
}
