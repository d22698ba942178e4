/// Allocation offset for function keys F1..F35.
pub const FUNCTION_KEY_OFFSET: i32 = -0xF00;
/// Allocation offset for screen cursor (mouse) buttons 1..32.
pub const SCREEN_CURSOR_KEY_OFFSET: i32 = -0xB00;
/// Allocation offset for application instructions.
pub const INSTRUCTION_KEY_OFFSET: i32 = -0xA000;

/// Well-known literal dispatch requesting `session/synchronize`.
pub const SYNCHRONIZE_DISPATCH: i32 = -2;
/// Well-known literal dispatch announcing `screen/resize`.
pub const RESIZE_DISPATCH: i32 = -3;

pub const FUNCTION_KEY_COUNT: u8 = 35;
pub const SCREEN_CURSOR_KEY_COUNT: u8 = 32;

/// A semantic operation requested of the hosted application.
///
/// Encoded as negative dispatch values in the instruction range; the
/// discriminant order is the wire order and must not be rearranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ApplicationInstruction {
    Void = 0,

    SessionStatus,
    SessionClone,
    SessionCreate,
    SessionClose,
    SessionSave,
    SessionSynchronize,
    SessionInterrupt,
    SessionQuit,
    SessionSwitch,
    SessionRestore,

    FrameStatus,
    FrameClone,
    FrameCreate,
    FrameClose,
    FrameSelect,
    FrameNext,
    FramePrevious,
    FrameTranspose,

    ResourceStatus,
    ResourceClone,
    ResourceCreate,
    ResourceClose,
    ResourceRelocate,
    ResourceCycle,
    ResourceOpen,
    ResourceSave,
    ResourceReload,

    ElementsStatus,
    ElementsClone,
    ElementsSeek,
    ElementsFind,
    ElementsNext,
    ElementsPrevious,
    ElementsUndo,
    ElementsRedo,
    ElementsSelect,
    ElementsInsert,
    ElementsDelete,
    ElementsSelectAll,
    ElementsHover,

    ScreenRefresh,
    ScreenResize,

    ViewScroll,
    ViewPan,

    TimeElapsed,
}

impl ApplicationInstruction {
    /// Number of defined instructions, the sentinel boundary of the
    /// allocation range.
    pub const COUNT: u16 = ApplicationInstruction::TimeElapsed as u16 + 1;

    pub const fn number(&self) -> u16 {
        *self as u16
    }

    pub const fn from_number(number: u16) -> Option<ApplicationInstruction> {
        if number >= Self::COUNT {
            return None;
        }

        // Discriminants are dense from zero; transmute-free decode.
        Some(Self::ALL[number as usize])
    }

    const ALL: [ApplicationInstruction; Self::COUNT as usize] = [
        Self::Void,
        Self::SessionStatus,
        Self::SessionClone,
        Self::SessionCreate,
        Self::SessionClose,
        Self::SessionSave,
        Self::SessionSynchronize,
        Self::SessionInterrupt,
        Self::SessionQuit,
        Self::SessionSwitch,
        Self::SessionRestore,
        Self::FrameStatus,
        Self::FrameClone,
        Self::FrameCreate,
        Self::FrameClose,
        Self::FrameSelect,
        Self::FrameNext,
        Self::FramePrevious,
        Self::FrameTranspose,
        Self::ResourceStatus,
        Self::ResourceClone,
        Self::ResourceCreate,
        Self::ResourceClose,
        Self::ResourceRelocate,
        Self::ResourceCycle,
        Self::ResourceOpen,
        Self::ResourceSave,
        Self::ResourceReload,
        Self::ElementsStatus,
        Self::ElementsClone,
        Self::ElementsSeek,
        Self::ElementsFind,
        Self::ElementsNext,
        Self::ElementsPrevious,
        Self::ElementsUndo,
        Self::ElementsRedo,
        Self::ElementsSelect,
        Self::ElementsInsert,
        Self::ElementsDelete,
        Self::ElementsSelectAll,
        Self::ElementsHover,
        Self::ScreenRefresh,
        Self::ScreenResize,
        Self::ViewScroll,
        Self::ViewPan,
        Self::TimeElapsed,
    ];

    /// The qualified `class/operation` name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::SessionStatus => "session/status",
            Self::SessionClone => "session/clone",
            Self::SessionCreate => "session/create",
            Self::SessionClose => "session/close",
            Self::SessionSave => "session/save",
            Self::SessionSynchronize => "session/synchronize",
            Self::SessionInterrupt => "session/interrupt",
            Self::SessionQuit => "session/quit",
            Self::SessionSwitch => "session/switch",
            Self::SessionRestore => "session/restore",
            Self::FrameStatus => "frame/status",
            Self::FrameClone => "frame/clone",
            Self::FrameCreate => "frame/create",
            Self::FrameClose => "frame/close",
            Self::FrameSelect => "frame/select",
            Self::FrameNext => "frame/next",
            Self::FramePrevious => "frame/previous",
            Self::FrameTranspose => "frame/transpose",
            Self::ResourceStatus => "resource/status",
            Self::ResourceClone => "resource/clone",
            Self::ResourceCreate => "resource/create",
            Self::ResourceClose => "resource/close",
            Self::ResourceRelocate => "resource/relocate",
            Self::ResourceCycle => "resource/cycle",
            Self::ResourceOpen => "resource/open",
            Self::ResourceSave => "resource/save",
            Self::ResourceReload => "resource/reload",
            Self::ElementsStatus => "elements/status",
            Self::ElementsClone => "elements/clone",
            Self::ElementsSeek => "elements/seek",
            Self::ElementsFind => "elements/find",
            Self::ElementsNext => "elements/next",
            Self::ElementsPrevious => "elements/previous",
            Self::ElementsUndo => "elements/undo",
            Self::ElementsRedo => "elements/redo",
            Self::ElementsSelect => "elements/select",
            Self::ElementsInsert => "elements/insert",
            Self::ElementsDelete => "elements/delete",
            Self::ElementsSelectAll => "elements/selectall",
            Self::ElementsHover => "elements/hover",
            Self::ScreenRefresh => "screen/refresh",
            Self::ScreenResize => "screen/resize",
            Self::ViewScroll => "view/scroll",
            Self::ViewPan => "view/pan",
            Self::TimeElapsed => "time/elapsed",
        }
    }
}

/// A decoded dispatch value.
///
/// Dispatch values at or above zero are ordinary Unicode codepoints;
/// negatives decode against three allocation ranges, with two literal
/// sentinels recognized before range decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dispatch {
    /// An ordinary key carrying a Unicode scalar.
    Codepoint(u32),
    /// Function key F1..F35.
    Function(u8),
    /// Screen cursor (mouse) button 1..32.
    ScreenCursor(u8),
    /// An application instruction.
    Instruction(ApplicationInstruction),
    /// A negative value outside every allocated range.
    Unassigned(i32),
}

impl Dispatch {
    /// Decodes a raw dispatch value.
    pub fn decode(dispatch: i32) -> Dispatch {
        if dispatch >= 0 {
            return Dispatch::Codepoint(dispatch as u32);
        }

        match dispatch {
            SYNCHRONIZE_DISPATCH => {
                return Dispatch::Instruction(ApplicationInstruction::SessionSynchronize);
            },
            RESIZE_DISPATCH => {
                return Dispatch::Instruction(ApplicationInstruction::ScreenResize);
            },
            _ => {},
        }

        let function = FUNCTION_KEY_OFFSET - dispatch;
        if function >= 1 && function <= FUNCTION_KEY_COUNT as i32 {
            return Dispatch::Function(function as u8);
        }

        let button = SCREEN_CURSOR_KEY_OFFSET - dispatch;
        if button >= 1 && button <= SCREEN_CURSOR_KEY_COUNT as i32 {
            return Dispatch::ScreenCursor(button as u8);
        }

        let instruction = INSTRUCTION_KEY_OFFSET - dispatch;
        if instruction >= 0 && instruction < ApplicationInstruction::COUNT as i32 {
            if let Some(ai) = ApplicationInstruction::from_number(instruction as u16) {
                return Dispatch::Instruction(ai);
            }
        }

        Dispatch::Unassigned(dispatch)
    }

    /// Encodes back into a raw dispatch value.
    pub const fn encode(&self) -> i32 {
        match self {
            Dispatch::Codepoint(cp) => *cp as i32,
            Dispatch::Function(n) => FUNCTION_KEY_OFFSET - *n as i32,
            Dispatch::ScreenCursor(n) => SCREEN_CURSOR_KEY_OFFSET - *n as i32,
            Dispatch::Instruction(ai) => INSTRUCTION_KEY_OFFSET - ai.number() as i32,
            Dispatch::Unassigned(raw) => *raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_key_literal() {
        assert_eq!(Dispatch::Function(1).encode(), -0xF01);
        assert_eq!(Dispatch::decode(-0xF01), Dispatch::Function(1));
    }

    #[test]
    fn test_function_key_round_trip() {
        for n in 1..=FUNCTION_KEY_COUNT {
            let encoded = Dispatch::Function(n).encode();
            assert!(encoded < 0);
            assert_eq!(Dispatch::decode(encoded), Dispatch::Function(n));
        }
    }

    #[test]
    fn test_screen_cursor_round_trip() {
        for n in 1..=SCREEN_CURSOR_KEY_COUNT {
            let encoded = Dispatch::ScreenCursor(n).encode();
            assert_eq!(Dispatch::decode(encoded), Dispatch::ScreenCursor(n));
        }
    }

    #[test]
    fn test_instruction_round_trip() {
        for number in 0..ApplicationInstruction::COUNT {
            let ai = ApplicationInstruction::from_number(number).unwrap();
            assert_eq!(ai.number(), number);
            assert_eq!(
                Dispatch::decode(Dispatch::Instruction(ai).encode()),
                Dispatch::Instruction(ai)
            );
        }
        assert_eq!(
            ApplicationInstruction::from_number(ApplicationInstruction::COUNT),
            None
        );
    }

    #[test]
    fn test_sentinel_values() {
        assert_eq!(
            Dispatch::decode(SYNCHRONIZE_DISPATCH),
            Dispatch::Instruction(ApplicationInstruction::SessionSynchronize)
        );
        assert_eq!(
            Dispatch::decode(RESIZE_DISPATCH),
            Dispatch::Instruction(ApplicationInstruction::ScreenResize)
        );
    }

    #[test]
    fn test_codepoint_passthrough() {
        assert_eq!(Dispatch::decode('q' as i32), Dispatch::Codepoint('q' as u32));
        assert_eq!(Dispatch::Codepoint(0x1F5B1).encode(), 0x1F5B1);
    }

    #[test]
    fn test_unassigned_negative() {
        assert_eq!(Dispatch::decode(-1), Dispatch::Unassigned(-1));
        assert_eq!(Dispatch::decode(-0x5000), Dispatch::Unassigned(-0x5000));
        assert_eq!(Dispatch::Unassigned(-77).encode(), -77);
    }

    #[test]
    fn test_instruction_names() {
        assert_eq!(ApplicationInstruction::ResourceSave.as_str(), "resource/save");
        assert_eq!(
            ApplicationInstruction::SessionSynchronize.as_str(),
            "session/synchronize"
        );
    }
}
