mod dispatch;
mod keys;

use cellmatrix_data::MatrixParameters;
pub use dispatch::{
    ApplicationInstruction, Dispatch, FUNCTION_KEY_COUNT, FUNCTION_KEY_OFFSET,
    INSTRUCTION_KEY_OFFSET, RESIZE_DISPATCH, SCREEN_CURSOR_KEY_COUNT, SCREEN_CURSOR_KEY_OFFSET,
    SYNCHRONIZE_DISPATCH,
};
pub use keys::{KeyIdentifier, KeyModifiers};

use crate::error::Error;

/// Callback carrying bytes from the application back to the backend.
pub type DeviceReceiver = Box<dyn FnMut(&[u8]) + Send>;

/// Controller status shared between backend and application.
///
/// The primary event record: the backend fills it during
/// `transfer_event` and the application reads it afterwards, in strict
/// alternation.
#[derive(Default)]
pub struct ControllerStatus {
    /// The key signal being dispatched; see [`Dispatch`].
    pub dispatch: i32,
    /// Number of occurrences or magnitude of the event.
    pub quantity: i32,
    /// Tracked key press state; primarily modifiers.
    pub keys: KeyModifiers,
    /// Byte length of the associated insertion text. When zero, an
    /// empty string is guaranteed.
    pub text_length: usize,
    /// Pixels from the top-most cell's outer edge to the cursor.
    pub top: i32,
    /// Pixels from the left-most cell's outer edge to the cursor.
    pub left: i32,
    /// One-time channel from the application back to the backend.
    pub receiver: Option<DeviceReceiver>,
}

impl std::fmt::Debug for ControllerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerStatus")
            .field("dispatch", &self.dispatch)
            .field("quantity", &self.quantity)
            .field("keys", &self.keys)
            .field("text_length", &self.text_length)
            .field("top", &self.top)
            .field("left", &self.left)
            .field("receiver", &self.receiver.is_some())
            .finish()
    }
}

impl ControllerStatus {
    /// Fixed binary size of a controller snapshot.
    pub const SNAPSHOT_SIZE: usize = 24;

    /// The decoded dispatch of the current event.
    pub fn decode(&self) -> Dispatch {
        Dispatch::decode(self.dispatch)
    }

    /// Cursor position in pixels, `(top, left)`.
    pub fn cursor_status(&self) -> (i32, i32) {
        (self.top, self.left)
    }

    /// Cursor position in whole cells, `(line, offset)`.
    pub fn cursor_cell_status(&self, mp: &MatrixParameters) -> (u16, u16) {
        let (cw, ch) = mp.cell_pixel_size();

        (
            (self.top.max(0) as u32 / ch.max(1)) as u16,
            (self.left.max(0) as u32 / cw.max(1)) as u16,
        )
    }

    /// Serializes the status into an opaque snapshot blob.
    ///
    /// Serialization clears the receiver callback; a restored snapshot
    /// therefore never carries one. `dispatch_override`, when present,
    /// replaces the dispatch field in the snapshot only.
    pub fn snapshot(&mut self, dispatch_override: Option<i32>) -> Vec<u8> {
        self.receiver = None;

        let mut bytes = Vec::with_capacity(Self::SNAPSHOT_SIZE);
        bytes.extend_from_slice(&dispatch_override.unwrap_or(self.dispatch).to_le_bytes());
        bytes.extend_from_slice(&self.quantity.to_le_bytes());
        bytes.extend_from_slice(&self.keys.bits().to_le_bytes());
        bytes.extend_from_slice(&(self.text_length as u32).to_le_bytes());
        bytes.extend_from_slice(&self.top.to_le_bytes());
        bytes.extend_from_slice(&self.left.to_le_bytes());
        bytes
    }

    /// Reconstructs a status from a snapshot blob.
    pub fn restore(snapshot: &[u8]) -> Result<ControllerStatus, Error> {
        if snapshot.len() != Self::SNAPSHOT_SIZE {
            return Err(Error::snapshot_length(Self::SNAPSHOT_SIZE, snapshot.len()));
        }

        let word = |i: usize| {
            i32::from_le_bytes([
                snapshot[i * 4],
                snapshot[i * 4 + 1],
                snapshot[i * 4 + 2],
                snapshot[i * 4 + 3],
            ])
        };

        Ok(ControllerStatus {
            dispatch: word(0),
            quantity: word(1),
            keys: KeyModifiers::from_bits_truncate(word(2) as u32),
            text_length: word(3) as u32 as usize,
            top: word(4),
            left: word(5),
            receiver: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use cellmatrix_data::GlyphInscriptionParameters;

    use super::*;

    fn status() -> ControllerStatus {
        ControllerStatus {
            dispatch: -0xF01,
            quantity: 2,
            keys: KeyModifiers::SHIFT | KeyModifiers::CONTROL,
            text_length: 5,
            top: 37,
            left: 111,
            receiver: Some(Box::new(|_| {})),
        }
    }

    #[test]
    fn test_snapshot_round_trip_modulo_receiver() {
        let mut original = status();
        let blob = original.snapshot(None);

        assert_eq!(blob.len(), ControllerStatus::SNAPSHOT_SIZE);
        assert!(original.receiver.is_none());

        let restored = ControllerStatus::restore(&blob).unwrap();
        assert_eq!(restored.dispatch, -0xF01);
        assert_eq!(restored.quantity, 2);
        assert_eq!(restored.keys, KeyModifiers::SHIFT | KeyModifiers::CONTROL);
        assert_eq!(restored.text_length, 5);
        assert_eq!(restored.top, 37);
        assert_eq!(restored.left, 111);
        assert!(restored.receiver.is_none());
    }

    #[test]
    fn test_snapshot_dispatch_override() {
        let blob = status().snapshot(Some(SYNCHRONIZE_DISPATCH));
        let restored = ControllerStatus::restore(&blob).unwrap();

        assert_eq!(restored.dispatch, SYNCHRONIZE_DISPATCH);
        assert_eq!(
            restored.decode(),
            Dispatch::Instruction(ApplicationInstruction::SessionSynchronize)
        );
    }

    #[test]
    fn test_restore_rejects_wrong_length() {
        assert!(matches!(
            ControllerStatus::restore(&[0u8; 12]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_cursor_cell_translation() {
        let ip = GlyphInscriptionParameters {
            cell_width: 8.0,
            cell_height: 16.0,
            ..Default::default()
        };
        let mut mp = MatrixParameters::default();
        mp.configure_cells(&ip, 1.0);
        mp.calculate_dimensions(640.0, 480.0);

        let status = ControllerStatus { top: 37, left: 111, ..Default::default() };
        assert_eq!(status.cursor_status(), (37, 111));
        assert_eq!(status.cursor_cell_status(&mp), (2, 13));
    }
}
