//! Reset-surviving storage
//!
//! A handful of bytes that survive a watchdog reset (EEPROM, backup
//! registers, watchdog scratch registers). The recorder only needs a
//! single boolean from it: whether the last reset was forced by charger
//! insertion.

/// Slots in the reset-surviving store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PersistKey {
    /// Set before the forced reset that follows charger insertion
    ChargerReset = 0,
}

impl PersistKey {
    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PersistKey::ChargerReset),
            _ => None,
        }
    }
}

/// Errors from the reset-surviving store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Slot does not exist on this store
    NoSuchSlot,
    /// Write did not read back
    WriteFailed,
}

/// Byte-addressed reset-surviving store
pub trait PersistentStore {
    /// Read the byte stored in `key`
    fn read_byte(&mut self, key: PersistKey) -> Result<u8, PersistError>;

    /// Store `value` in `key`
    fn write_byte(&mut self, key: PersistKey, value: u8) -> Result<(), PersistError>;
}

/// A boolean that survives a reset
pub trait PersistentFlag {
    /// Read the flag; unreadable storage reads as `false`
    fn read(&mut self) -> bool;

    /// Write the flag
    fn write(&mut self, value: bool);
}

/// Marker byte for a set flag
///
/// Erased EEPROM reads 0xFF and cleared RAM reads 0x00, so neither can be
/// mistaken for a set flag.
pub const FLAG_SET: u8 = 0xA5;

/// [`PersistentFlag`] stored in one slot of a [`PersistentStore`]
#[derive(Debug)]
pub struct StoredFlag<S> {
    store: S,
    key: PersistKey,
}

impl<S: PersistentStore> StoredFlag<S> {
    /// Bind a flag to `key` in `store`
    pub fn new(store: S, key: PersistKey) -> Self {
        Self { store, key }
    }

    /// Access the underlying store
    pub fn store(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: PersistentStore> PersistentFlag for StoredFlag<S> {
    fn read(&mut self) -> bool {
        matches!(self.store.read_byte(self.key), Ok(FLAG_SET))
    }

    fn write(&mut self, value: bool) {
        let byte = if value { FLAG_SET } else { 0 };
        // A failed write leaves the previous value; the boot path clears
        // the flag again on the next start anyway.
        let _ = self.store.write_byte(self.key, byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockStore {
        bytes: [u8; 1],
        fail_writes: bool,
    }

    impl PersistentStore for MockStore {
        fn read_byte(&mut self, key: PersistKey) -> Result<u8, PersistError> {
            Ok(self.bytes[key.as_u8() as usize])
        }

        fn write_byte(&mut self, key: PersistKey, value: u8) -> Result<(), PersistError> {
            if self.fail_writes {
                return Err(PersistError::WriteFailed);
            }
            self.bytes[key.as_u8() as usize] = value;
            Ok(())
        }
    }

    #[test]
    fn test_key_roundtrip() {
        assert_eq!(PersistKey::from_u8(0), Some(PersistKey::ChargerReset));
        assert_eq!(PersistKey::from_u8(7), None);
    }

    #[test]
    fn test_erased_store_reads_clear() {
        let mut flag = StoredFlag::new(
            MockStore { bytes: [0xFF], fail_writes: false },
            PersistKey::ChargerReset,
        );
        assert!(!flag.read());
    }

    #[test]
    fn test_set_and_clear() {
        let mut flag = StoredFlag::new(
            MockStore { bytes: [0], fail_writes: false },
            PersistKey::ChargerReset,
        );
        flag.write(true);
        assert!(flag.read());
        assert_eq!(flag.store().bytes[0], FLAG_SET);

        flag.write(false);
        assert!(!flag.read());
    }

    #[test]
    fn test_failed_write_keeps_value() {
        let mut flag = StoredFlag::new(
            MockStore { bytes: [FLAG_SET], fail_writes: true },
            PersistKey::ChargerReset,
        );
        flag.write(false);
        assert!(flag.read());
    }
}
