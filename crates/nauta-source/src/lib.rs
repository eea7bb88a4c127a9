// Audio loading, recording metadata, and file utilities for NAUTA.

pub mod recording;
pub mod rename;
pub mod wav;

pub use recording::{RawRecording, WavRecording, parse_wav_filename};
pub use rename::{add_device_id, remove_fs_suffix};
pub use wav::decode_wav;
