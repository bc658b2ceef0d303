//! Audio primitives: clips, WAV I/O, silence analysis, crossfade mixing.

pub mod clip;
pub mod mix;
pub mod silence;
pub mod wav;

pub use clip::AudioClip;
pub use mix::crossfade_concat;
pub use silence::{calculate_rms, dbfs, detect_silence};
pub use wav::{decode_wav, encode_wav, read_wav_file, resample, write_wav_file};
