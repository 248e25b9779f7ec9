//! Signal-processing primitives shared by the feature extractors

pub mod mel;
pub mod stft;

pub use mel::MelFilterbank;
pub use stft::Stft;
