//! Stepper polyalphabetic rotor cipher engine.
//!
//! Stepper is a classical, reversible text cipher. Every letter is shifted
//! by the sum of one key letter per row of a key matrix; the letter read from
//! each row moves after every character and jumps by a per-row prime step
//! after every block. Digits are shifted by a simpler Vigenère-style side
//! cipher, and every other character keeps its place.
//!
//! Rotor positions are computed in closed form from the absolute block
//! index, so decryption starts directly from the end of the text and walks
//! backwards without replaying the forward history.
//!
//! Stepper is an obfuscation tool, not a modern authenticated cipher.
//!
//! # Architecture
//!
//! ```text
//! alphabet     (letter codes 0..=25 + side channel of everything else)
//!     ↓ segment into blocks
//! rotor        (closed-form block positions, per-letter read positions)
//!     ↓ drives
//! engine       (KeyMatrix rows summed forward, subtracted backward)
//!     ↓ side_channel shifts digits, recombine merges
//! stepper      (orchestrator: normalize → extract → cipher → merge)
//! ```
//!
//! # Examples
//!
//! Encrypt and decrypt a whole text:
//!
//! ```
//! use stepper::normalize::PunctuationMode;
//! use stepper::Stepper;
//!
//! let key: String = (0..133).map(|i| (b'a' + (i * 7 % 26) as u8) as char).collect();
//! let stepper = Stepper::new(&key).unwrap();
//!
//! let ct = stepper.encrypt_str("Meet me at 10:30.", PunctuationMode::Keep).unwrap();
//! assert_ne!(ct, "meet me at 10:30.");
//! assert_eq!(stepper.decrypt_str(&ct).unwrap(), "meet me at 10:30.");
//! ```
//!
//! Work on letter codes directly with a custom geometry:
//!
//! ```
//! use stepper::alphabet::SideChannel;
//! use stepper::{Stepper, StepperConfig};
//!
//! let cfg = StepperConfig::new(3, vec![1, 1]).unwrap();
//! let stepper = Stepper::with_config(cfg, "abcbca").unwrap();
//!
//! let (ct, side) = stepper.encrypt_text(&[0, 1, 2, 3, 4], &SideChannel::default()).unwrap();
//! assert_eq!(ct, vec![1, 4, 4, 6, 6]);
//!
//! let (pt, _) = stepper.decrypt_text(&ct, &side, 5).unwrap();
//! assert_eq!(pt, vec![0, 1, 2, 3, 4]);
//! ```

#![deny(clippy::all)]

pub mod alphabet;
pub mod config;
pub mod engine;
pub mod error;
pub mod key_matrix;
pub mod normalize;
pub mod recombine;
pub mod rotor;
pub mod segment;
pub mod side_channel;

mod stepper;

pub use config::StepperConfig;
pub use error::StepperError;
pub use stepper::{decrypt_text, encrypt_text, Stepper};
