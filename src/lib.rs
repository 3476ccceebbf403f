//! Block-cipher round telemetry: records every intermediate
//! transformation of every plaintext block during encryption and
//! replays the whole message as a sequence of per-round snapshots.

pub mod crypto;
