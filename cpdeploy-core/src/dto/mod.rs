//! Wire shapes for cPanel UAPI responses
//!
//! One module per UAPI area, plus the shared response envelope. These types
//! only describe what the server sends; interpretation lives in `domain`.

pub mod fileman;
pub mod uapi;
pub mod version_control;
