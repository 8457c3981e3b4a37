pub mod projection;
pub mod terminator;
