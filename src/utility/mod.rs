pub mod backup;
pub mod helper;
pub mod logging;
