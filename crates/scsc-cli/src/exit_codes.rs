pub const OK: i32 = 0;
/// Bad input on the command line (empty text, unreadable file).
pub const USER_ERROR: i32 = 2;
/// Backend unreachable, evaluation failed, or result log unreadable.
pub const BACKEND_ERROR: i32 = 3;
