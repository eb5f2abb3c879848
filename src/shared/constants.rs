pub const APP_NAME: &str = "framethin";

pub const ERROR_LOG_FILE: &str = "error.log";
pub const DEBUG_LOG_FILE: &str = "debug.log";

pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_STRIDE: usize = 5;
/// Frame 0 is usually a blank setup frame and is left out.
pub const DEFAULT_OFFSET: usize = 1;

pub const SOURCE_DIR_NAME: &str = "FramesAll";
pub const OUTPUT_DIR_NAME: &str = "Frames";

pub const FRAME_PREFIX: &str = "frame";
pub const FRAME_EXTENSION: &str = "png";
