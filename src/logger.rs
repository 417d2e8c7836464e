/// Timestamped println backend shared by the level macros below. Takes the
/// ANSI color code and the padded level tag as literals.
#[macro_export]
macro_rules! stamped {
    ($color:literal, $tag:literal, $($arg:tt)*) => {
        println!(
            concat!("\x1b[", $color, "m", $tag, "[{}]\x1b[0m {}"),
            chrono::Utc::now().format("%H:%M:%S"),
            format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::stamped!("32", "[INFO] ", $($arg)*) };
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => { $crate::stamped!("33", "[LOG]  ", $($arg)*) };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::stamped!("35", "[WARN] ", $($arg)*) };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::stamped!("31", "[ERROR]", $($arg)*) };
}

#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        panic!(
            "\x1b[1;31m[FATAL][{}]\x1b[0m {}",
            chrono::Utc::now().format("%H:%M:%S"),
            format!($($arg)*)
        )
    };
}

/// Per-tick noise (fused commands, reply outcomes, panel writes). Off unless
/// `LOG_LANDER_EVENTS` is set in the environment.
#[macro_export]
macro_rules! event {
    ($($arg:tt)*) => {
        if std::env::var("LOG_LANDER_EVENTS").is_ok() {
            $crate::stamped!("36", "[EVENT]", $($arg)*)
        }
    };
}
