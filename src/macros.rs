#[macro_export]
macro_rules! warn_user {
    ($($arg:tt)*) => {{
        use owo_colors::OwoColorize;

        anstream::eprintln!(
            "{}{} {}",
            "warning".yellow().bold(),
            ":".bold(),
            format!($($arg)*)
        );
    }};
}
