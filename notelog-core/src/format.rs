//! Formatting helpers shared by the sinks and the notes timeline.

use crate::level::LogLevel;
use chrono::{DateTime, Local};
use std::fmt::Display;

/// Timestamp layout of the first field of every log line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Render `timestamp - loggerName - LEVEL - message`.
pub fn format_line(
    ts: DateTime<Local>,
    logger_name: &str,
    level: LogLevel,
    message: &str,
) -> String {
    format!(
        "{} - {} - {} - {}",
        ts.format(TIMESTAMP_FORMAT),
        logger_name,
        level,
        message
    )
}

/// Logger name for a host type: `"<module path> | <TypeName>"`.
///
/// Generic parameters stay attached to the type name. Trait objects are
/// named after their trait.
pub fn logger_name_for<T: ?Sized>() -> String {
    logger_name_from_path(std::any::type_name::<T>())
}

pub(crate) fn logger_name_from_path(path: &str) -> String {
    let path = path.strip_prefix("dyn ").unwrap_or(path);
    let head_end = path.find('<').unwrap_or(path.len());
    match path[..head_end].rfind("::") {
        Some(split) => format!("{} | {}", &path[..split], &path[split + 2..]),
        None => path.to_string(),
    }
}

/// Substitute each `{}` in `template` with the next argument.
///
/// Without arguments the template is returned untouched. Surplus placeholders
/// are left as-is and surplus arguments are ignored.
pub fn interpolate(template: &str, args: &[&dyn Display]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;
    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => out.push_str(&arg.to_string()),
            None => out.push_str("{}"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}
