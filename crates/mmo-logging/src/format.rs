//! ---
//! mmo_section: "03-diagnostics-logging"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Positional placeholder templating for formatted log calls."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use std::fmt::{Display, Write};

/// Placeholder token recognised by [`format_template`].
pub const PLACEHOLDER: &str = "{}";

/// Fill `{}` placeholders left to right, one per argument.
///
/// Placeholders without a matching argument are left verbatim. Arguments
/// without a matching placeholder are dropped without any diagnostic, so
/// `format_template("x={}", &[&1, &2])` yields `"x=1"`. Scanning resumes after
/// each inserted value, so an argument that itself contains `{}` is never
/// substituted into.
pub fn format_template(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut rest = template;
    let mut remaining = args.iter();

    while let Some(pos) = rest.find(PLACEHOLDER) {
        let Some(arg) = remaining.next() else {
            break;
        };
        out.push_str(&rest[..pos]);
        let _ = write!(out, "{}", arg);
        rest = &rest[pos + PLACEHOLDER.len()..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_each_argument_in_order() {
        assert_eq!(format_template("x={} y={}", &[&1, &2]), "x=1 y=2");
    }

    #[test]
    fn missing_arguments_leave_placeholders_verbatim() {
        assert_eq!(format_template("x={} y={}", &[&1]), "x=1 y={}");
        assert_eq!(format_template("x={} y={}", &[]), "x={} y={}");
    }

    #[test]
    fn excess_arguments_are_dropped() {
        assert_eq!(format_template("x={}", &[&1, &2, &3]), "x=1");
        assert_eq!(format_template("no placeholders", &[&"ignored"]), "no placeholders");
    }

    #[test]
    fn inserted_text_is_not_rescanned() {
        assert_eq!(format_template("{} and {}", &[&"{}", &"b"]), "{} and b");
    }

    #[test]
    fn mixed_display_types() {
        let name = String::from("net");
        assert_eq!(
            format_template("subsystem {} took {}ms ({})", &[&name, &12.5, &true]),
            "subsystem net took 12.5ms (true)"
        );
    }

    #[test]
    fn adjacent_placeholders() {
        assert_eq!(format_template("{}{}{}", &[&'a', &'b']), "ab{}");
    }
}
