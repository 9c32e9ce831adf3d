use crate::application::admin_sucursales::delete::NOT_AVAILABLE;
use time::OffsetDateTime;

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Long Spanish date, e.g. `15 de enero de 2024, 10:30`. Missing or
/// unparseable timestamps render as [`NOT_AVAILABLE`].
pub fn long_date(value: Option<OffsetDateTime>) -> String {
    let Some(ts) = value else {
        return NOT_AVAILABLE.to_string();
    };
    let month = MONTHS[usize::from(u8::from(ts.month())) - 1];
    format!(
        "{} de {} de {}, {:02}:{:02}",
        ts.day(),
        month,
        ts.year(),
        ts.hour(),
        ts.minute()
    )
}

pub fn or_not_available(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
}

/// Left-align `value` in a column `width` characters wide.
pub(crate) fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        value.to_string()
    } else {
        format!("{value}{}", " ".repeat(width - len))
    }
}
