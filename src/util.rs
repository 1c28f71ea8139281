// Console logging and small formatting helpers shared by the views.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
pub fn clog(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

#[cfg(target_arch = "wasm32")]
pub fn cwarn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

#[cfg(target_arch = "wasm32")]
pub fn cerror(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

// Host builds (unit tests) have no console; keep debug output quiet.
#[cfg(not(target_arch = "wasm32"))]
pub fn clog(msg: &str) {
    let _ = msg;
}

#[cfg(not(target_arch = "wasm32"))]
pub fn cwarn(msg: &str) {
    eprintln!("warn: {msg}");
}

#[cfg(not(target_arch = "wasm32"))]
pub fn cerror(msg: &str) {
    eprintln!("error: {msg}");
}

/// Display label for a column name: underscores become spaces.
pub fn field_label(field: &str) -> String {
    field.replace('_', " ")
}

/// Formats a value for tooltips and legends. Integral values get thousands
/// separators, everything else two decimals.
pub fn format_value(v: f64) -> String {
    if !v.is_finite() {
        return "n/a".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        let digits = format!("{}", v.abs() as u64);
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        if v < 0.0 {
            format!("-{out}")
        } else {
            out
        }
    } else {
        format!("{:.2}", v)
    }
}

/// Tick label: compact, with SI suffixes for large magnitudes.
pub fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a >= 1e9 {
        trim_zeros(format!("{:.2}", v / 1e9)) + "B"
    } else if a >= 1e6 {
        trim_zeros(format!("{:.2}", v / 1e6)) + "M"
    } else if a >= 1e4 {
        trim_zeros(format!("{:.1}", v / 1e3)) + "k"
    } else if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        trim_zeros(format!("{:.3}", v))
    }
}

fn trim_zeros(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_replace_underscores() {
        assert_eq!(field_label("gdp_per_capita"), "gdp per capita");
        assert_eq!(field_label("year"), "year");
    }

    #[test]
    fn values_group_thousands() {
        assert_eq!(format_value(1234567.0), "1,234,567");
        assert_eq!(format_value(-1000.0), "-1,000");
        assert_eq!(format_value(999.0), "999");
        assert_eq!(format_value(3.14159), "3.14");
        assert_eq!(format_value(f64::NAN), "n/a");
    }

    #[test]
    fn ticks_are_compact() {
        assert_eq!(format_tick(2_500_000.0), "2.5M");
        assert_eq!(format_tick(20_000.0), "20k");
        assert_eq!(format_tick(1990.0), "1990");
        assert_eq!(format_tick(0.25), "0.25");
        assert_eq!(format_tick(3_000_000_000.0), "3B");
    }
}
