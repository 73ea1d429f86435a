use js_sys::Date;

/// Today the way the save form names schedules (e.g. "6/1/2024")
pub fn get_current_date_short() -> String {
    let now = Date::new_0();
    // getMonth() is zero-based
    format_short_date(now.get_full_year(), now.get_month() + 1, now.get_date())
}

fn format_short_date(year: u32, month: u32, day: u32) -> String {
    format!("{}/{}/{}", month, day, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_date_has_no_padding() {
        assert_eq!(format_short_date(2024, 6, 1), "6/1/2024");
        assert_eq!(format_short_date(2025, 12, 31), "12/31/2025");
    }
}
