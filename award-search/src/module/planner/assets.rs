///! Asset path derivation for planned queries
use chrono::NaiveDate;
use std::path::Path;

use award_common::{Cabin, QueryAssets};

/// Base file name for everything a query's search produces. Derived only
/// from route and dates (plus the uniform cabin/quantity attributes), so
/// identical plans always point at identical files.
pub fn asset_base_name(
    engine: &str,
    from_city: &str,
    to_city: &str,
    depart_date: NaiveDate,
    return_date: Option<NaiveDate>,
    cabin: Cabin,
    quantity: u32,
) -> String {
    let return_part = match return_date {
        Some(date) => date.format("%Y%m%d").to_string(),
        None => "oneway".to_string(),
    };
    format!(
        "{}-{}-{}-{}-{}-{}-{}x",
        engine,
        from_city,
        to_city,
        depart_date.format("%Y%m%d"),
        return_part,
        cabin,
        quantity
    )
}

/// JSON / HTML / screenshot destinations under the data directory.
pub fn query_assets(
    data_dir: &Path,
    engine: &str,
    from_city: &str,
    to_city: &str,
    depart_date: NaiveDate,
    return_date: Option<NaiveDate>,
    cabin: Cabin,
    quantity: u32,
) -> QueryAssets {
    let base = asset_base_name(
        engine,
        from_city,
        to_city,
        depart_date,
        return_date,
        cabin,
        quantity,
    );
    QueryAssets {
        json: data_dir.join(format!("{}.json", base)),
        html: data_dir.join(format!("{}.html", base)),
        screenshot: data_dir.join(format!("{}.jpg", base)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        let depart: NaiveDate = "2024-03-01".parse().unwrap();
        let ret: NaiveDate = "2024-03-05".parse().unwrap();
        assert_eq!(
            asset_base_name("SQ", "SFO", "SIN", depart, Some(ret), Cabin::Business, 2),
            "SQ-SFO-SIN-20240301-20240305-business-2x"
        );
        assert_eq!(
            asset_base_name("SQ", "SIN", "SFO", depart, None, Cabin::First, 1),
            "SQ-SIN-SFO-20240301-oneway-first-1x"
        );
    }
}
